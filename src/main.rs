use agreekit::{render_agreement, DraftField, DraftStore, TemplateOptions};
use clap::Parser;
use std::path::PathBuf;

/// Fixed team contact profile; printed instead of opened since there is no
/// browsing context here.
const PROFILE_URL: &str = "https://www.linkedin.com/in/global-llc";

/// CLI arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Fill and export the digital volunteer agreement")]
struct Args {
    /// Volunteer full name (empty leaves the agreement unsigned)
    #[arg(short, long, default_value = "")]
    name: String,

    /// Volunteer email address
    #[arg(short, long, default_value = "")]
    email: String,

    /// Volunteer signature date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Draft JSON file to seed the form with; the flags above override it
    #[arg(long)]
    draft: Option<PathBuf>,

    /// Directory the PDF is saved into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the rendered document markup instead of exporting
    #[arg(long)]
    dump_markup: bool,

    /// Print the team contact profile URL and exit
    #[arg(long)]
    contact: bool,
}

#[cfg(all(feature = "svg-raster", feature = "pdf-export"))]
fn export(args: &Args, markup: &str, store: &DraftStore) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)?;
    let mut pipeline = agreekit::new_pipeline(agreekit::ExportOptions {
        output_dir: args.out_dir.clone(),
        ..Default::default()
    })?;
    pipeline.on_notice(|notice| eprintln!("[{}] {}", notice.level, notice.text));

    let path = pipeline.export_to_pdf(markup, &store.snapshot())?;
    println!("Saved: {}", path.display());
    Ok(())
}

#[cfg(not(all(feature = "svg-raster", feature = "pdf-export")))]
fn export(_args: &Args, _markup: &str, _store: &DraftStore) -> anyhow::Result<()> {
    anyhow::bail!(
        "this build has no export backends; enable the `svg-raster` and `pdf-export` features or use --dump-markup"
    )
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.contact {
        println!("{}", PROFILE_URL);
        return Ok(());
    }

    let mut store = match &args.draft {
        Some(path) => DraftStore::with_draft(agreekit::draft::load_draft(path)?),
        None => DraftStore::new(),
    };
    if !args.name.is_empty() {
        store.update(DraftField::Name, &args.name);
    }
    if !args.email.is_empty() {
        store.update(DraftField::Email, &args.email);
    }
    if let Some(date) = &args.date {
        store.update(DraftField::Date, date);
    }

    let markup = render_agreement(&store.snapshot(), &TemplateOptions::default());
    if args.dump_markup {
        println!("{}", markup);
        return Ok(());
    }

    export(&args, &markup, &store)
}
