//! AgreeKit
//!
//! Renders a single fillable digital volunteer agreement and exports it as a
//! one-page A4 PDF. The crate holds no clever machinery of its own: it keeps
//! the three entered field values, instantiates a fixed document template,
//! and orchestrates two injected capabilities: a rasterizer that captures
//! the rendered document as a bitmap and a PDF assembler that places that
//! bitmap on a page and saves it.
//!
//! # Features
//!
//! - **svg-raster** (default): `resvg`-backed capture of the document markup
//! - **pdf-export** (default): `printpdf`-backed page assembly
//! - **Swappable capabilities**: both backends sit behind traits so tests
//!   substitute doubles
//!
//! # Example
//!
//! ```no_run
//! use agreekit::{DraftField, DraftStore, TemplateOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = DraftStore::new();
//! store.update(DraftField::Name, "Jane Doe");
//! store.update(DraftField::Email, "jane@example.com");
//!
//! let markup = agreekit::render_agreement(&store.snapshot(), &TemplateOptions::default());
//! let pipeline = agreekit::new_pipeline(Default::default())?;
//! let path = pipeline.export_to_pdf(&markup, &store.snapshot())?;
//! println!("Saved: {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod draft;

pub mod template;

// Capability surfaces consumed by the export pipeline
pub mod pdf;
pub mod rasterize;

pub mod export;

// Async-friendly session API (simple worker-backed abstraction)
pub mod async_api;

pub use async_api::Session;
pub use draft::{AgreementDraft, DraftField, DraftStore};
pub use export::{export_filename, ExportNotice, ExportOptions, ExportPipeline};
pub use template::{render_agreement, TemplateOptions};

/// Create an export pipeline wired with the default production backends.
///
/// Requires both the `svg-raster` and `pdf-export` features (enabled by
/// default). Capability readiness is probed per export, not here, so this
/// never blocks on font loading.
#[cfg(all(feature = "svg-raster", feature = "pdf-export"))]
pub fn new_pipeline(options: ExportOptions) -> Result<ExportPipeline> {
    Ok(ExportPipeline::with_options(
        Box::new(rasterize::SvgRasterizer::new()),
        Box::new(pdf::PrintPdfAssembler::new()),
        options,
    ))
}
