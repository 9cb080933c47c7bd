//! Export pipeline: capture the rendered document and deliver it as a PDF
//!
//! A single linear three-step sequence with one abort path: probe the
//! injected capabilities, rasterize the markup at the oversampling factor,
//! assemble a portrait page with the image scaled to fill the page width,
//! then save under a filename derived from the draft. Any failure aborts the
//! whole operation, surfaces exactly one user-visible notice, and leaves no
//! partial artifact behind.

use crate::draft::{underscore_name, AgreementDraft};
use crate::error::{Error, Result};
use crate::pdf::{DocumentOptions, ImagePlacement, Orientation, PageFormat, PdfAssembler};
use crate::rasterize::{RasterOptions, Rasterizer};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fixed prefix of every exported filename
pub const FILENAME_PREFIX: &str = "Global_U_Agreement_";

/// Token used in the filename while the draft is unsigned
pub const FALLBACK_NAME_TOKEN: &str = "Draft";

const CAPABILITY_NOTICE: &str =
    "PDF capabilities are not fully loaded yet. Please try again in a moment.";
const FAILURE_NOTICE: &str = "Could not generate PDF.";

type OnNoticeHandler = Arc<dyn Fn(&ExportNotice) + Send + Sync>;

/// A user-visible notice emitted by the pipeline
#[derive(Debug, Clone)]
pub struct ExportNotice {
    /// Level such as "error" or "info"
    pub level: String,
    /// Textual content of the notice
    pub text: String,
}

/// Configuration for the export pipeline
///
/// The defaults reproduce the print-oriented capture: 2x oversampling over an
/// opaque white background onto a portrait A4 page, saved into the current
/// directory.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Oversampling factor applied to the capture resolution
    pub oversample: f32,
    /// Background forced underneath the capture, RGBA
    pub background: (u8, u8, u8, u8),
    /// Page orientation of the assembled document
    pub orientation: Orientation,
    /// Page format of the assembled document
    pub format: PageFormat,
    /// Directory the artifact is saved into
    pub output_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            oversample: 2.0,
            background: (255, 255, 255, 255),
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Derive the deterministic artifact filename from the draft name.
///
/// Whitespace runs become single underscores; an empty name falls back to the
/// fixed placeholder token.
pub fn export_filename(name: &str) -> String {
    let token = if name.is_empty() {
        FALLBACK_NAME_TOKEN.to_string()
    } else {
        underscore_name(name)
    };
    format!("{}{}.pdf", FILENAME_PREFIX, token)
}

/// The export pipeline
///
/// Both capabilities are passed in at construction so backends can be swapped
/// and tests can substitute doubles. The in-progress flag is advisory UI
/// state for disabling repeated invocation, not a lock; the pipeline holds no
/// shared mutable resource.
pub struct ExportPipeline {
    rasterizer: Box<dyn Rasterizer>,
    assembler: Box<dyn PdfAssembler>,
    options: ExportOptions,
    in_progress: AtomicBool,
    on_notice: Option<OnNoticeHandler>,
}

impl ExportPipeline {
    pub fn new(rasterizer: Box<dyn Rasterizer>, assembler: Box<dyn PdfAssembler>) -> Self {
        Self::with_options(rasterizer, assembler, ExportOptions::default())
    }

    pub fn with_options(
        rasterizer: Box<dyn Rasterizer>,
        assembler: Box<dyn PdfAssembler>,
        options: ExportOptions,
    ) -> Self {
        Self {
            rasterizer,
            assembler,
            options,
            in_progress: AtomicBool::new(false),
            on_notice: None,
        }
    }

    /// Register a callback for user-visible notices (capability problems and
    /// export failures). The UI layer renders these; the pipeline emits at
    /// most one notice per invocation.
    pub fn on_notice<F>(&mut self, cb: F)
    where
        F: Fn(&ExportNotice) + Send + Sync + 'static,
    {
        self.on_notice = Some(Arc::new(cb));
    }

    /// Remove a previously registered notice callback if any
    pub fn clear_on_notice(&mut self) {
        self.on_notice = None;
    }

    /// Whether an export is currently running
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Export the rendered document region as a PDF.
    ///
    /// `markup` is the rendered document to capture and `draft` the snapshot
    /// its values came from; the draft contributes only the filename. On
    /// success the path of the saved artifact is returned.
    pub fn export_to_pdf(&self, markup: &str, draft: &AgreementDraft) -> Result<PathBuf> {
        // Probe before touching any state: a missing capability produces a
        // blocking notice and nothing else.
        if !self.rasterizer.is_ready() || !self.assembler.is_ready() {
            self.notify("error", CAPABILITY_NOTICE);
            return Err(Error::CapabilityUnavailable(
                "rasterizer or PDF assembler not ready".to_string(),
            ));
        }

        if self.in_progress.swap(true, Ordering::SeqCst) {
            return Err(Error::ExportInProgress);
        }

        let result = self.run_export(markup, draft);
        self.in_progress.store(false, Ordering::SeqCst);

        if let Err(err) = &result {
            log::warn!("export failed: {}", err);
            self.notify("error", FAILURE_NOTICE);
        }

        result
    }

    fn run_export(&self, markup: &str, draft: &AgreementDraft) -> Result<PathBuf> {
        let raster_options = RasterOptions {
            scale: self.options.oversample,
            background: self.options.background,
            ..RasterOptions::default()
        };
        let bitmap = self.rasterizer.render(markup, &raster_options)?;

        let (page_width_mm, page_height_mm) = self
            .options
            .format
            .dimensions_mm(self.options.orientation);

        let mut builder = self.assembler.create_document(&DocumentOptions {
            title: "Digital Volunteer Work Agreement".to_string(),
            orientation: self.options.orientation,
            format: self.options.format,
        })?;

        let (image_width, image_height) = builder.image_dimensions(&bitmap)?;
        if image_width == 0 {
            return Err(Error::AssemblyError(
                "captured image has zero width".to_string(),
            ));
        }

        // Fill the page width exactly; scale the height proportionally.
        let width_mm = page_width_mm;
        let height_mm = image_height as f32 * page_width_mm / image_width as f32;
        if height_mm > page_height_mm {
            // Known limitation: tall content is not paginated and overflows
            // the bottom edge of the single page.
            log::warn!(
                "capture height {:.1}mm exceeds the {:.1}mm page; content will overflow",
                height_mm,
                page_height_mm
            );
        }

        builder.add_image(
            &bitmap,
            &ImagePlacement {
                x_mm: 0.0,
                y_mm: 0.0,
                width_mm,
                height_mm,
            },
        )?;

        let path = self.options.output_dir.join(export_filename(&draft.name));
        builder.save(&path)?;
        log::info!("exported agreement to {}", path.display());
        Ok(path)
    }

    fn notify(&self, level: &str, text: &str) {
        if let Some(cb) = &self.on_notice {
            cb(&ExportNotice {
                level: level.to_string(),
                text: text.to_string(),
            });
        }
    }
}
