//! PDF assembly capability
//!
//! The export pipeline consumes a [`PdfAssembler`] through the same
//! create/measure/place/save surface the original export flow used, so the
//! backend can be swapped and tests can capture placements. The production
//! backend embeds the captured bitmap with `printpdf`.

use crate::error::Result;
use crate::rasterize::Bitmap;
use std::path::Path;

/// Page orientation for the assembled document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Standard page formats the assembler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    A4,
    Letter,
}

impl PageFormat {
    /// Page dimensions in millimeters for the given orientation
    pub fn dimensions_mm(&self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
        };
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Options for creating a document
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Document title recorded in the PDF metadata
    pub title: String,
    pub orientation: Orientation,
    pub format: PageFormat,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: "Agreement".to_string(),
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
        }
    }
}

/// Placement of an image on the page, in millimeters from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Capability for assembling bitmaps into a PDF document
pub trait PdfAssembler: Send + Sync {
    /// Whether the backend has finished loading and can assemble.
    fn is_ready(&self) -> bool;

    /// Create a new single-page document to place images into.
    fn create_document(&self, options: &DocumentOptions) -> Result<Box<dyn PdfBuilder>>;
}

/// A document under assembly
pub trait PdfBuilder {
    /// Pixel dimensions of the given bitmap as the backend sees them.
    fn image_dimensions(&self, bitmap: &Bitmap) -> Result<(u32, u32)>;

    /// Place a bitmap on the page.
    fn add_image(&mut self, bitmap: &Bitmap, placement: &ImagePlacement) -> Result<()>;

    /// Finish the document and save it to `path`.
    fn save(self: Box<Self>, path: &Path) -> Result<()>;
}

/// Noop assembler used in unit tests; builds nothing and saves nowhere.
pub struct NoopPdfAssembler;

impl NoopPdfAssembler {
    pub fn new() -> Self {
        NoopPdfAssembler
    }
}

impl Default for NoopPdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

struct NoopBuilder {
    images: usize,
}

impl PdfAssembler for NoopPdfAssembler {
    fn is_ready(&self) -> bool {
        true
    }

    fn create_document(&self, _options: &DocumentOptions) -> Result<Box<dyn PdfBuilder>> {
        Ok(Box::new(NoopBuilder { images: 0 }))
    }
}

impl PdfBuilder for NoopBuilder {
    fn image_dimensions(&self, bitmap: &Bitmap) -> Result<(u32, u32)> {
        // Trust the declared header; the noop backend never decodes pixels.
        Ok((bitmap.width, bitmap.height))
    }

    fn add_image(&mut self, _bitmap: &Bitmap, _placement: &ImagePlacement) -> Result<()> {
        self.images += 1;
        Ok(())
    }

    fn save(self: Box<Self>, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "pdf-export")]
pub use printpdf_backend::PrintPdfAssembler;

#[cfg(feature = "pdf-export")]
mod printpdf_backend {
    use super::*;
    use crate::error::Error;
    use ::image::{Rgb, Rgba, RgbImage};
    use printpdf::*;
    use std::fs::File;
    use std::io::BufWriter;

    /// Production assembler backed by `printpdf`
    pub struct PrintPdfAssembler;

    impl PrintPdfAssembler {
        pub fn new() -> Self {
            PrintPdfAssembler
        }
    }

    impl Default for PrintPdfAssembler {
        fn default() -> Self {
            Self::new()
        }
    }

    struct PrintPdfBuilder {
        doc: PdfDocumentReference,
        page: PdfPageIndex,
        layer: PdfLayerIndex,
        page_height_mm: f32,
    }

    impl PdfAssembler for PrintPdfAssembler {
        fn is_ready(&self) -> bool {
            // The backend is linked in; there is nothing to load lazily.
            true
        }

        fn create_document(&self, options: &DocumentOptions) -> Result<Box<dyn PdfBuilder>> {
            let (width_mm, height_mm) = options.format.dimensions_mm(options.orientation);
            let (doc, page, layer) =
                PdfDocument::new(options.title.as_str(), Mm(width_mm), Mm(height_mm), "Layer 1");
            Ok(Box::new(PrintPdfBuilder {
                doc,
                page,
                layer,
                page_height_mm: height_mm,
            }))
        }
    }

    impl PdfBuilder for PrintPdfBuilder {
        fn image_dimensions(&self, bitmap: &Bitmap) -> Result<(u32, u32)> {
            let decoded =
                ::image::load_from_memory_with_format(&bitmap.png_data, ::image::ImageFormat::Png)
                    .map_err(|e| Error::AssemblyError(format!("Failed to decode capture: {}", e)))?;
            Ok(decoded.to_rgb8().dimensions())
        }

        fn add_image(&mut self, bitmap: &Bitmap, placement: &ImagePlacement) -> Result<()> {
            let decoded =
                ::image::load_from_memory_with_format(&bitmap.png_data, ::image::ImageFormat::Png)
                    .map_err(|e| Error::AssemblyError(format!("Failed to decode capture: {}", e)))?;

            // Composite any alpha onto white so transparency can never show
            // through as black in viewers.
            let rgba = decoded.to_rgba8();
            let (width_px, height_px) = rgba.dimensions();
            let mut rgb = RgbImage::new(width_px, height_px);
            for (x, y, pixel) in rgba.enumerate_pixels() {
                let Rgba([r, g, b, a]) = *pixel;
                let alpha = a as f32 / 255.0;
                let bg = 255.0;
                rgb.put_pixel(
                    x,
                    y,
                    Rgb([
                        (r as f32 * alpha + bg * (1.0 - alpha)) as u8,
                        (g as f32 * alpha + bg * (1.0 - alpha)) as u8,
                        (b as f32 * alpha + bg * (1.0 - alpha)) as u8,
                    ]),
                );
            }

            let image = Image::from(ImageXObject {
                width: Px(width_px as usize),
                height: Px(height_px as usize),
                color_space: ColorSpace::Rgb,
                bits_per_component: ColorBits::Bit8,
                interpolate: true,
                image_data: rgb.into_raw(),
                image_filter: None,
                clipping_bbox: None,
                smask: None,
            });

            // DPI chosen so the placed width is exact: dpi = px / (mm / 25.4)
            let dpi = width_px as f32 / (placement.width_mm / 25.4);

            // printpdf places from the bottom-left corner; placements are
            // specified from the top-left.
            let translate_y = self.page_height_mm - placement.y_mm - placement.height_mm;

            let layer = self.doc.get_page(self.page).get_layer(self.layer);
            image.add_to_layer(
                layer,
                ImageTransform {
                    translate_x: Some(Mm(placement.x_mm)),
                    translate_y: Some(Mm(translate_y)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );

            Ok(())
        }

        fn save(self: Box<Self>, path: &std::path::Path) -> Result<()> {
            let file = File::create(path)?;
            self.doc
                .save(&mut BufWriter::new(file))
                .map_err(|e| Error::AssemblyError(format!("Failed to save PDF: {}", e)))
        }
    }
}
