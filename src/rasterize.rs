//! Rasterization capability
//!
//! The export pipeline consumes a [`Rasterizer`] rather than calling a
//! rendering library directly, so backends can be swapped and tests can
//! substitute doubles. The production backend renders the document markup
//! with `resvg` into a `tiny-skia` pixmap.

use crate::error::{Error, Result};

/// A captured bitmap of the rendered document region
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded pixel data
    pub png_data: Vec<u8>,
}

impl Bitmap {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            png_data: Vec::new(),
        }
    }
}

/// Options for a capture
///
/// `scale` is the oversampling factor applied to the capture resolution so
/// text stays sharp in print. `background` is always composited underneath
/// the markup, so transparent styling never leaks into the capture.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Oversampling factor; capture pixels per document pixel
    pub scale: f32,
    /// Background color, RGBA
    pub background: (u8, u8, u8, u8),
    /// Whether the backend may resolve resources referenced by the markup
    /// from outside the document (linked images). The agreement template is
    /// self-contained, so this stays off.
    pub allow_external_resources: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: (255, 255, 255, 255),
            allow_external_resources: false,
        }
    }
}

/// Capability for converting rendered markup into a bitmap
pub trait Rasterizer: Send + Sync {
    /// Whether the backend has finished loading and can capture.
    fn is_ready(&self) -> bool;

    /// Capture the given markup as a bitmap.
    fn render(&self, markup: &str, options: &RasterOptions) -> Result<Bitmap>;
}

/// Noop rasterizer used in unit tests and as a safe default for wiring tests.
/// Reports the dimensions a real capture of the agreement page would have,
/// with an empty pixel buffer.
pub struct NoopRasterizer;

impl NoopRasterizer {
    /// Unscaled size of the agreement page in document pixels
    pub const BASE_SIZE: (u32, u32) = (794, 1123);

    pub fn new() -> Self {
        NoopRasterizer
    }
}

impl Default for NoopRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for NoopRasterizer {
    fn is_ready(&self) -> bool {
        true
    }

    fn render(&self, _markup: &str, options: &RasterOptions) -> Result<Bitmap> {
        let (w, h) = Self::BASE_SIZE;
        Ok(Bitmap::empty(
            (w as f32 * options.scale).round() as u32,
            (h as f32 * options.scale).round() as u32,
        ))
    }
}

#[cfg(feature = "svg-raster")]
pub use svg::SvgRasterizer;

#[cfg(feature = "svg-raster")]
mod svg {
    use super::{Bitmap, Error, RasterOptions, Rasterizer, Result};
    use std::sync::Arc;

    /// Production rasterizer backed by `resvg`
    ///
    /// Fonts are resolved against the system font database, which is scanned
    /// once at construction. `is_ready` reports whether that scan found any
    /// faces; without fonts the capture would silently drop all text, which
    /// is treated the same as the library not having finished loading.
    pub struct SvgRasterizer {
        fontdb: Arc<fontdb::Database>,
    }

    impl SvgRasterizer {
        pub fn new() -> Self {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Self {
                fontdb: Arc::new(db),
            }
        }

        /// Build a rasterizer over an explicit font database (used by tests
        /// and embedders that bundle their own fonts).
        pub fn with_fontdb(fontdb: fontdb::Database) -> Self {
            Self {
                fontdb: Arc::new(fontdb),
            }
        }
    }

    impl Default for SvgRasterizer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Rasterizer for SvgRasterizer {
        fn is_ready(&self) -> bool {
            self.fontdb.len() > 0
        }

        fn render(&self, markup: &str, options: &RasterOptions) -> Result<Bitmap> {
            let mut opt = usvg::Options::default();
            opt.fontdb = self.fontdb.clone();

            let tree = usvg::Tree::from_str(markup, &opt)
                .map_err(|e| Error::RasterError(format!("Failed to parse markup: {}", e)))?;

            let size = tree.size();
            let width = (size.width() * options.scale).round().max(1.0) as u32;
            let height = (size.height() * options.scale).round().max(1.0) as u32;

            let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
                Error::RasterError(format!("Invalid capture size {}x{}", width, height))
            })?;

            let (r, g, b, a) = options.background;
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

            resvg::render(
                &tree,
                tiny_skia::Transform::from_scale(options.scale, options.scale),
                &mut pixmap.as_mut(),
            );

            let png_data = pixmap
                .encode_png()
                .map_err(|e| Error::RasterError(format!("Failed to encode capture: {}", e)))?;

            Ok(Bitmap {
                width,
                height,
                png_data,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const RECT_MARKUP: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="60">
            <rect x="10" y="10" width="40" height="20" fill="#f28e1c"/>
        </svg>"##;

        #[test]
        fn render_applies_oversampling_scale() {
            let rasterizer = SvgRasterizer::with_fontdb(fontdb::Database::new());
            let bitmap = rasterizer
                .render(RECT_MARKUP, &RasterOptions::default())
                .expect("render failed");
            assert_eq!(bitmap.width, 200);
            assert_eq!(bitmap.height, 120);
            assert!(!bitmap.png_data.is_empty());
        }

        #[test]
        fn render_rejects_malformed_markup() {
            let rasterizer = SvgRasterizer::with_fontdb(fontdb::Database::new());
            let err = rasterizer
                .render("not markup at all", &RasterOptions::default())
                .unwrap_err();
            assert!(matches!(err, Error::RasterError(_)));
        }

        #[test]
        fn empty_fontdb_reports_not_ready() {
            let rasterizer = SvgRasterizer::with_fontdb(fontdb::Database::new());
            assert!(!rasterizer.is_ready());
        }
    }
}
