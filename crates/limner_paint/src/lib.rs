//! Limner Paint
//!
//! A CPU painting surface for limner built on tiny-skia. [`Canvas`] binds to
//! a `RasterImage` and implements `DrawContext`, so documents can be
//! rasterized into plain premultiplied RGBA buffers.
//!
//! # Example
//!
//! ```rust
//! use limner_core::{Color, IntSize, RasterImage, Rect};
//! use limner_paint::Canvas;
//!
//! let mut image = RasterImage::new(IntSize::new(32, 32));
//! if let Some(mut canvas) = Canvas::new(&mut image) {
//!     canvas.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Color::BLACK);
//! }
//! assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 255]));
//! ```

mod canvas;
pub mod convert;

pub use canvas::Canvas;

use limner_core::RasterImage;

/// Encode a premultiplied raster as PNG
///
/// Returns `None` for a null image or if encoding fails.
pub fn encode_png(image: &RasterImage) -> Option<Vec<u8>> {
    let pixmap = tiny_skia::PixmapRef::from_bytes(image.data(), image.width(), image.height())?;
    pixmap.encode_png().ok()
}
