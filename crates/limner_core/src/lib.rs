//! Limner Core
//!
//! Foundational types shared by the limner crates:
//!
//! - **Geometry**: points, sizes, rectangles and affine transforms in both
//!   document (real-valued) and pixel (integer) space
//! - **Raster**: an owned premultiplied-alpha RGBA image buffer
//! - **Draw Context**: the painting-surface trait documents render onto
//!
//! # Example
//!
//! ```rust
//! use limner_core::{DrawContext, DrawContextExt, IntRect, IntSize, RecordingContext};
//!
//! let mut ctx = RecordingContext::new(IntRect::from_size(IntSize::new(64, 64)));
//! ctx.with_saved_state(|ctx| ctx.set_antialiasing(true));
//! assert!(!ctx.antialiasing());
//! ```

pub mod draw;
pub mod geometry;
pub mod raster;

pub use draw::{DrawCommand, DrawContext, DrawContextExt, RecordingContext};
pub use geometry::{Affine2D, Color, IntRect, IntSize, Point, Rect, Size};
pub use raster::RasterImage;
