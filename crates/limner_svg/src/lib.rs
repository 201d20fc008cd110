//! SVG documents for limner
//!
//! [`SvgRenderer`] owns at most one parsed document at a time. It loads
//! from files, bundled `:/` resources or bytes, answers size, view box and
//! per-element queries, and paints onto any [`DrawContext`] or into a new
//! [`RasterImage`]. Parsing and rasterization go through the [`SvgEngine`]
//! trait; [`ResvgEngine`] implements it with `usvg` and `resvg`.
//!
//! # Example
//!
//! ```rust
//! use limner_core::IntSize;
//! use limner_svg::SvgRenderer;
//!
//! let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
//!     <rect id="r" width="50" height="50"/>
//! </svg>"#;
//!
//! let renderer = SvgRenderer::from_data(svg);
//! assert!(renderer.is_valid());
//! assert_eq!(renderer.default_size(), IntSize::new(100, 100));
//!
//! let image = renderer.render_to_image(Some(IntSize::new(32, 32)));
//! assert_eq!(image.size(), IntSize::new(32, 32));
//! ```
//!
//! [`DrawContext`]: limner_core::DrawContext
//! [`RasterImage`]: limner_core::RasterImage

mod document;
pub mod engine;
mod error;
mod handle;
pub mod locale;
pub mod options;
mod renderer;
pub mod resources;
mod resvg_engine;
pub mod status;
mod view_box;

pub use engine::SvgEngine;
pub use error::{Result, SvgError};
pub use handle::DocumentHandle;
pub use options::{FitTo, ImageRendering, RenderOptions, ShapeRendering, TextRendering};
pub use renderer::SvgRenderer;
pub use resources::BundledResources;
pub use resvg_engine::{ResvgEngine, ResvgTree};
pub use status::{error_to_string, Status};
