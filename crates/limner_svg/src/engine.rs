//! The boundary to the SVG parsing and rasterization engine
//!
//! The renderer never looks inside a parsed document; everything it knows
//! about one comes through this trait. [`ResvgEngine`](crate::ResvgEngine)
//! is the production implementation.

use std::path::Path;

use limner_core::{Affine2D, DrawContext, IntSize, Rect};

use crate::options::RenderOptions;
use crate::status::Status;

/// An SVG engine
///
/// Parsed documents are immutable: every query takes `&Self::Tree`.
/// Dropping a tree releases it.
pub trait SvgEngine {
    /// A parsed document
    type Tree;

    /// Install the engine's log output
    ///
    /// Safe to call more than once; only the first call has an effect.
    fn init_log() {}

    /// Engine default options, before host-specific adjustments
    fn init_options(&self) -> RenderOptions {
        RenderOptions::default()
    }

    /// Parse a document from a file
    fn parse_tree_from_file(
        &self,
        path: &Path,
        options: &RenderOptions,
    ) -> Result<Self::Tree, Status>;

    /// Parse a document from bytes (plain or gzip-compressed)
    fn parse_tree_from_data(
        &self,
        data: &[u8],
        options: &RenderOptions,
    ) -> Result<Self::Tree, Status>;

    /// True if the document has nothing to render
    fn is_image_empty(&self, tree: &Self::Tree) -> bool;

    /// Intrinsic pixel size
    fn image_size(&self, tree: &Self::Tree) -> IntSize;

    /// Declared view box
    fn image_view_box(&self, tree: &Self::Tree) -> Rect;

    /// Bounding box of all rendered content
    fn image_bbox(&self, tree: &Self::Tree) -> Option<Rect>;

    fn node_exists(&self, tree: &Self::Tree, id: &str) -> bool;

    /// Transform of the node with `id`, including its ancestors'
    fn node_transform(&self, tree: &Self::Tree, id: &str) -> Option<Affine2D>;

    /// Bounding box of the node with `id` in its own coordinate system
    fn node_bbox(&self, tree: &Self::Tree, id: &str) -> Option<Rect>;

    /// Render the whole document scaled into `size` on `ctx`
    fn render_to_canvas(
        &self,
        tree: &Self::Tree,
        options: &RenderOptions,
        size: IntSize,
        ctx: &mut dyn DrawContext,
    );

    /// Render only the node with `id` scaled into `size` on `ctx`
    fn render_to_canvas_by_id(
        &self,
        tree: &Self::Tree,
        options: &RenderOptions,
        size: IntSize,
        id: &str,
        ctx: &mut dyn DrawContext,
    );
}
