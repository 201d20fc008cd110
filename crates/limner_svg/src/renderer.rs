//! The document renderer

use std::fmt;
use std::path::Path;

use limner_core::{
    Affine2D, DrawContext, DrawContextExt, IntRect, IntSize, RasterImage, Rect, Size,
};
use limner_paint::Canvas;
use tracing::{debug, trace, warn};

use crate::document::Document;
use crate::engine::SvgEngine;
use crate::error::{Result, SvgError};
use crate::options::RenderOptions;
use crate::resources::{resource_name, BundledResources};
use crate::resvg_engine::ResvgEngine;
use crate::status::{error_to_string, Status};

/// Loads one SVG document at a time, answers queries about it and paints
/// it onto a [`DrawContext`]
///
/// Every load starts from a clean state: the previous document, its path
/// and its error message are released before the new parse, whether or not
/// the parse succeeds. Queries on a renderer without a document return
/// zero rectangles, the identity transform or `false`.
///
/// ```rust,no_run
/// use limner_svg::SvgRenderer;
///
/// let mut renderer = SvgRenderer::new();
/// if renderer.load_file("icon.svg").is_ok() {
///     let image = renderer.render_to_image(None);
///     assert_eq!(image.size(), renderer.default_size());
/// }
/// ```
pub struct SvgRenderer<E: SvgEngine = ResvgEngine> {
    engine: E,
    document: Document<E::Tree>,
    resources: BundledResources,
}

impl SvgRenderer {
    /// An empty renderer using the resvg engine
    pub fn new() -> Self {
        Self::with_engine(ResvgEngine::new())
    }

    /// Create a renderer and load `path` into it
    ///
    /// The renderer is returned even if loading fails; check
    /// [`is_valid`](Self::is_valid) and [`error_string`](Self::error_string).
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let mut renderer = Self::new();
        // The failure is recorded in the renderer's error state.
        let _ = renderer.load_file(path);
        renderer
    }

    /// Create a renderer and load `data` into it
    pub fn from_data(data: &[u8]) -> Self {
        let mut renderer = Self::new();
        let _ = renderer.load_data(data);
        renderer
    }

    /// Install the engine's log output
    pub fn init_log() {
        ResvgEngine::init_log();
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SvgEngine> SvgRenderer<E> {
    /// An empty renderer using `engine`
    pub fn with_engine(engine: E) -> Self {
        let document = Document::new(engine.init_options());
        Self {
            engine,
            document,
            resources: BundledResources::new(),
        }
    }

    /// Use `resources` to resolve `:/` paths
    pub fn with_resources(mut self, resources: BundledResources) -> Self {
        self.resources = resources;
        self
    }

    /// Resources that `:/` paths resolve against
    pub fn resources(&self) -> &BundledResources {
        &self.resources
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────

    /// Load a document from a file or a `:/` bundled resource
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(name) = resource_name(path) {
            return match self.resources.read(name) {
                Some(data) => self.load_data(&data),
                None => {
                    self.reset();
                    let err = SvgError::ResourceNotFound(name.to_string());
                    warn!("{}", err);
                    self.document.error = Some(err.to_string());
                    Err(err)
                }
            };
        }

        self.reset();
        debug!("loading SVG file '{}'", path.display());
        self.document.options.path = Some(path.to_path_buf());
        let result = self
            .engine
            .parse_tree_from_file(path, &self.document.options);
        self.finish_load(result)
    }

    /// Load a document from bytes, plain or gzip-compressed
    pub fn load_data(&mut self, data: &[u8]) -> Result<()> {
        self.reset();
        debug!("loading SVG data ({} bytes)", data.len());
        let result = self
            .engine
            .parse_tree_from_data(data, &self.document.options);
        self.finish_load(result)
    }

    fn finish_load(&mut self, result: std::result::Result<E::Tree, Status>) -> Result<()> {
        match result {
            Ok(tree) => {
                self.document.view_box = self.engine.image_view_box(&tree);
                self.document.handle.replace(tree);
                trace!("view box {:?}", self.document.view_box);
                Ok(())
            }
            Err(status) => {
                // An engine reporting failure with `Ok` still failed.
                let status = if status.is_ok() {
                    Status::ParsingFailed
                } else {
                    status
                };
                warn!("SVG load failed: {}", status);
                self.document.error = Some(error_to_string(status).to_string());
                Err(SvgError::Engine(status))
            }
        }
    }

    /// Drop the current document and return to the freshly-constructed state
    pub fn reset(&mut self) {
        let defaults = self.engine.init_options();
        self.document.reset(defaults);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// True if a document is loaded
    pub fn is_valid(&self) -> bool {
        !self.document.handle.is_null()
    }

    /// True if there is no document or it has nothing to render
    pub fn is_empty(&self) -> bool {
        self.document
            .handle
            .get()
            .map_or(true, |tree| self.engine.is_image_empty(tree))
    }

    /// Message of the last failed load, empty if there is none
    pub fn error_string(&self) -> &str {
        self.document.error.as_deref().unwrap_or("")
    }

    /// Size of the view box, rounded to whole pixels
    ///
    /// Zero when no document is loaded.
    pub fn default_size(&self) -> IntSize {
        self.view_box().size()
    }

    /// Unrounded [`default_size`](Self::default_size)
    pub fn default_size_f(&self) -> Size {
        self.view_box_f().size()
    }

    /// [`view_box_f`](Self::view_box_f) rounded to whole pixels
    pub fn view_box(&self) -> IntRect {
        self.view_box_f().to_int_rect()
    }

    /// The root element's `viewBox` in user units
    ///
    /// Documents without one report `(0, 0, width, height)`; with no
    /// document loaded this is empty.
    pub fn view_box_f(&self) -> Rect {
        if self.is_valid() {
            self.document.view_box
        } else {
            Rect::ZERO
        }
    }

    /// Bounding box of the element `id` in its own coordinates
    pub fn bounds_on_element(&self, id: &str) -> Rect {
        self.document
            .handle
            .get()
            .and_then(|tree| self.engine.node_bbox(tree, id))
            .unwrap_or(Rect::ZERO)
    }

    /// Bounding box of everything the document renders
    pub fn bounding_box(&self) -> Rect {
        self.document
            .handle
            .get()
            .and_then(|tree| self.engine.image_bbox(tree))
            .unwrap_or(Rect::ZERO)
    }

    /// True if the loaded document has an element with `id`
    ///
    /// An empty id never matches.
    pub fn element_exists(&self, id: &str) -> bool {
        self.document
            .handle
            .get()
            .is_some_and(|tree| self.engine.node_exists(tree, id))
    }

    /// Accumulated transform of the element `id`
    pub fn transform_for_element(&self, id: &str) -> Affine2D {
        self.document
            .handle
            .get()
            .and_then(|tree| self.engine.node_transform(tree, id))
            .unwrap_or(Affine2D::IDENTITY)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────

    /// Set the device scale factor
    ///
    /// Takes effect on the next load or reset.
    pub fn set_device_pixel_ratio(&mut self, scale_factor: f32) {
        self.document.scale_factor = scale_factor;
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.document.scale_factor
    }

    pub fn options(&self) -> &RenderOptions {
        &self.document.options
    }

    /// Options for the next render
    ///
    /// Parse-time fields (dpi, fonts, languages, rendering modes) only
    /// affect documents loaded after the change, and a load resets them.
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.document.options
    }

    /// The default size scaled by the configured fit mode
    pub fn fitted_size(&self) -> Option<IntSize> {
        self.document.options.fit_to.fit_to_size(self.default_size())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Paint the document scaled into `ctx`'s viewport
    ///
    /// The context's state is restored afterwards.
    pub fn render(&self, ctx: &mut dyn DrawContext) {
        let Some(tree) = self.document.handle.get() else {
            return;
        };

        ctx.with_saved_state(|ctx| {
            ctx.set_antialiasing(true);
            let size = ctx.viewport().size();
            self.engine
                .render_to_canvas(tree, &self.document.options, size, ctx);
        });
    }

    /// Rasterize into a new transparent image
    ///
    /// `None` renders at [`default_size`](Self::default_size).
    pub fn render_to_image(&self, size: Option<IntSize>) -> RasterImage {
        let size = size.unwrap_or_else(|| self.default_size());
        let mut image = RasterImage::new(size);

        if let Some(mut canvas) = Canvas::new(&mut image) {
            self.render(&mut canvas);
        }
        image
    }
}

impl<E: SvgEngine> fmt::Debug for SvgRenderer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("handle", &self.document.handle)
            .field("view_box", &self.document.view_box)
            .field("error", &self.document.error)
            .field("resources", &self.resources.len())
            .finish()
    }
}
