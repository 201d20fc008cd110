//! SvgEngine implementation backed by usvg and resvg
//!
//! usvg parses and simplifies the document; resvg rasterizes it with
//! tiny-skia into a premultiplied buffer that is then composited onto the
//! caller's `DrawContext`.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use limner_core::{Affine2D, DrawContext, IntSize, Point, RasterImage, Rect};
use limner_paint::convert::{from_skia_rect, from_skia_transform, to_skia_color};
use tiny_skia::{Pixmap, Transform};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use usvg::{roxmltree, Tree};

use crate::engine::SvgEngine;
use crate::options::{ImageRendering, RenderOptions, ShapeRendering, TextRendering};
use crate::status::Status;
use crate::view_box::ViewBox;

/// The usvg/resvg engine
///
/// Carries the option defaults every load starts from.
#[derive(Clone, Debug, Default)]
pub struct ResvgEngine {
    defaults: RenderOptions,
}

impl ResvgEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose loads start from `defaults`
    ///
    /// The font family, languages and dpi are still derived per load.
    pub fn with_defaults(defaults: RenderOptions) -> Self {
        Self { defaults }
    }
}

/// A parsed document and the view box its root element declares
#[derive(Debug)]
pub struct ResvgTree {
    tree: Tree,
    view_box: ViewBox,
}

impl ResvgTree {
    /// Transform from user space back out of usvg's root coordinates
    fn user_space(&self) -> Transform {
        self.view_box
            .to_transform(self.tree.size())
            .invert()
            .unwrap_or_default()
    }
}

impl SvgEngine for ResvgEngine {
    type Tree = ResvgTree;

    fn init_log() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();
        if !installed {
            debug!("a global tracing subscriber is already installed");
        }
    }

    fn init_options(&self) -> RenderOptions {
        self.defaults.clone()
    }

    fn parse_tree_from_file(
        &self,
        path: &Path,
        options: &RenderOptions,
    ) -> Result<ResvgTree, Status> {
        if !has_svg_suffix(path) {
            return Err(Status::InvalidFileSuffix);
        }

        let data = fs::read(path).map_err(|e| {
            warn!("Failed to read '{}': {}", path.display(), e);
            Status::ParsingFailed
        })?;

        self.parse_tree_from_data(&data, options)
    }

    fn parse_tree_from_data(
        &self,
        data: &[u8],
        options: &RenderOptions,
    ) -> Result<ResvgTree, Status> {
        let mut opt = usvg::Options::default();
        apply_options(options, &mut opt);

        let tree = parse_document(data, &opt).map_err(|e| {
            debug!("usvg rejected document: {}", e);
            status_from_error(&e)
        })?;

        let size = tree.tree.size();
        debug!(
            "parsed SVG document {}x{}, view box {:?}",
            size.width(),
            size.height(),
            tree.view_box.rect
        );
        Ok(tree)
    }

    fn is_image_empty(&self, tree: &ResvgTree) -> bool {
        !has_content(tree.tree.root())
    }

    fn image_size(&self, tree: &ResvgTree) -> IntSize {
        let size = tree.tree.size();
        IntSize::new(size.width().ceil() as u32, size.height().ceil() as u32)
    }

    fn image_view_box(&self, tree: &ResvgTree) -> Rect {
        tree.view_box.rect
    }

    fn image_bbox(&self, tree: &ResvgTree) -> Option<Rect> {
        let root = tree.tree.root();
        if !has_content(root) {
            return None;
        }
        root.bounding_box()
            .transform(tree.user_space())
            .map(|bbox| from_skia_rect(&bbox))
    }

    fn node_exists(&self, tree: &ResvgTree, id: &str) -> bool {
        find_node(&tree.tree, id).is_some()
    }

    fn node_transform(&self, tree: &ResvgTree, id: &str) -> Option<Affine2D> {
        find_node(&tree.tree, id).map(|node| {
            let ts = tree.user_space().pre_concat(node.abs_transform());
            from_skia_transform(&ts)
        })
    }

    fn node_bbox(&self, tree: &ResvgTree, id: &str) -> Option<Rect> {
        find_node(&tree.tree, id).map(|node| from_skia_rect(&node.bounding_box()))
    }

    fn render_to_canvas(
        &self,
        tree: &ResvgTree,
        options: &RenderOptions,
        size: IntSize,
        ctx: &mut dyn DrawContext,
    ) {
        let Some(mut pixmap) = background_pixmap(options, size) else {
            return;
        };

        resvg::render(&tree.tree, fit_transform(&tree.tree, size), &mut pixmap.as_mut());
        composite(pixmap, size, ctx);
    }

    fn render_to_canvas_by_id(
        &self,
        tree: &ResvgTree,
        options: &RenderOptions,
        size: IntSize,
        id: &str,
        ctx: &mut dyn DrawContext,
    ) {
        let Some(node) = find_node(&tree.tree, id) else {
            warn!("no element with id '{}' to render", id);
            return;
        };
        let Some(mut pixmap) = background_pixmap(options, size) else {
            return;
        };

        let ts = fit_transform(&tree.tree, size);
        if resvg::render_node(node, ts, &mut pixmap.as_mut()).is_none() {
            debug!("element '{}' has nothing to render", id);
        }
        composite(pixmap, size, ctx);
    }
}

/// Parse like `Tree::from_data`, keeping the XML long enough to read the
/// root view box
fn parse_document(data: &[u8], opt: &usvg::Options) -> Result<ResvgTree, usvg::Error> {
    let inflated;
    let data = if data.starts_with(&[0x1f, 0x8b]) {
        inflated = usvg::decompress_svgz(data)?;
        inflated.as_slice()
    } else {
        data
    };

    let text = std::str::from_utf8(data).map_err(|_| usvg::Error::NotAnUtf8Str)?;
    let xml_opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, xml_opt)
        .map_err(usvg::Error::ParsingFailed)?;

    let tree = Tree::from_xmltree(&doc, opt)?;
    let view_box = ViewBox::from_document(&doc, tree.size());
    Ok(ResvgTree { tree, view_box })
}

/// True if any descendant draws something
///
/// Groups alone do not count: usvg wraps non-trivial view boxes in a
/// group even when the document is empty.
fn has_content(group: &usvg::Group) -> bool {
    group.children().iter().any(|node| match node {
        usvg::Node::Group(group) => has_content(group),
        _ => true,
    })
}

fn has_svg_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"))
        .unwrap_or(false)
}

fn find_node<'a>(tree: &'a Tree, id: &str) -> Option<&'a usvg::Node> {
    if id.is_empty() {
        return None;
    }
    tree.node_by_id(id)
}

fn status_from_error(err: &usvg::Error) -> Status {
    match err {
        usvg::Error::NotAnUtf8Str => Status::NotUtf8,
        usvg::Error::MalformedGZip => Status::MalformedGzip,
        usvg::Error::InvalidSize => Status::InvalidSize,
        _ => Status::ParsingFailed,
    }
}

/// Copy limner options onto usvg's
///
/// `keep_named_groups` has no usvg counterpart: usvg always keeps groups
/// that carry an id.
fn apply_options(options: &RenderOptions, opt: &mut usvg::Options) {
    opt.resources_dir = options
        .path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    opt.dpi = options.dpi;
    opt.font_family = options.font_family.clone();
    opt.font_size = options.font_size;
    opt.languages = options.languages.clone();
    opt.shape_rendering = match options.shape_rendering {
        ShapeRendering::OptimizeSpeed => usvg::ShapeRendering::OptimizeSpeed,
        ShapeRendering::CrispEdges => usvg::ShapeRendering::CrispEdges,
        ShapeRendering::GeometricPrecision => usvg::ShapeRendering::GeometricPrecision,
    };
    opt.text_rendering = match options.text_rendering {
        TextRendering::OptimizeSpeed => usvg::TextRendering::OptimizeSpeed,
        TextRendering::OptimizeLegibility => usvg::TextRendering::OptimizeLegibility,
        TextRendering::GeometricPrecision => usvg::TextRendering::GeometricPrecision,
    };
    opt.image_rendering = match options.image_rendering {
        ImageRendering::OptimizeQuality => usvg::ImageRendering::OptimizeQuality,
        ImageRendering::OptimizeSpeed => usvg::ImageRendering::OptimizeSpeed,
    };
}

/// A pixmap of `size`, pre-filled with the background when requested
fn background_pixmap(options: &RenderOptions, size: IntSize) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(size.width, size.height)?;
    if options.draw_background {
        pixmap.fill(to_skia_color(&options.background));
    }
    Some(pixmap)
}

/// Scale the document to fit `size` keeping aspect ratio, centered
fn fit_transform(tree: &Tree, size: IntSize) -> Transform {
    let svg_size = tree.size();
    let scale_x = size.width as f32 / svg_size.width();
    let scale_y = size.height as f32 / svg_size.height();
    let scale = scale_x.min(scale_y);

    let offset_x = (size.width as f32 - svg_size.width() * scale) / 2.0;
    let offset_y = (size.height as f32 - svg_size.height() * scale) / 2.0;

    Transform::from_scale(scale, scale).post_translate(offset_x, offset_y)
}

fn composite(pixmap: Pixmap, size: IntSize, ctx: &mut dyn DrawContext) {
    match RasterImage::from_vec(size, pixmap.take()) {
        Some(image) => ctx.draw_image(&image, Point::ZERO),
        None => warn!("rasterized buffer does not match {}x{}", size.width, size.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limner_core::{IntRect, RecordingContext};

    const SCENE: &str = r#"
        <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
            <rect id="box" x="10" y="20" width="30" height="40" fill="red"/>
            <g id="group" transform="translate(5 6)">
                <circle id="dot" cx="50" cy="50" r="10" fill="blue"/>
            </g>
        </svg>
    "#;

    const EMPTY: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"/>"#;

    fn parse(svg: &str) -> ResvgTree {
        ResvgEngine::new()
            .parse_tree_from_data(svg.as_bytes(), &RenderOptions::default())
            .unwrap()
    }

    #[test]
    fn test_parse_reports_size() {
        let tree = parse(SCENE);
        assert_eq!(ResvgEngine::new().image_size(&tree), IntSize::new(100, 100));
        assert_eq!(ResvgEngine::new().image_view_box(&tree), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!ResvgEngine::new().is_image_empty(&tree));
    }

    #[test]
    fn test_empty_document() {
        let tree = parse(EMPTY);
        assert!(ResvgEngine::new().is_image_empty(&tree));
        assert_eq!(ResvgEngine::new().image_bbox(&tree), None);
    }

    #[test]
    fn test_garbage_is_parsing_failure() {
        let err = ResvgEngine::new()
            .parse_tree_from_data(b"definitely not svg", &RenderOptions::default())
            .unwrap_err();
        assert_eq!(err, Status::ParsingFailed);
    }

    #[test]
    fn test_invalid_utf8() {
        let err = ResvgEngine::new()
            .parse_tree_from_data(&[0x3c, 0xff, 0xfe, 0x3e], &RenderOptions::default())
            .unwrap_err();
        assert_eq!(err, Status::NotUtf8);
    }

    #[test]
    fn test_bad_gzip() {
        let err = ResvgEngine::new()
            .parse_tree_from_data(&[0x1f, 0x8b, 0x00, 0x01], &RenderOptions::default())
            .unwrap_err();
        assert_eq!(err, Status::MalformedGzip);
    }

    #[test]
    fn test_file_suffix_is_checked() {
        let err = ResvgEngine::new()
            .parse_tree_from_file(Path::new("drawing.png"), &RenderOptions::default())
            .unwrap_err();
        assert_eq!(err, Status::InvalidFileSuffix);
        assert!(has_svg_suffix(Path::new("a/b/Drawing.SVGZ")));
    }

    #[test]
    fn test_node_queries() {
        let tree = parse(SCENE);
        assert!(ResvgEngine::new().node_exists(&tree, "box"));
        assert!(!ResvgEngine::new().node_exists(&tree, "nope"));
        assert!(!ResvgEngine::new().node_exists(&tree, ""));

        let bbox = ResvgEngine::new().node_bbox(&tree, "box").unwrap();
        assert_eq!(bbox, Rect::new(10.0, 20.0, 30.0, 40.0));

        let ts = ResvgEngine::new().node_transform(&tree, "dot").unwrap();
        assert_eq!(ts, Affine2D::translation(5.0, 6.0));
    }

    #[test]
    fn test_view_box_differs_from_size() {
        let tree = parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50" viewBox="10 20 100 100">
                <rect id="box" x="10" y="20" width="30" height="40"/>
                <g transform="translate(5 6)"><circle id="dot" cx="50" cy="50" r="10"/></g>
            </svg>"#,
        );
        let engine = ResvgEngine::new();

        assert_eq!(engine.image_size(&tree), IntSize::new(50, 50));
        assert_eq!(engine.image_view_box(&tree), Rect::new(10.0, 20.0, 100.0, 100.0));
        assert_eq!(engine.node_transform(&tree, "box"), Some(Affine2D::IDENTITY));
        assert_eq!(
            engine.node_transform(&tree, "dot"),
            Some(Affine2D::translation(5.0, 6.0))
        );

        let bbox = engine.image_bbox(&tree).unwrap();
        assert!((bbox.x() - 10.0).abs() < 1e-3);
        assert!((bbox.y() - 20.0).abs() < 1e-3);
        assert!((bbox.width() - 55.0).abs() < 1e-3);
        assert!((bbox.height() - 46.0).abs() < 1e-3);
    }

    #[test]
    fn test_groups_alone_are_empty() {
        let tree = parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 100 100">
                <g id="outer"><g id="inner"/></g>
            </svg>"#,
        );
        assert!(ResvgEngine::new().is_image_empty(&tree));
    }

    #[test]
    fn test_render_to_canvas_draws_requested_size() {
        let tree = parse(SCENE);
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        ResvgEngine::new().render_to_canvas(
            &tree,
            &RenderOptions::default(),
            IntSize::new(50, 50),
            &mut ctx,
        );

        let images: Vec<_> = ctx.images().collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].size(), IntSize::new(50, 50));
        assert!(!images[0].is_transparent());
    }

    #[test]
    fn test_render_draws_background() {
        let tree = parse(EMPTY);
        let options = RenderOptions {
            draw_background: true,
            ..Default::default()
        };
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        ResvgEngine::new().render_to_canvas(&tree, &options, IntSize::new(4, 4), &mut ctx);

        let image = ctx.images().next().unwrap();
        assert_eq!(image.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_render_by_unknown_id_draws_nothing() {
        let tree = parse(SCENE);
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        ResvgEngine::new().render_to_canvas_by_id(
            &tree,
            &RenderOptions::default(),
            IntSize::new(10, 10),
            "nope",
            &mut ctx,
        );
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_render_zero_size_is_noop() {
        let tree = parse(SCENE);
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        ResvgEngine::new().render_to_canvas(&tree, &RenderOptions::default(), IntSize::ZERO, &mut ctx);
        assert!(ctx.commands().is_empty());
    }
}
