//! Canvas - a tiny-skia backed DrawContext
//!
//! A `Canvas` borrows a `RasterImage` for its lifetime and paints directly
//! into its premultiplied pixels. Dropping the canvas ends painting.

use limner_core::{Affine2D, Color, DrawContext, IntRect, Point, RasterImage, Rect};
use smallvec::SmallVec;
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, PixmapMut, PixmapPaint, PixmapRef,
};
use tracing::{trace, warn};

use crate::convert::{to_skia_color, to_skia_rect, to_skia_transform};

/// Painting state saved and restored by `save`/`restore`
#[derive(Clone)]
struct CanvasState {
    transform: Affine2D,
    antialiasing: bool,
    clip: Option<Mask>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Affine2D::IDENTITY,
            antialiasing: false,
            clip: None,
        }
    }
}

/// A painting surface bound to a `RasterImage`
pub struct Canvas<'a> {
    pixmap: PixmapMut<'a>,
    viewport: IntRect,
    state: CanvasState,
    stack: SmallVec<[CanvasState; 4]>,
}

impl<'a> Canvas<'a> {
    /// Open a canvas on `image`
    ///
    /// Returns `None` for a zero-sized image, which has nothing to paint on.
    pub fn new(image: &'a mut RasterImage) -> Option<Self> {
        let size = image.size();
        let pixmap = PixmapMut::from_bytes(image.data_mut(), size.width, size.height)?;

        Some(Self {
            pixmap,
            viewport: IntRect::from_size(size),
            state: CanvasState::default(),
            stack: SmallVec::new(),
        })
    }

    /// Fill the whole image, ignoring transform and clip
    pub fn clear(&mut self, color: Color) {
        let c = to_skia_color(&color).premultiply().to_color_u8();
        let rgba = [c.red(), c.green(), c.blue(), c.alpha()];
        for px in self.pixmap.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangle with a solid color in current user space
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = to_skia_rect(&rect) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_skia_color(&color));
        paint.anti_alias = self.state.antialiasing;

        self.pixmap.fill_rect(
            rect,
            &paint,
            to_skia_transform(&self.state.transform),
            self.state.clip.as_ref(),
        );
    }
}

impl DrawContext for Canvas<'_> {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => warn!("Canvas::restore called without a matching save"),
        }
    }

    fn set_antialiasing(&mut self, enabled: bool) {
        self.state.antialiasing = enabled;
    }

    fn antialiasing(&self) -> bool {
        self.state.antialiasing
    }

    fn viewport(&self) -> IntRect {
        self.viewport
    }

    fn current_transform(&self) -> Affine2D {
        self.state.transform
    }

    fn concat_transform(&mut self, transform: Affine2D) {
        self.state.transform = self.state.transform.then(&transform);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let ts = to_skia_transform(&self.state.transform);
        let path = to_skia_rect(&rect).map(PathBuilder::from_rect);
        let aa = self.state.antialiasing;

        if self.state.clip.is_none() {
            let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                return;
            };
            mask.data_mut().fill(255);
            self.state.clip = Some(mask);
        }

        if let Some(mask) = self.state.clip.as_mut() {
            match path {
                Some(path) => mask.intersect_path(&path, FillRule::Winding, aa, ts),
                // Clipping to an empty rect hides everything.
                None => mask.data_mut().fill(0),
            }
        }
    }

    fn draw_image(&mut self, image: &RasterImage, origin: Point) {
        let Some(src) = PixmapRef::from_bytes(image.data(), image.width(), image.height()) else {
            return;
        };

        trace!(
            "compositing {}x{} raster at ({}, {})",
            image.width(),
            image.height(),
            origin.x,
            origin.y
        );

        let quality = if self.state.antialiasing {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        let ts = to_skia_transform(&self.state.transform).pre_translate(origin.x, origin.y);

        self.pixmap
            .draw_pixmap(0, 0, src, &paint, ts, self.state.clip.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limner_core::{DrawContextExt, IntSize};

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn test_zero_size_image_has_no_canvas() {
        let mut img = RasterImage::new(IntSize::ZERO);
        assert!(Canvas::new(&mut img).is_none());
    }

    #[test]
    fn test_viewport_defaults_to_image() {
        let mut img = RasterImage::new(IntSize::new(40, 30));
        let canvas = Canvas::new(&mut img).unwrap();
        assert_eq!(canvas.viewport(), IntRect::new(0, 0, 40, 30));
    }

    #[test]
    fn test_fill_rect_respects_transform() {
        let mut img = RasterImage::new(IntSize::new(10, 10));
        {
            let mut canvas = Canvas::new(&mut img).unwrap();
            canvas.translate(5.0, 0.0);
            canvas.fill_rect(Rect::new(0.0, 0.0, 5.0, 10.0), Color::rgb(1.0, 0.0, 0.0));
        }

        assert_eq!(img.pixel(2, 5), Some([0, 0, 0, 0]));
        assert_eq!(img.pixel(7, 5), Some(RED));
    }

    #[test]
    fn test_restore_drops_clip() {
        let mut img = RasterImage::new(IntSize::new(10, 10));
        {
            let mut canvas = Canvas::new(&mut img).unwrap();
            canvas.with_saved_state(|c| {
                c.clip_rect(Rect::new(0.0, 0.0, 5.0, 10.0));
                c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::rgb(1.0, 0.0, 0.0));
            });
            assert_eq!(canvas.stack.len(), 0);
        }

        assert_eq!(img.pixel(2, 2), Some(RED));
        assert_eq!(img.pixel(8, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_clip_hides_drawing() {
        let mut img = RasterImage::new(IntSize::new(4, 4));
        {
            let mut canvas = Canvas::new(&mut img).unwrap();
            canvas.clip_rect(Rect::new(1.0, 1.0, 0.0, 2.0));
            canvas.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::rgb(1.0, 0.0, 0.0));
        }
        assert!(img.is_transparent());
    }

    #[test]
    fn test_draw_image_composites_at_origin() {
        let mut src = RasterImage::new(IntSize::new(2, 2));
        src.fill(RED);

        let mut img = RasterImage::new(IntSize::new(6, 6));
        {
            let mut canvas = Canvas::new(&mut img).unwrap();
            canvas.draw_image(&src, Point::new(3.0, 3.0));
        }

        assert_eq!(img.pixel(3, 3), Some(RED));
        assert_eq!(img.pixel(4, 4), Some(RED));
        assert_eq!(img.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clear_premultiplies() {
        let mut img = RasterImage::new(IntSize::new(2, 2));
        {
            let mut canvas = Canvas::new(&mut img).unwrap();
            canvas.clear(Color::rgba(1.0, 1.0, 1.0, 0.0));
        }
        assert!(img.is_transparent());
    }

    #[test]
    fn test_unbalanced_restore_keeps_state() {
        let mut img = RasterImage::new(IntSize::new(4, 4));
        let mut canvas = Canvas::new(&mut img).unwrap();
        canvas.set_antialiasing(true);
        canvas.restore();
        assert!(canvas.antialiasing());
    }
}
