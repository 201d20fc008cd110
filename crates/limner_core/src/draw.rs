//! Painting surface abstraction
//!
//! `DrawContext` is the surface a document is rendered onto. It is
//! deliberately small: a save/restore state stack, an anti-aliasing hint,
//! a viewport, a current transform and clip, and raster compositing.
//! Implementations:
//!
//! - `limner_paint::Canvas` rasterizes into a `RasterImage` via tiny-skia
//! - [`RecordingContext`] records commands for inspection

use crate::geometry::{Affine2D, IntRect, Point, Rect};
use crate::raster::RasterImage;

/// A 2D painting surface
pub trait DrawContext {
    // ─────────────────────────────────────────────────────────────────────────
    // State Stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Push a copy of the current painting state (transform, clip, hints)
    fn save(&mut self);

    /// Pop the painting state pushed by the matching `save`
    ///
    /// Unbalanced calls are ignored.
    fn restore(&mut self);

    // ─────────────────────────────────────────────────────────────────────────
    // Hints
    // ─────────────────────────────────────────────────────────────────────────

    /// Enable or disable anti-aliasing for subsequent drawing
    fn set_antialiasing(&mut self, enabled: bool);

    /// Current anti-aliasing hint
    fn antialiasing(&self) -> bool;

    // ─────────────────────────────────────────────────────────────────────────
    // Geometry
    // ─────────────────────────────────────────────────────────────────────────

    /// The device rectangle drawing is mapped to
    fn viewport(&self) -> IntRect;

    /// Get the current transform
    fn current_transform(&self) -> Affine2D;

    /// Pre-multiply the current transform by `transform`
    fn concat_transform(&mut self, transform: Affine2D);

    /// Intersect the current clip with `rect` (in current user space)
    fn clip_rect(&mut self, rect: Rect);

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────────

    /// Composite a premultiplied raster at `origin` (in current user space)
    fn draw_image(&mut self, image: &RasterImage, origin: Point);
}

/// Extension methods for DrawContext
pub trait DrawContextExt: DrawContext {
    /// Run `f` between `save` and `restore`
    ///
    /// The restore happens even if `f` unwinds, so no state set inside
    /// leaks into the caller's later drawing.
    fn with_saved_state<R, F: FnOnce(&mut Self) -> R>(&mut self, f: F) -> R {
        struct Restore<'a, C: DrawContext + ?Sized>(&'a mut C);

        impl<C: DrawContext + ?Sized> Drop for Restore<'_, C> {
            fn drop(&mut self) {
                self.0.restore();
            }
        }

        self.save();
        let guard = Restore(self);
        f(&mut *guard.0)
    }

    /// Translate subsequent drawing
    fn translate(&mut self, x: f32, y: f32) {
        self.concat_transform(Affine2D::translation(x, y));
    }
}

// Blanket implementation for all DrawContext implementers
impl<T: DrawContext + ?Sized> DrawContextExt for T {}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and inspected
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    SetAntialiasing(bool),
    ConcatTransform(Affine2D),
    ClipRect(Rect),
    DrawImage { image: RasterImage, origin: Point },
}

#[derive(Clone, Copy, Debug)]
struct RecordedState {
    transform: Affine2D,
    antialiasing: bool,
}

impl Default for RecordedState {
    fn default() -> Self {
        Self {
            transform: Affine2D::IDENTITY,
            antialiasing: false,
        }
    }
}

/// A DrawContext that records commands instead of painting
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    state: RecordedState,
    stack: Vec<RecordedState>,
    viewport: IntRect,
}

impl RecordingContext {
    /// Create a new recording context
    pub fn new(viewport: IntRect) -> Self {
        Self {
            commands: Vec::new(),
            state: RecordedState::default(),
            stack: Vec::new(),
            viewport,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of unmatched `save` calls
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Images drawn so far
    pub fn images(&self) -> impl Iterator<Item = &RasterImage> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::DrawImage { image, .. } => Some(image),
            _ => None,
        })
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_antialiasing(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::SetAntialiasing(enabled));
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
        self.commands.push(DrawCommand::ConcatTransform(transform));
        self.state.transform = self.state.transform.then(&transform);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClipRect(rect));
    }

    fn draw_image(&mut self, image: &RasterImage, origin: Point) {
        self.commands.push(DrawCommand::DrawImage {
            image: image.clone(),
            origin,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntSize;

    #[test]
    fn test_save_restore_restores_state() {
        let mut ctx = RecordingContext::new(IntRect::from_size(IntSize::new(10, 10)));
        ctx.save();
        ctx.set_antialiasing(true);
        ctx.translate(5.0, 5.0);
        ctx.restore();

        assert!(!ctx.antialiasing());
        assert!(ctx.current_transform().is_identity());
        assert_eq!(ctx.save_depth(), 0);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        ctx.restore();
        assert_eq!(ctx.save_depth(), 0);
        assert_eq!(ctx.commands(), &[DrawCommand::Restore]);
    }

    #[test]
    fn test_with_saved_state_balances() {
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        let depth_inside = ctx.with_saved_state(|ctx| {
            ctx.set_antialiasing(true);
            ctx.save_depth()
        });

        assert_eq!(depth_inside, 1);
        assert_eq!(ctx.save_depth(), 0);
        assert!(!ctx.antialiasing());
        assert_eq!(ctx.commands().first(), Some(&DrawCommand::Save));
        assert_eq!(ctx.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_with_saved_state_restores_on_unwind() {
        let mut ctx = RecordingContext::new(IntRect::ZERO);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ctx.with_saved_state(|ctx| {
                ctx.set_antialiasing(true);
                panic!("boom");
            })
        }));

        assert!(result.is_err());
        assert_eq!(ctx.save_depth(), 0);
        assert!(!ctx.antialiasing());
    }
}
