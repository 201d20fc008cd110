//! Per-renderer document state

use limner_core::Rect;

use crate::handle::DocumentHandle;
use crate::options::RenderOptions;

/// Everything a renderer knows about its current document
///
/// `options` is re-derived from the engine defaults on every reset, so a
/// reload never inherits the previous document's path or languages.
#[derive(Debug)]
pub(crate) struct Document<T> {
    pub handle: DocumentHandle<T>,
    pub options: RenderOptions,
    pub scale_factor: f32,
    pub view_box: Rect,
    pub error: Option<String>,
}

impl<T> Document<T> {
    pub fn new(defaults: RenderOptions) -> Self {
        let mut document = Self {
            handle: DocumentHandle::empty(),
            options: defaults,
            scale_factor: 1.0,
            view_box: Rect::ZERO,
            error: None,
        };
        document.init();
        document
    }

    /// Release the document and start over from `defaults`
    pub fn reset(&mut self, defaults: RenderOptions) {
        self.clear();
        self.options = defaults;
        self.init();
    }

    fn init(&mut self) {
        let options = std::mem::take(&mut self.options);
        self.options = options.initialize(self.scale_factor);
    }

    fn clear(&mut self) {
        self.handle.release();
        self.options.path = None;
        self.options.languages.clear();
        self.view_box = Rect::ZERO;
        self.error = None;
    }
}

impl<T> Drop for Document<T> {
    fn drop(&mut self) {
        self.clear();
    }
}
