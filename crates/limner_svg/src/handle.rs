//! Move-only ownership of an engine document

use std::fmt;

/// Owns at most one parsed engine document
///
/// Not `Clone`: a document has exactly one owner. The document is dropped
/// by [`release`](Self::release) or when the handle itself is dropped,
/// whichever comes first, and never twice.
pub struct DocumentHandle<T> {
    tree: Option<T>,
}

impl<T> DocumentHandle<T> {
    /// A handle that owns nothing
    pub const fn empty() -> Self {
        Self { tree: None }
    }

    pub fn new(tree: T) -> Self {
        Self { tree: Some(tree) }
    }

    pub fn is_null(&self) -> bool {
        self.tree.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.tree.as_ref()
    }

    /// Take ownership of `tree`, releasing any previous document first
    pub fn replace(&mut self, tree: T) {
        self.release();
        self.tree = Some(tree);
    }

    /// Drop the owned document, if any
    ///
    /// Returns `true` if something was released. Safe to call repeatedly.
    pub fn release(&mut self) -> bool {
        self.tree.take().is_some()
    }
}

impl<T> Default for DocumentHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for DocumentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("loaded", &self.tree.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_release_is_idempotent() {
        let tree = Rc::new(());
        let mut handle = DocumentHandle::new(Rc::clone(&tree));
        assert_eq!(Rc::strong_count(&tree), 2);

        assert!(handle.release());
        assert!(!handle.release());
        assert!(handle.is_null());
        assert_eq!(Rc::strong_count(&tree), 1);
    }

    #[test]
    fn test_replace_releases_previous() {
        let first = Rc::new(1);
        let second = Rc::new(2);
        let mut handle = DocumentHandle::new(Rc::clone(&first));

        handle.replace(Rc::clone(&second));
        assert_eq!(Rc::strong_count(&first), 1);
        assert_eq!(handle.get().map(|t| **t), Some(2));

        drop(handle);
        assert_eq!(Rc::strong_count(&second), 1);
    }
}
