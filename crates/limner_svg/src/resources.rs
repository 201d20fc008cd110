//! In-process bundled resources
//!
//! Paths starting with `:/` name a resource registered with the renderer
//! instead of a file, e.g. `:/icons/close.svg`.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Prefix marking a bundled-resource path
pub const RESOURCE_SCHEME: &str = ":/";

/// The resource name a path refers to, if it uses the bundled scheme
pub fn resource_name(path: &Path) -> Option<&str> {
    path.to_str()?.strip_prefix(RESOURCE_SCHEME)
}

/// Named byte blobs available to `:/` paths
#[derive(Clone, Debug, Default)]
pub struct BundledResources {
    entries: FxHashMap<String, Arc<[u8]>>,
}

impl BundledResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` under `name` (without the `:/` prefix)
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        self.entries.insert(name.into(), data.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, data);
        self
    }

    /// Read a resource's bytes
    pub fn read(&self, name: &str) -> Option<Arc<[u8]>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name(Path::new(":/icons/a.svg")), Some("icons/a.svg"));
        assert_eq!(resource_name(Path::new("icons/a.svg")), None);
        assert_eq!(resource_name(Path::new("/:/a.svg")), None);
    }

    #[test]
    fn test_read_registered() {
        let resources = BundledResources::new().with("logo.svg", b"<svg/>".to_vec());
        assert_eq!(resources.read("logo.svg").as_deref(), Some(&b"<svg/>"[..]));
        assert!(resources.read("missing.svg").is_none());
        assert_eq!(resources.len(), 1);
    }
}
