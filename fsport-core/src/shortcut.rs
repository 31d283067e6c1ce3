//! Pluggable shortcut handling
//!
//! A shortcut is a file that stands in for another path. Each handler owns
//! one shortcut format, identified by file extension; the registry probes
//! handlers in registration order.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::{error::FsResult, path};

/// One shortcut format
pub trait ShortcutHandler: Send + Sync {
    /// Extension this handler owns, including the leading dot.
    fn extension(&self) -> &str;

    /// Target path of the shortcut at `shortcut_path`, if it can be read.
    fn resolve(&self, shortcut_path: &str) -> FsResult<Option<String>>;

    /// Write a shortcut at `shortcut_path` pointing to `target`.
    fn create(&self, shortcut_path: &str, target: &str) -> FsResult<()>;

    fn handles(&self, shortcut_path: &str) -> bool {
        let ext = path::extension(path::file_name(shortcut_path));
        path::extension_matches(ext, self.extension(), false)
    }
}

/// Ordered set of shortcut handlers
#[derive(Default)]
pub struct ShortcutRegistry {
    handlers: RwLock<Vec<Arc<dyn ShortcutHandler>>>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn ShortcutHandler>) {
        self.handlers.write().push(handler);
    }

    /// First handler, in registration order, that claims `shortcut_path`.
    pub fn find(&self, shortcut_path: &str) -> Option<Arc<dyn ShortcutHandler>> {
        self.handlers
            .read()
            .iter()
            .find(|h| h.handles(shortcut_path))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    pub fn extensions(&self) -> Vec<String> {
        self.handlers
            .read()
            .iter()
            .map(|h| h.extension().to_string())
            .collect()
    }
}

impl std::fmt::Debug for ShortcutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}
