//! Plain-text shortcut format

use fsport_core::{config::DEFAULT_SHORTCUT_EXTENSION, FsError, FsResult, ShortcutHandler};
use std::fs;

/// Shortcut whose file body is the target path.
#[derive(Debug, Clone)]
pub struct TextShortcutHandler {
    extension: String,
}

impl TextShortcutHandler {
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = if extension.starts_with('.') {
            extension
        } else {
            format!(".{extension}")
        };
        Self { extension }
    }
}

impl Default for TextShortcutHandler {
    fn default() -> Self {
        Self::new(DEFAULT_SHORTCUT_EXTENSION)
    }
}

impl ShortcutHandler for TextShortcutHandler {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn resolve(&self, shortcut_path: &str) -> FsResult<Option<String>> {
        let body = fs::read_to_string(shortcut_path).map_err(|e| FsError::from_io(e, shortcut_path))?;
        let target = body.trim();
        if target.is_empty() {
            tracing::debug!(shortcut_path, "empty shortcut");
            return Ok(None);
        }
        Ok(Some(target.to_string()))
    }

    fn create(&self, shortcut_path: &str, target: &str) -> FsResult<()> {
        fs::write(shortcut_path, target).map_err(|e| FsError::from_io(e, shortcut_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_gets_leading_dot() {
        assert_eq!(TextShortcutHandler::new("link").extension(), ".link");
        assert_eq!(TextShortcutHandler::new(".link").extension(), ".link");
        assert_eq!(TextShortcutHandler::default().extension(), ".shortcut");
    }

    #[test]
    fn test_create_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Movies.shortcut").to_string_lossy().into_owned();
        let handler = TextShortcutHandler::default();

        handler.create(&path, "/mnt/nas/movies").unwrap();
        assert_eq!(handler.resolve(&path).unwrap().as_deref(), Some("/mnt/nas/movies"));
    }

    #[test]
    fn test_resolve_trims_and_handles_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.shortcut");
        fs::write(&path, "  /srv/tv \r\n").unwrap();
        let handler = TextShortcutHandler::default();
        assert_eq!(handler.resolve(&path.to_string_lossy()).unwrap().as_deref(), Some("/srv/tv"));

        fs::write(&path, "\n").unwrap();
        assert_eq!(handler.resolve(&path.to_string_lossy()).unwrap(), None);
    }

    #[test]
    fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.shortcut");
        let err = TextShortcutHandler::default().resolve(&path.to_string_lossy()).unwrap_err();
        assert!(err.is_not_found());
    }
}
