//! Enumeration filters

use serde::{Deserialize, Serialize};

use crate::{metadata::FileSystemMetadata, path};

/// Which kinds of entry an enumeration yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    Any,
}

impl EntryKind {
    pub fn matches(self, is_directory: bool) -> bool {
        match self {
            EntryKind::File => !is_directory,
            EntryKind::Directory => is_directory,
            EntryKind::Any => true,
        }
    }
}

/// File extension filter; an empty filter accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
    case_sensitive: bool,
}

impl ExtensionFilter {
    pub fn new<S: AsRef<str>>(extensions: &[S], case_sensitive: bool) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().to_string())
                .filter(|e| !e.trim_start_matches('.').is_empty())
                .collect(),
            case_sensitive,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let ext = path::extension(name);
        !ext.is_empty()
            && self
                .extensions
                .iter()
                .any(|wanted| path::extension_matches(ext, wanted, self.case_sensitive))
    }

    pub fn matches(&self, entry: &FileSystemMetadata) -> bool {
        !entry.is_directory && self.matches_name(&entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind() {
        assert!(EntryKind::File.matches(false));
        assert!(!EntryKind::File.matches(true));
        assert!(EntryKind::Directory.matches(true));
        assert!(EntryKind::Any.matches(true) && EntryKind::Any.matches(false));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = ExtensionFilter::new::<&str>(&[], false);
        assert!(filter.is_empty());
        assert!(filter.matches_name("README"));
        assert!(filter.matches_name("a.mkv"));
    }

    #[test]
    fn test_filter_with_and_without_dots() {
        let filter = ExtensionFilter::new(&[".mkv", "mp4"], true);
        assert!(filter.matches_name("a.mkv"));
        assert!(filter.matches_name("b.mp4"));
        assert!(!filter.matches_name("c.MKV"));
        assert!(!filter.matches_name("d.avi"));
        assert!(!filter.matches_name("mkv"));
    }

    #[test]
    fn test_case_insensitive_filter() {
        let filter = ExtensionFilter::new(&[".mkv"], false);
        assert!(filter.matches_name("c.MKV"));
    }

    #[test]
    fn test_blank_extensions_are_dropped() {
        let filter = ExtensionFilter::new(&["", "."], false);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_directories_never_match() {
        let filter = ExtensionFilter::new(&[".d"], false);
        let mut dir = FileSystemMetadata::missing("/etc/conf.d").with_directory(true);
        dir.exists = true;
        assert!(!filter.matches(&dir));
    }
}
