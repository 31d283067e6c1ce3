//! Adapter configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FsError, FsResult};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_SHORTCUT_EXTENSION: &str = ".shortcut";

/// Filesystem adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSystemConfig {
    /// Scratch directory; `None` uses the OS temp directory
    pub temp_dir: Option<PathBuf>,
    /// Path comparison case sensitivity; `None` uses the platform default
    pub case_sensitive: Option<bool>,
    /// Extension of the plain-text shortcut format
    pub shortcut_extension: String,
    /// Register the plain-text shortcut handler on construction
    pub register_text_shortcuts: bool,
}

impl Default for FileSystemConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            case_sensitive: None,
            shortcut_extension: DEFAULT_SHORTCUT_EXTENSION.to_string(),
            register_text_shortcuts: true,
        }
    }
}

impl FileSystemConfig {
    /// Location of the per-user config file, if the OS has one.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "fsport", "fsport")
            .map(|d| d.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn from_toml_str(text: &str) -> FsResult<Self> {
        toml::from_str(text).map_err(|e| FsError::Config(e.to_string()))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> FsResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(FsError::from_io(e, path.display().to_string())),
        }
    }

    pub fn load_default() -> FsResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
            .unwrap_or_else(crate::path::native_case_sensitive)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileSystemConfig::default();
        assert_eq!(config.shortcut_extension, ".shortcut");
        assert!(config.register_text_shortcuts);
        assert_eq!(config.case_sensitive(), crate::path::native_case_sensitive());
        assert_eq!(config.temp_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FileSystemConfig::from_toml_str("case_sensitive = false\n").unwrap();
        assert!(!config.case_sensitive());
        assert_eq!(config.shortcut_extension, ".shortcut");
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            temp_dir = "/var/tmp/fsport"
            case_sensitive = true
            shortcut_extension = ".link"
            register_text_shortcuts = false
        "#;
        let config = FileSystemConfig::from_toml_str(text).unwrap();
        assert_eq!(config.temp_dir(), PathBuf::from("/var/tmp/fsport"));
        assert!(config.case_sensitive());
        assert_eq!(config.shortcut_extension, ".link");
        assert!(!config.register_text_shortcuts);
    }

    #[test]
    fn test_invalid_toml() {
        let err = FileSystemConfig::from_toml_str("case_sensitive = \"maybe\"").unwrap_err();
        assert!(matches!(err, FsError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileSystemConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, FileSystemConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "shortcut_extension = \".lnk2\"\n").unwrap();
        let config = FileSystemConfig::load(&path).unwrap();
        assert_eq!(config.shortcut_extension, ".lnk2");
    }
}
