//! Filesystem entry snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable description of a filesystem entry at query time.
///
/// A snapshot for a missing entry (or an entry of the wrong kind for the
/// query that produced it) has `exists == false`, zero length and no
/// timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemMetadata {
    pub exists: bool,
    /// Path as it was queried
    pub full_name: String,
    /// Final path component
    pub name: String,
    /// Extension including the leading dot, or empty
    pub extension: String,
    pub length: u64,
    pub is_directory: bool,
    pub is_hidden: bool,
    pub is_read_only: bool,
    pub creation_time_utc: Option<DateTime<Utc>>,
    pub last_write_time_utc: Option<DateTime<Utc>>,
}

impl FileSystemMetadata {
    /// Snapshot of a path with nothing known about it yet.
    pub fn missing(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = crate::path::file_name(&full_name).to_string();
        let extension = crate::path::extension(&name).to_string();
        Self {
            full_name,
            name,
            extension,
            ..Default::default()
        }
    }

    pub fn with_directory(mut self, is_directory: bool) -> Self {
        self.is_directory = is_directory;
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    pub fn with_created(mut self, created: Option<DateTime<Utc>>) -> Self {
        self.creation_time_utc = created;
        self
    }

    pub fn with_modified(mut self, modified: Option<DateTime<Utc>>) -> Self {
        self.last_write_time_utc = modified;
        self
    }

    pub fn is_file(&self) -> bool {
        self.exists && !self.is_directory
    }
}
