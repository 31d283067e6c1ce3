//! Error types for fsport

use std::io;
use thiserror::Error;

/// Result type alias
pub type FsResult<T> = Result<T, FsError>;

/// Main error type
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Sharing violation: {0}")]
    SharingViolation(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Swap of {first} and {second} failed: {reason}")]
    SwapFailed {
        first: String,
        second: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// Classify an IO error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: impl Into<String>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
            io::ErrorKind::InvalidInput => FsError::InvalidArgument(format!("{path}: {err}")),
            _ => FsError::Io(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::NotFound(_) => true,
            FsError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        match self {
            FsError::AlreadyExists(_) => true,
            FsError::Io(e) => e.kind() == io::ErrorKind::AlreadyExists,
            _ => false,
        }
    }
}
