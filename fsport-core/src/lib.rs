//! fsport core
//!
//! The filesystem port trait, its value types, pure path utilities and the
//! shortcut handler registry. Platform adapters live in other crates.

pub mod config;
pub mod entry;
pub mod error;
pub mod filesystem;
pub mod metadata;
pub mod open;
pub mod path;
pub mod shortcut;
pub mod stream;

pub use config::FileSystemConfig;
pub use entry::{EntryKind, ExtensionFilter};
pub use error::{FsError, FsResult};
pub use filesystem::{EntryIter, FileSystem};
pub use metadata::FileSystemMetadata;
pub use open::{FileAccessMode, FileOpenMode, FileOpenOptions, FileShareMode};
pub use path::PathStyle;
pub use shortcut::{ShortcutHandler, ShortcutRegistry};
pub use stream::FileStream;
