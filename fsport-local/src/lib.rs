//! Local filesystem adapter for fsport
//!
//! `LocalFileSystem` fulfils the `FileSystem` port by delegating to the
//! host operating system.

mod attributes;
mod drives;
mod enumerate;
mod local;
mod open;
mod shortcut;
mod swap;

pub use local::LocalFileSystem;
pub use shortcut::TextShortcutHandler;
