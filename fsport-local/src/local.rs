//! Local filesystem adapter

use chrono::{DateTime, Utc};
use fsport_core::{
    EntryIter, EntryKind, FileAccessMode, FileOpenMode, FileOpenOptions, FileShareMode,
    FileStream, FileSystem, FileSystemConfig, FileSystemMetadata, FsError, FsResult, PathStyle,
    ShortcutRegistry,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::{attributes, drives, enumerate, open, shortcut::TextShortcutHandler, swap};

/// Snapshot of an entry known to exist.
pub(crate) fn snapshot(full_name: &str, meta: &fs::Metadata) -> FileSystemMetadata {
    let length = if meta.is_dir() { 0 } else { meta.len() };
    let mut info = FileSystemMetadata::missing(full_name)
        .with_directory(meta.is_dir())
        .with_length(length)
        .with_created(meta.created().ok().map(DateTime::<Utc>::from))
        .with_modified(meta.modified().ok().map(DateTime::<Utc>::from));
    info.exists = true;
    info.is_read_only = meta.permissions().readonly();
    info.is_hidden = attributes::is_hidden(Path::new(full_name), meta);
    info
}

fn stat(path: &str) -> Option<fs::Metadata> {
    match fs::metadata(path) {
        Ok(meta) => Some(meta),
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path, error = %err, "metadata unavailable");
            }
            None
        }
    }
}

/// Filesystem port backed by the host operating system
pub struct LocalFileSystem {
    config: FileSystemConfig,
    case_sensitive: bool,
    shortcuts: ShortcutRegistry,
}

impl LocalFileSystem {
    pub fn new(config: FileSystemConfig) -> Self {
        let shortcuts = ShortcutRegistry::new();
        if config.register_text_shortcuts {
            shortcuts.register(Arc::new(TextShortcutHandler::new(
                config.shortcut_extension.clone(),
            )));
        }
        Self {
            case_sensitive: config.case_sensitive(),
            config,
            shortcuts,
        }
    }

    pub fn config(&self) -> &FileSystemConfig {
        &self.config
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new(FileSystemConfig::default())
    }
}

impl FileSystem for LocalFileSystem {
    fn path_style(&self) -> PathStyle {
        PathStyle::native()
    }

    fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    fn get_file_system_info(&self, path: &str) -> FileSystemMetadata {
        let style = self.path_style();
        if path.ends_with(|c| style.is_separator(c)) {
            return self.get_directory_info(path);
        }
        match stat(path) {
            Some(meta) => snapshot(path, &meta),
            None => FileSystemMetadata::missing(path),
        }
    }

    fn get_file_info(&self, path: &str) -> FileSystemMetadata {
        match stat(path) {
            Some(meta) if !meta.is_dir() => snapshot(path, &meta),
            _ => FileSystemMetadata::missing(path),
        }
    }

    fn get_directory_info(&self, path: &str) -> FileSystemMetadata {
        match stat(path) {
            Some(meta) if meta.is_dir() => snapshot(path, &meta),
            _ => FileSystemMetadata::missing(path).with_directory(true),
        }
    }

    fn get_file_stream_with_options(
        &self,
        path: &str,
        mode: FileOpenMode,
        access: FileAccessMode,
        share: FileShareMode,
        options: FileOpenOptions,
    ) -> FsResult<FileStream> {
        open::open_stream(path, mode, access, share, options)
    }

    fn default_directory(&self) -> Option<String> {
        let dirs = directories::BaseDirs::new()?;
        let home = dirs.home_dir();
        if home.is_dir() {
            Some(home.to_string_lossy().into_owned())
        } else {
            None
        }
    }

    fn swap_files(&self, file1: &str, file2: &str) -> FsResult<()> {
        if file1.is_empty() || file2.is_empty() {
            return Err(FsError::InvalidArgument("swap needs two paths".into()));
        }
        swap::swap(file1, file2, &self.config.temp_dir())
    }

    fn delete_file(&self, path: &str) -> FsResult<()> {
        let meta = fs::symlink_metadata(path).map_err(|e| FsError::from_io(e, path))?;
        if meta.is_dir() {
            return Err(FsError::NotAFile(path.to_string()));
        }
        if meta.permissions().readonly() && !meta.file_type().is_symlink() {
            attributes::set_read_only(Path::new(path), false)?;
        }
        fs::remove_file(path).map_err(|e| FsError::from_io(e, path))?;
        tracing::info!(path, "deleted file");
        Ok(())
    }

    fn set_hidden(&self, path: &str, is_hidden: bool) -> FsResult<()> {
        attributes::set_hidden(Path::new(path), is_hidden)
    }

    fn set_read_only(&self, path: &str, read_only: bool) -> FsResult<()> {
        attributes::set_read_only(Path::new(path), read_only)
    }

    fn set_executable(&self, path: &str) -> FsResult<()> {
        attributes::set_executable(Path::new(path))
    }

    fn get_drives(&self) -> FsResult<Vec<FileSystemMetadata>> {
        drives::list()
    }

    fn enumerate(
        &self,
        path: &str,
        kind: EntryKind,
        recursive: bool,
    ) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
        enumerate::walk(path, kind, recursive)
    }
}
