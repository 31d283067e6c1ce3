//! The filesystem port
//!
//! `FileSystem` is the capability surface a library/media system programs
//! against. Adapters provide metadata, streams, enumeration and mutation;
//! path utilities and shortcut dispatch come with default implementations
//! built on the adapter's path style and case sensitivity.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    entry::{EntryKind, ExtensionFilter},
    error::{FsError, FsResult},
    metadata::FileSystemMetadata,
    open::{FileAccessMode, FileOpenMode, FileOpenOptions, FileShareMode},
    path::{self, PathStyle},
    shortcut::{ShortcutHandler, ShortcutRegistry},
    stream::FileStream,
};

/// Lazily produced, single-pass enumeration result
pub type EntryIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Filesystem port
pub trait FileSystem: Send + Sync {
    fn path_style(&self) -> PathStyle {
        PathStyle::native()
    }

    /// Whether path comparisons distinguish case.
    fn case_sensitive(&self) -> bool;

    fn shortcuts(&self) -> &ShortcutRegistry;

    // Shortcuts

    fn add_shortcut_handler(&self, handler: Arc<dyn ShortcutHandler>) {
        self.shortcuts().register(handler);
    }

    fn is_shortcut(&self, path: &str) -> bool {
        !path.is_empty() && self.shortcuts().find(path).is_some()
    }

    /// Target of the shortcut at `path`, or `None` if no handler claims it.
    fn resolve_shortcut(&self, path: &str) -> FsResult<Option<String>> {
        if path.is_empty() {
            return Err(FsError::InvalidArgument("shortcut path is empty".into()));
        }
        match self.shortcuts().find(path) {
            Some(handler) => handler.resolve(path),
            None => Ok(None),
        }
    }

    fn create_shortcut(&self, shortcut_path: &str, target: &str) -> FsResult<()> {
        if shortcut_path.is_empty() {
            return Err(FsError::InvalidArgument("shortcut path is empty".into()));
        }
        if target.is_empty() {
            return Err(FsError::InvalidArgument("shortcut target is empty".into()));
        }
        let handler = self.shortcuts().find(shortcut_path).ok_or_else(|| {
            FsError::InvalidArgument(format!("invalid shortcut type: {shortcut_path}"))
        })?;
        handler.create(shortcut_path, target)
    }

    // Path utilities

    fn make_absolute_path(&self, folder_path: &str, file_path: &str) -> String {
        self.path_style().make_absolute(folder_path, file_path)
    }

    fn normalize_path(&self, path: &str) -> String {
        self.path_style().normalize(path)
    }

    fn are_equal(&self, path1: &str, path2: &str) -> bool {
        self.path_style().are_equal(path1, path2, self.case_sensitive())
    }

    fn contains_sub_path(&self, parent_path: &str, path: &str) -> bool {
        self.path_style()
            .contains_sub_path(parent_path, path, self.case_sensitive())
    }

    fn is_root_path(&self, path: &str) -> bool {
        self.path_style().is_root(path)
    }

    fn get_valid_filename(&self, filename: &str) -> String {
        path::valid_filename(filename)
    }

    fn is_path_file(&self, path: &str) -> bool {
        path::is_path_file(path)
    }

    fn get_file_name_without_extension(&self, info: &FileSystemMetadata) -> String {
        if info.is_directory {
            info.name.clone()
        } else {
            path::file_stem(&info.name).to_string()
        }
    }

    // Metadata

    /// Snapshot of whatever is at `path`, file or directory.
    fn get_file_system_info(&self, path: &str) -> FileSystemMetadata;

    /// Snapshot of the file at `path`; a directory there reads as missing.
    fn get_file_info(&self, path: &str) -> FileSystemMetadata;

    /// Snapshot of the directory at `path`; a file there reads as missing.
    fn get_directory_info(&self, path: &str) -> FileSystemMetadata;

    fn get_creation_time_utc(&self, info: &FileSystemMetadata) -> Option<DateTime<Utc>> {
        info.creation_time_utc
    }

    fn get_creation_time_utc_for_path(&self, path: &str) -> Option<DateTime<Utc>> {
        self.get_creation_time_utc(&self.get_file_system_info(path))
    }

    fn get_last_write_time_utc(&self, info: &FileSystemMetadata) -> Option<DateTime<Utc>> {
        info.last_write_time_utc
    }

    fn get_last_write_time_utc_for_path(&self, path: &str) -> Option<DateTime<Utc>> {
        self.get_last_write_time_utc(&self.get_file_system_info(path))
    }

    // Streams

    fn get_file_stream(
        &self,
        path: &str,
        mode: FileOpenMode,
        access: FileAccessMode,
        share: FileShareMode,
        is_async: bool,
    ) -> FsResult<FileStream> {
        self.get_file_stream_with_options(
            path,
            mode,
            access,
            share,
            FileOpenOptions::from_async_flag(is_async),
        )
    }

    fn get_file_stream_with_options(
        &self,
        path: &str,
        mode: FileOpenMode,
        access: FileAccessMode,
        share: FileShareMode,
        options: FileOpenOptions,
    ) -> FsResult<FileStream>;

    /// The user's home directory, when it exists.
    fn default_directory(&self) -> Option<String>;

    // Mutation

    /// Exchange the contents of two existing files.
    fn swap_files(&self, file1: &str, file2: &str) -> FsResult<()>;

    fn delete_file(&self, path: &str) -> FsResult<()>;

    fn set_hidden(&self, path: &str, is_hidden: bool) -> FsResult<()>;

    fn set_read_only(&self, path: &str, read_only: bool) -> FsResult<()>;

    fn set_attributes(&self, path: &str, is_hidden: bool, read_only: bool) -> FsResult<()> {
        self.set_hidden(path, is_hidden)?;
        self.set_read_only(path, read_only)
    }

    fn set_executable(&self, path: &str) -> FsResult<()>;

    fn get_drives(&self) -> FsResult<Vec<FileSystemMetadata>>;

    // Enumeration

    /// Entries of `kind` below `path`, excluding `path` itself.
    fn enumerate(
        &self,
        path: &str,
        kind: EntryKind,
        recursive: bool,
    ) -> FsResult<EntryIter<'_, FileSystemMetadata>>;

    fn get_directories(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
        self.enumerate(path, EntryKind::Directory, recursive)
    }

    fn get_files(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
        self.enumerate(path, EntryKind::File, recursive)
    }

    fn get_files_with_extensions(
        &self,
        path: &str,
        extensions: &[&str],
        case_sensitive: bool,
        recursive: bool,
    ) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
        let filter = ExtensionFilter::new(extensions, case_sensitive);
        let files = self.enumerate(path, EntryKind::File, recursive)?;
        if filter.is_empty() {
            return Ok(files);
        }
        Ok(Box::new(files.filter(move |entry| filter.matches(entry))))
    }

    fn get_file_system_entries(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
        self.enumerate(path, EntryKind::Any, recursive)
    }

    fn get_directory_paths(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, String>> {
        Ok(Box::new(self.get_directories(path, recursive)?.map(|e| e.full_name)))
    }

    fn get_file_paths(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, String>> {
        Ok(Box::new(self.get_files(path, recursive)?.map(|e| e.full_name)))
    }

    fn get_file_paths_with_extensions(
        &self,
        path: &str,
        extensions: &[&str],
        case_sensitive: bool,
        recursive: bool,
    ) -> FsResult<EntryIter<'_, String>> {
        Ok(Box::new(
            self.get_files_with_extensions(path, extensions, case_sensitive, recursive)?
                .map(|e| e.full_name),
        ))
    }

    fn get_file_system_entry_paths(&self, path: &str, recursive: bool) -> FsResult<EntryIter<'_, String>> {
        Ok(Box::new(self.get_file_system_entries(path, recursive)?.map(|e| e.full_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Port over a fixed in-memory listing; exercises the provided methods.
    struct Listing {
        entries: Vec<FileSystemMetadata>,
        shortcuts: ShortcutRegistry,
    }

    fn entry(path: &str, is_directory: bool) -> FileSystemMetadata {
        let mut meta = FileSystemMetadata::missing(path).with_directory(is_directory);
        meta.exists = true;
        meta
    }

    impl Listing {
        fn new() -> Self {
            Self {
                entries: vec![
                    entry("/lib/movies", true),
                    entry("/lib/movies/a.mkv", false),
                    entry("/lib/movies/b.MP4", false),
                    entry("/lib/movies/notes", false),
                ],
                shortcuts: ShortcutRegistry::new(),
            }
        }
    }

    impl FileSystem for Listing {
        fn path_style(&self) -> PathStyle {
            PathStyle::Unix
        }

        fn case_sensitive(&self) -> bool {
            true
        }

        fn shortcuts(&self) -> &ShortcutRegistry {
            &self.shortcuts
        }

        fn get_file_system_info(&self, path: &str) -> FileSystemMetadata {
            self.entries
                .iter()
                .find(|e| e.full_name == path)
                .cloned()
                .unwrap_or_else(|| FileSystemMetadata::missing(path))
        }

        fn get_file_info(&self, path: &str) -> FileSystemMetadata {
            self.get_file_system_info(path)
        }

        fn get_directory_info(&self, path: &str) -> FileSystemMetadata {
            self.get_file_system_info(path)
        }

        fn get_file_stream_with_options(
            &self,
            path: &str,
            _mode: FileOpenMode,
            _access: FileAccessMode,
            _share: FileShareMode,
            _options: FileOpenOptions,
        ) -> FsResult<FileStream> {
            Err(FsError::Unsupported(path.to_string()))
        }

        fn default_directory(&self) -> Option<String> {
            None
        }

        fn swap_files(&self, _file1: &str, _file2: &str) -> FsResult<()> {
            Ok(())
        }

        fn delete_file(&self, _path: &str) -> FsResult<()> {
            Ok(())
        }

        fn set_hidden(&self, _path: &str, _is_hidden: bool) -> FsResult<()> {
            Ok(())
        }

        fn set_read_only(&self, path: &str, _read_only: bool) -> FsResult<()> {
            Err(FsError::NotFound(path.to_string()))
        }

        fn set_executable(&self, _path: &str) -> FsResult<()> {
            Ok(())
        }

        fn get_drives(&self) -> FsResult<Vec<FileSystemMetadata>> {
            Ok(vec![entry("/", true)])
        }

        fn enumerate(
            &self,
            path: &str,
            kind: EntryKind,
            _recursive: bool,
        ) -> FsResult<EntryIter<'_, FileSystemMetadata>> {
            let path = path.to_string();
            Ok(Box::new(self.entries.iter().filter(move |e| {
                kind.matches(e.is_directory) && PathStyle::Unix.contains_sub_path(&path, &e.full_name, true)
            }).cloned()))
        }
    }

    #[test]
    fn test_extension_filtered_paths() {
        let fs = Listing::new();
        let paths: Vec<String> = fs
            .get_file_paths_with_extensions("/lib", &[".mkv", "mp4"], false, true)
            .unwrap()
            .collect();
        assert_eq!(paths, vec!["/lib/movies/a.mkv", "/lib/movies/b.MP4"]);

        let paths: Vec<String> = fs
            .get_file_paths_with_extensions("/lib", &["mp4"], true, true)
            .unwrap()
            .collect();
        assert!(paths.is_empty());

        let all: Vec<String> = fs
            .get_file_paths_with_extensions("/lib", &[], true, true)
            .unwrap()
            .collect();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_kind_specific_paths() {
        let fs = Listing::new();
        let dirs: Vec<String> = fs.get_directory_paths("/lib", true).unwrap().collect();
        assert_eq!(dirs, vec!["/lib/movies"]);
        assert_eq!(fs.get_file_system_entry_paths("/lib", true).unwrap().count(), 4);
    }

    #[test]
    fn test_file_name_without_extension() {
        let fs = Listing::new();
        assert_eq!(fs.get_file_name_without_extension(&entry("/lib/movies/a.mkv", false)), "a");
        assert_eq!(fs.get_file_name_without_extension(&entry("/lib/conf.d", true)), "conf.d");
    }

    #[test]
    fn test_set_attributes_propagates_errors() {
        let fs = Listing::new();
        assert!(fs.set_attributes("/x", true, true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_timestamps_for_path() {
        let fs = Listing::new();
        assert!(fs.get_creation_time_utc_for_path("/missing").is_none());
        assert!(fs.get_last_write_time_utc_for_path("/missing").is_none());
    }

    #[test]
    fn test_shortcut_dispatch_without_handlers() {
        let fs = Listing::new();
        assert!(!fs.is_shortcut("/a/b.lnk"));
        assert_eq!(fs.resolve_shortcut("/a/b.lnk").unwrap(), None);
        assert!(matches!(fs.resolve_shortcut(""), Err(FsError::InvalidArgument(_))));
        assert!(matches!(
            fs.create_shortcut("/a/b.lnk", "/target"),
            Err(FsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_path_helpers_follow_style() {
        let fs = Listing::new();
        assert!(fs.are_equal("/lib//movies/", "/lib/movies"));
        assert!(!fs.are_equal("/lib/Movies", "/lib/movies"));
        assert!(fs.contains_sub_path("/lib", "/lib/movies/a.mkv"));
        assert!(fs.is_root_path("/"));
        assert_eq!(fs.normalize_path("/lib/./movies/.."), "/lib");
        assert_eq!(fs.make_absolute_path("/lib", "movies/a.mkv"), "/lib/movies/a.mkv");
        assert_eq!(fs.get_valid_filename("a?b"), "a b");
        assert!(!fs.is_path_file("https://x/y"));
    }

    #[test]
    fn test_port_is_object_safe() {
        let fs: Box<dyn FileSystem> = Box::new(Listing::new());
        assert_eq!(fs.get_drives().unwrap().len(), 1);
    }
}
