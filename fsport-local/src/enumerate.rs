//! Directory enumeration

use fsport_core::{EntryIter, EntryKind, FileSystemMetadata, FsError, FsResult};
use std::fs;
use walkdir::WalkDir;

use crate::local::snapshot;

/// Lazily walk `root`, yielding entries of `kind` below it.
///
/// Entries that cannot be read are skipped; only a missing or non-directory
/// root is an error.
pub(crate) fn walk(
    root: &str,
    kind: EntryKind,
    recursive: bool,
) -> FsResult<EntryIter<'static, FileSystemMetadata>> {
    let meta = fs::metadata(root).map_err(|e| FsError::from_io(e, root))?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory(root.to_string()));
    }

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let entries = walker.into_iter().filter_map(move |item| {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping inaccessible entry");
                return None;
            }
        };
        if !kind.matches(entry.file_type().is_dir()) {
            return None;
        }
        let full_name = entry.path().to_string_lossy().into_owned();
        match entry.metadata() {
            Ok(meta) => Some(snapshot(&full_name, &meta)),
            Err(err) => {
                tracing::debug!(path = %full_name, error = %err, "skipping entry without metadata");
                None
            }
        }
    });

    Ok(Box::new(entries))
}
