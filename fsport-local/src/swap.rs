//! Exchanging the contents of two files
//!
//! On Linux the kernel can exchange two names atomically. Everywhere else,
//! and whenever the exchange is refused, contents are moved through a
//! scratch copy and earlier steps are undone if a later one fails.

use fsport_core::{FsError, FsResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static SWAP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn require_file(path: &str) -> FsResult<()> {
    let meta = fs::metadata(path).map_err(|e| FsError::from_io(e, path))?;
    if meta.is_dir() {
        return Err(FsError::NotAFile(path.to_string()));
    }
    Ok(())
}

pub(crate) fn swap(file1: &str, file2: &str, temp_dir: &Path) -> FsResult<()> {
    require_file(file1)?;
    require_file(file2)?;

    if same_file(file1, file2) {
        return Ok(());
    }

    #[cfg(target_os = "linux")]
    match exchange(file1, file2) {
        Ok(()) => {
            tracing::info!(file1, file2, "swapped files atomically");
            return Ok(());
        }
        Err(err) => {
            tracing::debug!(file1, file2, error = %err, "atomic exchange unavailable, copying");
        }
    }

    swap_by_copy(file1, file2, temp_dir)?;
    tracing::info!(file1, file2, "swapped files by copy");
    Ok(())
}

fn same_file(a: &str, b: &str) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(target_os = "linux")]
fn exchange(file1: &str, file2: &str) -> std::io::Result<()> {
    use std::ffi::CString;

    const RENAME_EXCHANGE: libc::c_uint = 1 << 1;

    let a = CString::new(file1)?;
    let b = CString::new(file2)?;
    // SAFETY: both paths are NUL-terminated and live for the duration of the call.
    let rc = unsafe {
        libc::syscall(
            libc::SYS_renameat2,
            libc::AT_FDCWD,
            a.as_ptr(),
            libc::AT_FDCWD,
            b.as_ptr(),
            RENAME_EXCHANGE,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

fn scratch_path(temp_dir: &Path) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let seq = SWAP_COUNTER.fetch_add(1, Ordering::Relaxed);
    temp_dir.join(format!(".fsport-swap-{}-{:x}-{}", std::process::id(), nanos, seq))
}

fn failed(file1: &str, file2: &str, reason: impl std::fmt::Display) -> FsError {
    FsError::SwapFailed {
        first: file1.to_string(),
        second: file2.to_string(),
        reason: reason.to_string(),
    }
}

fn swap_by_copy(file1: &str, file2: &str, temp_dir: &Path) -> FsResult<()> {
    swap_by_copy_with(file1, file2, temp_dir, &mut |from, to| fs::copy(from, to))
}

/// Copy-based swap; both files keep their identity, only contents move.
fn swap_by_copy_with(
    file1: &str,
    file2: &str,
    temp_dir: &Path,
    copy: &mut dyn FnMut(&Path, &Path) -> io::Result<u64>,
) -> FsResult<()> {
    fs::create_dir_all(temp_dir).map_err(|e| FsError::from_io(e, temp_dir.display().to_string()))?;
    let scratch = scratch_path(temp_dir);
    let (path1, path2) = (Path::new(file1), Path::new(file2));

    copy(path1, &scratch).map_err(|e| failed(file1, file2, format!("saving {file1}: {e}")))?;

    if let Err(e) = copy(path2, path1) {
        if let Err(undo) = copy(&scratch, path1) {
            tracing::warn!(file1, error = %undo, scratch = %scratch.display(), "rollback failed, original kept in scratch file");
            return Err(failed(file1, file2, format!("{e}; rollback failed, original at {}", scratch.display())));
        }
        let _ = fs::remove_file(&scratch);
        return Err(failed(file1, file2, e));
    }

    if let Err(e) = copy(&scratch, path2) {
        // file1 now holds file2's original contents: put both back.
        let restored = copy(path1, path2).and_then(|_| copy(&scratch, path1));
        if let Err(undo) = restored {
            tracing::warn!(file1, file2, error = %undo, scratch = %scratch.display(), "rollback failed, original kept in scratch file");
            return Err(failed(file1, file2, format!("{e}; rollback failed, original at {}", scratch.display())));
        }
        let _ = fs::remove_file(&scratch);
        return Err(failed(file1, file2, e));
    }

    if let Err(e) = fs::remove_file(&scratch) {
        tracing::debug!(scratch = %scratch.display(), error = %e, "could not remove scratch file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.nfo");
        let b = dir.path().join("b.nfo");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second, longer").unwrap();
        (
            dir,
            a.to_string_lossy().into_owned(),
            b.to_string_lossy().into_owned(),
        )
    }

    #[test]
    fn test_swap_exchanges_contents() {
        let (dir, a, b) = setup();
        swap(&a, &b, dir.path()).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"second, longer");
        assert_eq!(fs::read(&b).unwrap(), b"first");
    }

    #[test]
    fn test_swap_by_copy_exchanges_contents_and_cleans_up() {
        let (dir, a, b) = setup();
        let scratch = dir.path().join("scratch");
        swap_by_copy(&a, &b, &scratch).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"second, longer");
        assert_eq!(fs::read(&b).unwrap(), b"first");
        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[test]
    fn test_swap_twice_restores() {
        let (dir, a, b) = setup();
        swap(&a, &b, dir.path()).unwrap();
        swap(&a, &b, dir.path()).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"first");
        assert_eq!(fs::read(&b).unwrap(), b"second, longer");
    }

    #[test]
    fn test_swap_with_itself_is_noop() {
        let (dir, a, _) = setup();
        swap(&a, &a, dir.path()).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"first");
    }

    #[test]
    fn test_swap_requires_both_files() {
        let (dir, a, _) = setup();
        let missing = dir.path().join("missing").to_string_lossy().into_owned();
        assert!(swap(&a, &missing, dir.path()).unwrap_err().is_not_found());
        assert!(swap(&missing, &a, dir.path()).unwrap_err().is_not_found());
        assert_eq!(fs::read(&a).unwrap(), b"first");
    }

    /// `fs::copy` that fails on the given 1-based call numbers.
    fn copy_failing_on(steps: &'static [usize]) -> impl FnMut(&Path, &Path) -> io::Result<u64> {
        let mut calls = 0;
        move |from: &Path, to: &Path| {
            calls += 1;
            if steps.contains(&calls) {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            } else {
                fs::copy(from, to)
            }
        }
    }

    fn assert_untouched(a: &str, b: &str) {
        assert_eq!(fs::read(a).unwrap(), b"first");
        assert_eq!(fs::read(b).unwrap(), b"second, longer");
    }

    #[test]
    fn test_failed_save_changes_nothing() {
        let (dir, a, b) = setup();
        let scratch = dir.path().join("scratch");
        let err = swap_by_copy_with(&a, &b, &scratch, &mut copy_failing_on(&[1])).unwrap_err();
        assert!(matches!(err, FsError::SwapFailed { .. }));
        assert_untouched(&a, &b);
    }

    #[test]
    fn test_failed_second_step_rolls_back() {
        let (dir, a, b) = setup();
        let scratch = dir.path().join("scratch");
        let err = swap_by_copy_with(&a, &b, &scratch, &mut copy_failing_on(&[2])).unwrap_err();
        assert!(matches!(err, FsError::SwapFailed { .. }));
        assert_untouched(&a, &b);
        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_third_step_rolls_back_both_files() {
        let (dir, a, b) = setup();
        let scratch = dir.path().join("scratch");
        let err = swap_by_copy_with(&a, &b, &scratch, &mut copy_failing_on(&[3])).unwrap_err();
        match err {
            FsError::SwapFailed { first, second, reason } => {
                assert_eq!(first, a);
                assert_eq!(second, b);
                assert!(reason.contains("disk full"));
                assert!(!reason.contains("rollback failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_untouched(&a, &b);
        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_rollback_keeps_scratch_copy() {
        let (dir, a, b) = setup();
        let scratch = dir.path().join("scratch");
        let err = swap_by_copy_with(&a, &b, &scratch, &mut copy_failing_on(&[3, 4])).unwrap_err();
        match err {
            FsError::SwapFailed { reason, .. } => assert!(reason.contains("rollback failed")),
            other => panic!("unexpected error: {other:?}"),
        }
        let kept: Vec<PathBuf> = fs::read_dir(&scratch).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(fs::read(&kept[0]).unwrap(), b"first");
    }

    #[test]
    fn test_swap_rejects_directories() {
        let (dir, a, _) = setup();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let err = swap(&a, &sub.to_string_lossy(), dir.path()).unwrap_err();
        assert!(matches!(err, FsError::NotAFile(_)));
    }
}
