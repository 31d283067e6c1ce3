//! Per-platform file attributes

use fsport_core::{FsError, FsResult};
use std::fs;
use std::path::Path;

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn metadata(path: &Path) -> FsResult<fs::Metadata> {
    fs::metadata(path).map_err(|e| FsError::from_io(e, display(path)))
}

#[cfg(unix)]
pub(crate) fn is_hidden(path: &Path, _meta: &fs::Metadata) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(windows)]
pub(crate) fn is_hidden(_path: &Path, meta: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

/// Unix hides by naming convention only, so there is nothing to set.
#[cfg(unix)]
pub(crate) fn set_hidden(path: &Path, is_hidden: bool) -> FsResult<()> {
    metadata(path)?;
    tracing::debug!(path = %path.display(), is_hidden, "hidden attribute not supported, ignoring");
    Ok(())
}

#[cfg(windows)]
pub(crate) fn set_hidden(path: &Path, is_hidden: bool) -> FsResult<()> {
    use std::os::windows::ffi::OsStrExt;
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::{SetFileAttributesW, FILE_ATTRIBUTE_HIDDEN};

    let attrs = metadata(path)?.file_attributes();
    let updated = if is_hidden {
        attrs | FILE_ATTRIBUTE_HIDDEN
    } else {
        attrs & !FILE_ATTRIBUTE_HIDDEN
    };
    if updated == attrs {
        return Ok(());
    }

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives the call.
    let ok = unsafe { SetFileAttributesW(wide.as_ptr(), updated) };
    if ok == 0 {
        return Err(FsError::from_io(std::io::Error::last_os_error(), display(path)));
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_read_only(path: &Path, read_only: bool) -> FsResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = metadata(path)?.permissions();
    let mode = perms.mode();
    let updated = if read_only { mode & !0o222 } else { mode | 0o200 };
    if updated != mode {
        perms.set_mode(updated);
        fs::set_permissions(path, perms).map_err(|e| FsError::from_io(e, display(path)))?;
    }
    Ok(())
}

#[cfg(windows)]
pub(crate) fn set_read_only(path: &Path, read_only: bool) -> FsResult<()> {
    let mut perms = metadata(path)?.permissions();
    if perms.readonly() != read_only {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(read_only);
        fs::set_permissions(path, perms).map_err(|e| FsError::from_io(e, display(path)))?;
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_executable(path: &Path) -> FsResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = metadata(path)?.permissions();
    let mode = perms.mode();
    if mode & 0o100 == 0 {
        perms.set_mode(mode | 0o100);
        fs::set_permissions(path, perms).map_err(|e| FsError::from_io(e, display(path)))?;
    }
    Ok(())
}

#[cfg(windows)]
pub(crate) fn set_executable(path: &Path) -> FsResult<()> {
    metadata(path)?;
    Ok(())
}
