//! Opening file streams with mode, access, share and option semantics

use fsport_core::{
    FileAccessMode, FileOpenMode, FileOpenOptions, FileShareMode, FileStream, FsError, FsResult,
};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

pub(crate) fn open_stream(
    path: &str,
    mode: FileOpenMode,
    access: FileAccessMode,
    share: FileShareMode,
    options: FileOpenOptions,
) -> FsResult<FileStream> {
    if path.is_empty() {
        return Err(FsError::InvalidArgument("stream path is empty".into()));
    }
    if mode.requires_write() && !access.can_write() {
        return Err(FsError::InvalidArgument(format!(
            "{mode:?} requires write access: {path}"
        )));
    }

    let target = Path::new(path);
    if fs::metadata(target).map(|m| m.is_dir()).unwrap_or(false) {
        return Err(FsError::NotAFile(path.to_string()));
    }

    let mut mode = mode;
    if mode == FileOpenMode::OpenOrCreate && !access.can_write() {
        // Creation needs a writable handle; create first, then reopen read-only.
        match OpenOptions::new().write(true).create_new(true).open(target) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(FsError::from_io(e, path)),
        }
        mode = FileOpenMode::Open;
    }

    let mut opts = OpenOptions::new();
    opts.read(access.can_read()).write(access.can_write());
    match mode {
        FileOpenMode::CreateNew => {
            opts.create_new(true);
        }
        // Truncated only once the share check has passed.
        FileOpenMode::Create | FileOpenMode::OpenOrCreate => {
            opts.create(true).truncate(false);
        }
        FileOpenMode::Open => {}
    }
    platform::apply(&mut opts, share, options);

    let file = opts.open(target).map_err(|e| FsError::from_io(e, path))?;
    platform::after_open(&file, target, share, options)?;
    if mode == FileOpenMode::Create {
        file.set_len(0).map_err(|e| FsError::from_io(e, path))?;
    }

    tracing::trace!(path, ?mode, ?access, ?share, ?options, "opened stream");
    Ok(FileStream::new(file, path, options))
}

#[cfg(unix)]
mod platform {
    use super::*;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    pub(super) fn apply(opts: &mut OpenOptions, _share: FileShareMode, options: FileOpenOptions) {
        if options.contains(FileOpenOptions::WRITE_THROUGH) {
            opts.custom_flags(libc::O_SYNC);
        }
    }

    pub(super) fn after_open(
        file: &File,
        path: &Path,
        share: FileShareMode,
        options: FileOpenOptions,
    ) -> FsResult<()> {
        lock(file, path, share)?;
        advise(file, path, options);

        if options.contains(FileOpenOptions::ENCRYPTED) {
            tracing::debug!(path = %path.display(), "encryption at rest not supported, ignoring");
        }
        if options.contains(FileOpenOptions::DELETE_ON_CLOSE) {
            // The open handle keeps the data alive until it is closed.
            fs::remove_file(path).map_err(|e| FsError::from_io(e, path.display().to_string()))?;
        }
        Ok(())
    }

    /// Advisory emulation of share modes. `None` takes an exclusive lock and
    /// every other opener a shared one, so a `None` holder refuses all later
    /// openers and is itself refused while any other stream is open.
    fn lock(file: &File, path: &Path, share: FileShareMode) -> FsResult<()> {
        let op = if share.allows_read() || share.allows_write() {
            libc::LOCK_SH
        } else {
            libc::LOCK_EX
        };
        // SAFETY: the descriptor is owned by `file` and open for the duration of the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), op | libc::LOCK_NB) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock {
            return Err(FsError::SharingViolation(path.display().to_string()));
        }
        tracing::debug!(path = %path.display(), error = %err, "advisory lock unavailable");
        Ok(())
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn advise(file: &File, path: &Path, options: FileOpenOptions) {
        let advice = if options.contains(FileOpenOptions::SEQUENTIAL_SCAN) {
            libc::POSIX_FADV_SEQUENTIAL
        } else if options.contains(FileOpenOptions::RANDOM_ACCESS) {
            libc::POSIX_FADV_RANDOM
        } else {
            return;
        };
        // SAFETY: the descriptor is owned by `file`; offset 0 and length 0 cover the whole file.
        let rc = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, advice) };
        if rc != 0 {
            tracing::debug!(path = %path.display(), rc, "posix_fadvise failed");
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn advise(_file: &File, _path: &Path, _options: FileOpenOptions) {}
}

#[cfg(windows)]
mod platform {
    use super::*;
    use std::os::windows::fs::OpenOptionsExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_SHARE_DELETE;

    pub(super) fn apply(opts: &mut OpenOptions, share: FileShareMode, options: FileOpenOptions) {
        // FILE_SHARE_READ and FILE_SHARE_WRITE share the enum's bit values.
        let mut share_bits = share as u32;
        if options.contains(FileOpenOptions::DELETE_ON_CLOSE) {
            share_bits |= FILE_SHARE_DELETE;
        }
        opts.share_mode(share_bits);
        // std performs synchronous IO on the handle, so it must not be overlapped.
        let flags = options - FileOpenOptions::ASYNCHRONOUS;
        opts.custom_flags(flags.windows_flags());
        opts.attributes(flags.windows_attributes());
    }

    pub(super) fn after_open(
        _file: &File,
        _path: &Path,
        _share: FileShareMode,
        _options: FileOpenOptions,
    ) -> FsResult<()> {
        Ok(())
    }
}
