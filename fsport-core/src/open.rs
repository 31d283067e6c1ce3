//! Stream opening parameters

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// What to do about the target's existence when opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FileOpenMode {
    /// Create a new file; fails if it already exists.
    CreateNew = 1,
    /// Create a new file, truncating any existing one.
    Create = 2,
    /// Open an existing file; fails if it is absent.
    Open = 3,
    /// Open the file if it exists, otherwise create it.
    OpenOrCreate = 4,
}

impl FileOpenMode {
    /// Modes that always write to the target and so need write access.
    pub fn requires_write(self) -> bool {
        matches!(self, FileOpenMode::CreateNew | FileOpenMode::Create)
    }
}

/// Access requested for the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FileAccessMode {
    Read = 1,
    Write = 2,
    ReadWrite = 3,
}

impl FileAccessMode {
    pub fn can_read(self) -> bool {
        self as u8 & FileAccessMode::Read as u8 != 0
    }

    pub fn can_write(self) -> bool {
        self as u8 & FileAccessMode::Write as u8 != 0
    }
}

/// Access granted to other openers of the same path while the stream is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum FileShareMode {
    #[default]
    None = 0,
    Read = 1,
    Write = 2,
    ReadWrite = 3,
}

impl FileShareMode {
    pub fn allows_read(self) -> bool {
        self as u8 & FileShareMode::Read as u8 != 0
    }

    pub fn allows_write(self) -> bool {
        self as u8 & FileShareMode::Write as u8 != 0
    }
}

bitflags! {
    /// Advisory and behavioural hints for opening a stream.
    ///
    /// Bit values are the Windows `FILE_FLAG_*` / `FILE_ATTRIBUTE_ENCRYPTED`
    /// values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileOpenOptions: u32 {
        const WRITE_THROUGH = 0x8000_0000;
        const ENCRYPTED = 0x0000_4000;
        const DELETE_ON_CLOSE = 0x0400_0000;
        const SEQUENTIAL_SCAN = 0x0800_0000;
        const RANDOM_ACCESS = 0x1000_0000;
        const ASYNCHRONOUS = 0x4000_0000;
    }
}

impl FileOpenOptions {
    /// Options implied by the simplified open overload.
    pub fn from_async_flag(is_async: bool) -> Self {
        if is_async {
            FileOpenOptions::ASYNCHRONOUS
        } else {
            FileOpenOptions::empty()
        }
    }

    /// Flags Windows takes through `custom_flags`; the rest are attributes.
    pub fn windows_flags(self) -> u32 {
        (self - FileOpenOptions::ENCRYPTED).bits()
    }

    pub fn windows_attributes(self) -> u32 {
        (self & FileOpenOptions::ENCRYPTED).bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_bits() {
        assert!(FileAccessMode::Read.can_read());
        assert!(!FileAccessMode::Read.can_write());
        assert!(FileAccessMode::Write.can_write());
        assert!(!FileAccessMode::Write.can_read());
        assert!(FileAccessMode::ReadWrite.can_read());
        assert!(FileAccessMode::ReadWrite.can_write());
    }

    #[test]
    fn test_share_mode_bits() {
        assert!(!FileShareMode::None.allows_read());
        assert!(FileShareMode::Read.allows_read());
        assert!(!FileShareMode::Read.allows_write());
        assert!(FileShareMode::ReadWrite.allows_write());
        assert_eq!(FileShareMode::default(), FileShareMode::None);
    }

    #[test]
    fn test_open_mode_requirements() {
        assert!(FileOpenMode::CreateNew.requires_write());
        assert!(FileOpenMode::Create.requires_write());
        assert!(!FileOpenMode::OpenOrCreate.requires_write());
    }

    #[test]
    fn test_async_flag_maps_to_asynchronous_bit() {
        assert_eq!(FileOpenOptions::from_async_flag(true), FileOpenOptions::ASYNCHRONOUS);
        assert!(FileOpenOptions::from_async_flag(false).is_empty());
    }

    #[test]
    fn test_windows_split() {
        let opts = FileOpenOptions::ENCRYPTED | FileOpenOptions::WRITE_THROUGH;
        assert_eq!(opts.windows_flags(), 0x8000_0000);
        assert_eq!(opts.windows_attributes(), 0x4000);
    }
}
