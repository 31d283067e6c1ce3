//! Open file streams

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::open::FileOpenOptions;

/// A stream returned by the port's open operations.
///
/// Owns the underlying handle; dropping the stream closes it.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    path: String,
    options: FileOpenOptions,
}

impl FileStream {
    pub fn new(file: File, path: impl Into<String>, options: FileOpenOptions) -> Self {
        Self {
            file,
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> FileOpenOptions {
        self.options
    }

    /// Whether the stream was opened for asynchronous use.
    pub fn is_async(&self) -> bool {
        self.options.contains(FileOpenOptions::ASYNCHRONOUS)
    }

    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn as_file(&self) -> &File {
        &self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    /// Hand the handle to tokio for use from async code.
    pub fn into_async(self) -> tokio::fs::File {
        tokio::fs::File::from_std(self.file)
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
