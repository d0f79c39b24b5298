//! Owned OS file handle with positional (cursor-free) access.
//!
//! [`PositionalFile`] owns exactly one open file. Every read and write names
//! its absolute 64-bit position, so the same handle can be shared by
//! reference across threads for independent positional calls. The handle is
//! released once, either explicitly through [`PositionalFile::close`], which
//! reports the platform's close error, or implicitly on drop.
//!
//! # End-of-file retry
//!
//! Windows reports a positioned read that starts at or past the end of the
//! file as `ERROR_HANDLE_EOF` instead of a zero count. When that happens the
//! handle is re-seeked to the requested position and a single
//! unpositioned read recovers the trailing byte count. The seek and the
//! retry are not atomic: callers reading overlapping ranges concurrently
//! while another thread truncates must serialise externally. Unix `pread`
//! never raises the signal, so the retry only runs on Windows.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::debug_io;
use crate::error::{FileBufferError, FileBufferResult, translate_io_error};
use crate::sys;

/// Largest absolute position accepted by positional operations.
///
/// Positions are signed 64-bit values at the platform boundary.
pub const MAX_POSITION: u64 = i64::MAX as u64;

/// Access requested when opening a file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AccessMode {
    /// Open an existing file for reading only. Never creates the file.
    ReadOnly,
    /// Open or create a file for reading and writing.
    ReadWrite,
}

impl AccessMode {
    /// Selects the access mode from a read-only flag.
    #[must_use]
    pub const fn from_read_only(read_only: bool) -> Self {
        if read_only { Self::ReadOnly } else { Self::ReadWrite }
    }

    /// Returns `true` for [`AccessMode::ReadOnly`].
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

/// An open file accessed by absolute position.
#[derive(Debug)]
pub struct PositionalFile {
    file: File,
    access: AccessMode,
    path: PathBuf,
}

impl PositionalFile {
    /// Opens `path` for positional access.
    ///
    /// Read-only handles require the file to exist; read-write handles create
    /// it when missing and never truncate existing content.
    pub fn open(path: impl AsRef<Path>, read_only: bool) -> FileBufferResult<Self> {
        let path = path.as_ref();
        let access = AccessMode::from_read_only(read_only);
        let file = sys::open(path, access).map_err(translate_io_error)?;
        let handle = Self {
            file,
            access,
            path: path.to_path_buf(),
        };
        debug_io::trace_open(&handle.path, access, || handle.size().ok());
        Ok(handle)
    }

    /// Returns the access mode the handle was opened with.
    #[must_use]
    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// Returns the path the handle was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads up to `dst.len()` bytes starting at `position`.
    ///
    /// Returns `None` when no byte is available at or beyond end-of-file and
    /// `Some(n)` otherwise; `n` is short only at end-of-file. An empty `dst`
    /// returns `Some(0)` without touching the file.
    pub fn read(&self, position: u64, dst: &mut [u8]) -> FileBufferResult<Option<usize>> {
        check_position(position)?;
        if dst.is_empty() {
            return Ok(Some(0));
        }

        let amount = match sys::read_at(&self.file, dst, position) {
            Ok(n) => n,
            Err(err) if sys::is_eof_signal(&err) => self.reread_after_eof(position, dst)?,
            Err(err) => return Err(translate_io_error(err)),
        };

        Ok((amount > 0).then_some(amount))
    }

    /// Re-seeks to `position` and performs one unpositioned read.
    fn reread_after_eof(&self, position: u64, dst: &mut [u8]) -> FileBufferResult<usize> {
        debug_io::trace_eof_retry(&self.path, position, dst.len());
        let mut file = &self.file;
        file.seek(SeekFrom::Start(position))
            .map_err(translate_io_error)?;
        file.read(dst).map_err(translate_io_error)
    }

    /// Writes all of `src` at `position`, extending the file when needed.
    ///
    /// Writing past the current end leaves a zero-filled gap between the old
    /// end and `position`. Returns the number of bytes written.
    pub fn write(&self, position: u64, src: &[u8]) -> FileBufferResult<usize> {
        check_position(position)?;
        self.check_writable()?;
        if src.is_empty() {
            return Ok(0);
        }
        sys::write_at(&self.file, src, position).map_err(translate_io_error)
    }

    /// Reads the byte at `position`, or `None` at end-of-file.
    pub fn read_byte(&self, position: u64) -> FileBufferResult<Option<u8>> {
        let mut byte = [0u8; 1];
        Ok(self.read(position, &mut byte)?.map(|_| byte[0]))
    }

    /// Writes a single byte at `position`.
    pub fn write_byte(&self, position: u64, value: u8) -> FileBufferResult<()> {
        self.write(position, &[value]).map(|_| ())
    }

    /// Returns the current file length in bytes.
    pub fn size(&self) -> FileBufferResult<u64> {
        self.file
            .metadata()
            .map(|metadata| metadata.len())
            .map_err(translate_io_error)
    }

    /// Shrinks the file to `new_size` bytes.
    ///
    /// Does nothing when `new_size` is at or beyond the current length:
    /// truncation never grows a file.
    pub fn truncate(&self, new_size: u64) -> FileBufferResult<()> {
        check_position(new_size)?;
        let current = self.size()?;
        if new_size >= current {
            return Ok(());
        }
        self.check_writable()?;
        debug_io::trace_truncate(&self.path, current, new_size);
        self.file.set_len(new_size).map_err(translate_io_error)
    }

    /// Forces buffered writes to stable storage.
    ///
    /// With `include_metadata` the file metadata is synchronised as well.
    /// Platforms without a data-only primitive flush both regardless of the
    /// flag, so a data-only request is best-effort.
    pub fn flush(&self, include_metadata: bool) -> FileBufferResult<()> {
        debug_io::trace_flush(&self.path, include_metadata);
        sys::sync(&self.file, include_metadata).map_err(translate_io_error)
    }

    /// Releases the handle, reporting the platform's close error.
    pub fn close(self) -> FileBufferResult<()> {
        debug_io::trace_close(&self.path);
        sys::close(self.file).map_err(translate_io_error)
    }

    /// Returns the underlying file for components that derive OS objects from it.
    pub(crate) fn file(&self) -> &File {
        &self.file
    }

    fn check_writable(&self) -> FileBufferResult<()> {
        if self.access.is_read_only() {
            return Err(FileBufferError::access_denied());
        }
        Ok(())
    }
}

fn check_position(position: u64) -> FileBufferResult<()> {
    if position > MAX_POSITION {
        return Err(FileBufferError::invalid_argument(format!(
            "position {position} exceeds the maximum file offset {MAX_POSITION}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::TestDir;

    fn open_rw(dir: &TestDir, name: &str) -> PositionalFile {
        PositionalFile::open(dir.join(name), false).expect("open read-write")
    }

    #[test]
    fn read_write_round_trip() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");

        assert_eq!(handle.write(0, b"hello world").unwrap(), 11);
        let mut buf = [0u8; 5];
        assert_eq!(handle.read(6, &mut buf).unwrap(), Some(5));
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn read_at_end_of_file_returns_none() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");
        handle.write(0, b"abc").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(handle.read(3, &mut buf).unwrap(), None);
        assert_eq!(handle.read(1000, &mut buf).unwrap(), None);
        assert_eq!(handle.read_byte(3).unwrap(), None);
    }

    #[test]
    fn read_across_end_of_file_is_short() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");
        handle.write(0, b"abcdef").unwrap();

        let mut buf = [0u8; 10];
        assert_eq!(handle.read(4, &mut buf).unwrap(), Some(2));
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn empty_read_and_write_touch_nothing() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");

        assert_eq!(handle.read(50, &mut []).unwrap(), Some(0));
        assert_eq!(handle.write(50, &[]).unwrap(), 0);
        assert_eq!(handle.size().unwrap(), 0);
    }

    #[test]
    fn single_byte_access() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");

        handle.write_byte(3, 0xAB).unwrap();
        assert_eq!(handle.size().unwrap(), 4);
        assert_eq!(handle.read_byte(3).unwrap(), Some(0xAB));
        assert_eq!(handle.read_byte(0).unwrap(), Some(0));
    }

    #[test]
    fn truncate_never_grows() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");
        handle.write(0, &[7u8; 16]).unwrap();

        handle.truncate(32).unwrap();
        assert_eq!(handle.size().unwrap(), 16);

        handle.truncate(16).unwrap();
        assert_eq!(handle.size().unwrap(), 16);

        handle.truncate(4).unwrap();
        assert_eq!(handle.size().unwrap(), 4);
    }

    #[test]
    fn read_only_open_of_missing_file_fails_with_code() {
        let dir = TestDir::new().unwrap();
        let err = PositionalFile::open(dir.join("missing"), true).unwrap_err();
        assert!(matches!(err, FileBufferError::Io { code: Some(_), .. }));
        assert!(!dir.exists("missing"));
    }

    #[test]
    fn read_write_open_creates_without_truncating() {
        let dir = TestDir::new().unwrap();
        dir.write_file("existing", b"keep me").unwrap();

        let handle = open_rw(&dir, "existing");
        assert_eq!(handle.size().unwrap(), 7);

        let _created = open_rw(&dir, "fresh");
        assert!(dir.exists("fresh"));
    }

    #[test]
    fn writes_through_read_only_handle_are_denied() {
        let dir = TestDir::new().unwrap();
        dir.write_file("ro", b"content").unwrap();
        let handle = PositionalFile::open(dir.join("ro"), true).unwrap();

        let err = handle.write(0, b"x").unwrap_err();
        assert_eq!(err.code(), Some(sys::ACCESS_DENIED));
        let err = handle.truncate(1).unwrap_err();
        assert_eq!(err.code(), Some(sys::ACCESS_DENIED));
        assert_eq!(handle.access(), AccessMode::ReadOnly);
    }

    #[test]
    fn positions_beyond_signed_range_are_rejected() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");
        let mut buf = [0u8; 1];
        let err = handle.read(MAX_POSITION + 1, &mut buf).unwrap_err();
        assert!(matches!(err, FileBufferError::InvalidArgument(_)));
    }

    #[test]
    fn flush_and_close_succeed() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");
        handle.write(0, b"durable").unwrap();
        handle.flush(false).unwrap();
        handle.flush(true).unwrap();
        handle.close().unwrap();
        assert_eq!(dir.read_file("data.bin").unwrap(), b"durable");
    }

    #[test]
    fn concurrent_positional_writes_to_disjoint_ranges() {
        let dir = TestDir::new().unwrap();
        let handle = open_rw(&dir, "data.bin");

        std::thread::scope(|scope| {
            for chunk in 0u8..8 {
                let handle = &handle;
                scope.spawn(move || {
                    handle
                        .write(u64::from(chunk) * 64, &[chunk; 64])
                        .expect("write chunk");
                });
            }
        });

        assert_eq!(handle.size().unwrap(), 512);
        for chunk in 0u8..8 {
            assert_eq!(handle.read_byte(u64::from(chunk) * 64 + 63).unwrap(), Some(chunk));
        }
    }
}
