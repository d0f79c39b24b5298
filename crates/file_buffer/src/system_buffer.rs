//! File-backed [`FileBuffer`] over a [`PositionalFile`].

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::buffer::{FileBuffer, check_range};
use crate::error::{FileBufferError, FileBufferResult};
use crate::handle::PositionalFile;
use crate::mapped_buffer::MappedFileBuffer;
use crate::mapping::{FileMapping, MapMode, allocation_granularity};

/// A [`FileBuffer`] that reads and writes an open file by position.
///
/// Positional reads and writes share the handle. Truncation, flushes and
/// close take it exclusively. Once closed, every operation fails with
/// [`FileBufferError::HandleClosed`].
///
/// # Example
///
/// ```no_run
/// use file_buffer::{FileBuffer, SystemFileBuffer};
///
/// let buffer = SystemFileBuffer::open("data.bin", false)?;
/// buffer.write(0, b"header")?;
/// let mut magic = [0u8; 6];
/// assert_eq!(buffer.read(0, &mut magic)?, Some(6));
/// buffer.close()?;
/// # Ok::<(), file_buffer::FileBufferError>(())
/// ```
#[derive(Debug)]
pub struct SystemFileBuffer {
    handle: RwLock<Option<PositionalFile>>,
    read_only: bool,
    path: PathBuf,
}

impl SystemFileBuffer {
    /// Opens `path` as a buffer. See [`PositionalFile::open`].
    pub fn open(path: impl AsRef<Path>, read_only: bool) -> FileBufferResult<Self> {
        PositionalFile::open(path, read_only).map(Self::from_handle)
    }

    /// Wraps an already open handle.
    #[must_use]
    pub fn from_handle(handle: PositionalFile) -> Self {
        Self {
            read_only: handle.access().is_read_only(),
            path: handle.path().to_path_buf(),
            handle: RwLock::new(Some(handle)),
        }
    }

    /// Returns the path the buffer was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps `size` bytes starting at `position` and returns them as a buffer.
    ///
    /// The mapping covers `position + size` bytes of the file, so a
    /// read-write mapping grows the file when needed. `position` does not
    /// need to be aligned; the view starts at the enclosing granule.
    ///
    /// # Errors
    ///
    /// Returns [`FileBufferError::HandleClosed`] after close,
    /// [`FileBufferError::InvalidArgument`] when the window does not fit in a
    /// single view, and the mapping errors of [`FileMapping::open`].
    pub fn map(&self, mode: MapMode, position: u64, size: u64) -> FileBufferResult<MappedFileBuffer> {
        let guard = self.shared()?;
        let handle = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;

        let end = position
            .checked_add(size)
            .ok_or_else(|| FileBufferError::invalid_argument("mapped range overflows"))?;
        let lead = position % allocation_granularity();
        let window = u32::try_from(lead + size).map_err(|_| {
            FileBufferError::invalid_argument(format!("cannot map {size} bytes in one view"))
        })?;

        let mapping = FileMapping::open(handle, mode, end)?;
        let view = mapping.view(mode, position - lead, window)?;
        Ok(MappedFileBuffer::new(view, lead as usize, size as usize))
    }

    fn shared(&self) -> FileBufferResult<RwLockReadGuard<'_, Option<PositionalFile>>> {
        let guard = self.handle.read().expect("file buffer lock poisoned");
        if guard.is_none() {
            return Err(FileBufferError::HandleClosed);
        }
        Ok(guard)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, Option<PositionalFile>> {
        self.handle.write().expect("file buffer lock poisoned")
    }
}

impl FileBuffer for SystemFileBuffer {
    fn read(&self, position: u64, dst: &mut [u8]) -> FileBufferResult<Option<usize>> {
        check_range(position, dst.len())?;
        let guard = self.shared()?;
        let handle = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;
        handle.read(position, dst)
    }

    fn write(&self, position: u64, src: &[u8]) -> FileBufferResult<usize> {
        check_range(position, src.len())?;
        let guard = self.shared()?;
        let handle = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;
        handle.write(position, src)
    }

    fn size(&self) -> FileBufferResult<u64> {
        let guard = self.shared()?;
        guard.as_ref().ok_or(FileBufferError::HandleClosed)?.size()
    }

    fn truncate(&self, size: u64) -> FileBufferResult<()> {
        let guard = self.exclusive();
        guard
            .as_ref()
            .ok_or(FileBufferError::HandleClosed)?
            .truncate(size)
    }

    fn force(&self, include_metadata: bool) -> FileBufferResult<()> {
        let guard = self.exclusive();
        guard
            .as_ref()
            .ok_or(FileBufferError::HandleClosed)?
            .flush(include_metadata)
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn is_open(&self) -> bool {
        self.handle
            .read()
            .expect("file buffer lock poisoned")
            .is_some()
    }

    fn close(&self) -> FileBufferResult<()> {
        match self.exclusive().take() {
            Some(handle) => handle.close(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::TestDir;

    fn open(dir: &TestDir) -> SystemFileBuffer {
        SystemFileBuffer::open(dir.join("buffer.bin"), false).unwrap()
    }

    #[test]
    fn sparse_write_then_truncate() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);

        assert_eq!(buffer.write(20, b"hello").unwrap(), 5);
        assert_eq!(buffer.size().unwrap(), 25);

        let mut gap = [0xFFu8; 20];
        assert_eq!(buffer.read(0, &mut gap).unwrap(), Some(20));
        assert!(gap.iter().all(|&b| b == 0));

        buffer.truncate(5).unwrap();
        assert_eq!(buffer.size().unwrap(), 5);

        let mut rest = [0u8; 10];
        assert_eq!(buffer.read(0, &mut rest).unwrap(), Some(5));
        assert_eq!(buffer.read(5, &mut rest).unwrap(), None);
    }

    #[test]
    fn operations_after_close_report_handle_closed() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        buffer.write(0, b"data").unwrap();
        buffer.close().unwrap();

        assert!(!buffer.is_open());
        let mut buf = [0u8; 4];
        assert!(buffer.read(0, &mut buf).unwrap_err().is_handle_closed());
        assert!(buffer.write(0, b"x").unwrap_err().is_handle_closed());
        assert!(buffer.size().unwrap_err().is_handle_closed());
        assert!(buffer.truncate(0).unwrap_err().is_handle_closed());
        assert!(buffer.force(true).unwrap_err().is_handle_closed());
        assert!(buffer.read_byte(0).unwrap_err().is_handle_closed());
        assert!(buffer.map(MapMode::ReadOnly, 0, 4).unwrap_err().is_handle_closed());
        assert_eq!(
            buffer.read(0, &mut buf).unwrap_err().to_string(),
            "FileBuffer closed"
        );
    }

    #[test]
    fn double_close_is_a_no_op() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        buffer.close().unwrap();
        buffer.close().unwrap();
    }

    #[test]
    fn zero_length_operations_return_zero() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        assert_eq!(buffer.read(100, &mut []).unwrap(), Some(0));
        assert_eq!(buffer.write(100, &[]).unwrap(), 0);
        assert_eq!(buffer.size().unwrap(), 0);
    }

    #[test]
    fn overflowing_range_is_an_argument_error() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        let err = buffer.write(u64::MAX - 1, b"abc").unwrap_err();
        assert!(matches!(err, FileBufferError::InvalidArgument(_)));
    }

    #[test]
    fn read_only_buffer_rejects_writes() {
        let dir = TestDir::new().unwrap();
        dir.write_file("ro.bin", b"fixed").unwrap();
        let buffer = SystemFileBuffer::open(dir.join("ro.bin"), true).unwrap();

        assert!(buffer.is_read_only());
        assert!(matches!(
            buffer.write(0, b"x").unwrap_err(),
            FileBufferError::Io { code: Some(_), .. }
        ));
        assert_eq!(buffer.read_byte(4).unwrap(), Some(b'd'));
    }

    #[test]
    fn unaligned_map_exposes_requested_window() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        buffer.write(0, b"0123456789").unwrap();

        let mapped = buffer.map(MapMode::ReadOnly, 3, 4).unwrap();
        assert_eq!(mapped.size().unwrap(), 4);
        let mut buf = [0u8; 8];
        assert_eq!(mapped.read(0, &mut buf).unwrap(), Some(4));
        assert_eq!(&buf[..4], b"3456");
    }

    #[test]
    fn read_write_map_grows_file_and_writes_through() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);

        let mapped = buffer.map(MapMode::ReadWrite, 8, 8).unwrap();
        assert_eq!(buffer.size().unwrap(), 16);
        mapped.write(0, b"mapped!!").unwrap();
        mapped.force(false).unwrap();

        let mut buf = [0u8; 8];
        buffer.read(8, &mut buf).unwrap();
        assert_eq!(&buf, b"mapped!!");
    }

    #[test]
    fn disjoint_writes_from_many_threads_land() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);

        std::thread::scope(|scope| {
            for worker in 0..8u8 {
                let buffer = &buffer;
                scope.spawn(move || {
                    let chunk = [b'a' + worker; 64];
                    for round in 0..16u64 {
                        let position = (round * 8 + u64::from(worker)) * 64;
                        assert_eq!(buffer.write(position, &chunk).unwrap(), 64);
                    }
                });
            }
        });

        assert_eq!(buffer.size().unwrap(), 8 * 16 * 64);
        let mut chunk = [0u8; 64];
        for slot in 0..128u64 {
            buffer.read(slot * 64, &mut chunk).unwrap();
            let expected = b'a' + (slot % 8) as u8;
            assert!(chunk.iter().all(|&b| b == expected), "slot {slot}");
        }
    }

    #[test]
    fn write_proceeds_while_a_reader_holds_the_handle() {
        let dir = TestDir::new().unwrap();
        let buffer = open(&dir);
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        std::thread::scope(|scope| {
            let reader = buffer.shared().unwrap();
            scope.spawn(|| {
                buffer.write(0, b"shared").unwrap();
                done_tx.send(()).unwrap();
            });
            let finished = done_rx.recv_timeout(std::time::Duration::from_secs(10));
            drop(reader);
            assert!(finished.is_ok(), "write waited for the reader");
        });

        assert_eq!(buffer.read_byte(5).unwrap(), Some(b'd'));
    }
}
