//! The positional buffer contract shared by file-backed and mapped buffers.
//!
//! A [`FileBuffer`] is a random-access byte store addressed by absolute
//! 64-bit positions. Positions beyond the end of the buffer are never an
//! argument error: reads there report end-of-file and writes either extend
//! the buffer or fail with an I/O error, depending on the implementation.
//! Only positions whose range arithmetic overflows are rejected with
//! [`FileBufferError::InvalidArgument`].

use crate::error::{FileBufferError, FileBufferResult};
use crate::handle::MAX_POSITION;

/// Random-access byte storage with explicit positions.
///
/// All methods take `&self`; implementations synchronise internally so a
/// buffer can be shared across threads.
pub trait FileBuffer: Send + Sync {
    /// Reads up to `dst.len()` bytes at `position`.
    ///
    /// Returns `None` at end-of-file and `Some(n)` otherwise.
    fn read(&self, position: u64, dst: &mut [u8]) -> FileBufferResult<Option<usize>>;

    /// Writes `src` at `position` and returns the number of bytes stored.
    fn write(&self, position: u64, src: &[u8]) -> FileBufferResult<usize>;

    /// Reads the byte at `position`, or `None` at end-of-file.
    fn read_byte(&self, position: u64) -> FileBufferResult<Option<u8>> {
        let mut byte = [0u8; 1];
        Ok(self.read(position, &mut byte)?.map(|_| byte[0]))
    }

    /// Writes a single byte at `position`.
    fn write_byte(&self, position: u64, value: u8) -> FileBufferResult<()> {
        match self.write(position, &[value])? {
            1 => Ok(()),
            _ => Err(FileBufferError::unexpected_eof(
                "byte write past the end of the buffer",
            )),
        }
    }

    /// Returns the current size in bytes.
    fn size(&self) -> FileBufferResult<u64>;

    /// Shrinks the buffer to `size` bytes; never grows it.
    fn truncate(&self, size: u64) -> FileBufferResult<()>;

    /// Forces pending writes to stable storage.
    fn force(&self, include_metadata: bool) -> FileBufferResult<()>;

    /// Returns `true` when writes are rejected.
    fn is_read_only(&self) -> bool;

    /// Returns `false` once the buffer has been closed.
    fn is_open(&self) -> bool;

    /// Releases the underlying resources. Closing twice is a no-op.
    fn close(&self) -> FileBufferResult<()>;
}

/// Rejects ranges whose end cannot be represented as a file offset.
pub(crate) fn check_range(position: u64, len: usize) -> FileBufferResult<()> {
    let end = u64::try_from(len)
        .ok()
        .and_then(|len| position.checked_add(len));
    match end {
        Some(end) if end <= MAX_POSITION => Ok(()),
        _ => Err(FileBufferError::invalid_argument(format!(
            "range of {len} bytes at {position} exceeds the maximum file offset"
        ))),
    }
}
