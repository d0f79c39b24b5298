//! Memory-mapped regions over positional file handles.
//!
//! A [`FileMapping`] is the mapping object: it records the protection mode and
//! the 64-bit size of the mapped range and keeps its own duplicate of the OS
//! handle, so it stays usable after the originating [`PositionalFile`] is
//! closed. A [`MappedView`] is the window into process memory created from a
//! mapping. Views, mappings and handles are released independently, in any
//! order, when dropped.
//!
//! # Alignment
//!
//! View offsets must be multiples of [`allocation_granularity`]. Misaligned
//! offsets are rejected with an I/O error rather than rounded, because the
//! caller owns the layout decision.
//!
//! # Bounds
//!
//! Byte and range accessors on [`MappedView`] take offsets relative to the
//! start of the view. Offsets outside `[0, len)` are caller bugs and panic.
//! Truncating the backing file below a live view is equally a caller bug: on
//! Unix, touching pages past the new end raises `SIGBUS`.

use std::fs::File;

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::debug_io;
use crate::error::{FileBufferError, FileBufferResult, translate_io_error};
use crate::handle::PositionalFile;
use crate::sys;

/// Protection mode of a mapping or view.
///
/// The numeric codes are stable: `1` read-only, `2` read-write, `3`
/// copy-on-write.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MapMode {
    /// Pages may be read but not written.
    ReadOnly,
    /// Writes reach the backing file.
    ReadWrite,
    /// Writes stay private to this process and never reach the file.
    CopyOnWrite,
}

impl MapMode {
    /// Returns the stable numeric code of the mode.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ReadOnly => 1,
            Self::ReadWrite => 2,
            Self::CopyOnWrite => 3,
        }
    }

    /// Looks up a mode by its numeric code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::ReadOnly),
            2 => Some(Self::ReadWrite),
            3 => Some(Self::CopyOnWrite),
            _ => None,
        }
    }

    /// Returns `true` when writes through a view of this mode are allowed.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }

    /// Whether a view of mode `view` may be created from a mapping of this mode.
    const fn permits_view(self, view: Self) -> bool {
        matches!(
            (self, view),
            (_, Self::ReadOnly) | (Self::ReadWrite, _) | (Self::CopyOnWrite, Self::CopyOnWrite)
        )
    }
}

impl TryFrom<i32> for MapMode {
    type Error = FileBufferError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
            .ok_or_else(|| FileBufferError::invalid_argument(format!("unknown mapping mode {code}")))
    }
}

/// Returns the alignment required for view offsets.
///
/// This is the page size on Unix and the allocation granularity (usually
/// 64 KiB) on Windows.
#[must_use]
pub fn allocation_granularity() -> u64 {
    sys::allocation_granularity()
}

/// A mapping object covering the first `size` bytes of a file.
#[derive(Debug)]
pub struct FileMapping {
    file: File,
    mode: MapMode,
    size: u64,
}

impl FileMapping {
    /// Creates a mapping of `size` bytes with protection `mode` over `handle`.
    ///
    /// A read-write mapping larger than the file grows the file to `size`.
    /// Read-only and copy-on-write mappings must fit within the current file.
    ///
    /// # Errors
    ///
    /// Fails with [`FileBufferError::Io`] for a zero-length mapping, for a
    /// read-write mapping over a read-only handle, for a read-only or
    /// copy-on-write mapping larger than the file, and for any platform
    /// failure. The handle stays open and usable in every failure case.
    pub fn open(handle: &PositionalFile, mode: MapMode, size: u64) -> FileBufferResult<Self> {
        if size == 0 {
            return Err(FileBufferError::invalid_parameter());
        }
        if mode == MapMode::ReadWrite && handle.access().is_read_only() {
            return Err(FileBufferError::access_denied());
        }

        let file = handle.file().try_clone().map_err(translate_io_error)?;
        let current = handle.size()?;
        let grew_file = size > current;
        if grew_file {
            if mode != MapMode::ReadWrite {
                return Err(FileBufferError::invalid_parameter());
            }
            file.set_len(size).map_err(translate_io_error)?;
        }

        debug_io::trace_map_open(mode, size, grew_file);
        Ok(Self { file, mode, size })
    }

    /// Returns the protection mode of the mapping.
    #[must_use]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Returns the mapped size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Maps `len` bytes starting at `offset` into the address space.
    ///
    /// # Errors
    ///
    /// Fails with [`FileBufferError::Io`] when `offset` is not a multiple of
    /// [`allocation_granularity`], when the window is empty or extends past the
    /// mapping (or past the current end of the backing file), when `mode` is
    /// not compatible with the mapping mode, or when the platform cannot map
    /// the range.
    pub fn view(&self, mode: MapMode, offset: u64, len: u32) -> FileBufferResult<MappedView> {
        if !self.mode.permits_view(mode) {
            return Err(FileBufferError::access_denied());
        }
        if len == 0 || offset % allocation_granularity() != 0 {
            return Err(FileBufferError::invalid_parameter());
        }
        let end = offset
            .checked_add(u64::from(len))
            .ok_or_else(FileBufferError::invalid_parameter)?;
        let file_len = self.file.metadata().map_err(translate_io_error)?.len();
        if end > self.size || end > file_len {
            return Err(FileBufferError::invalid_parameter());
        }

        let mut options = MmapOptions::new();
        options.offset(offset).len(len as usize);

        // SAFETY: the mapped range lies within the file as checked above. The
        // file may still be modified by other processes or handles; such
        // writes show through the mapping exactly as shared memory would, and
        // shrinking the file under a live view is documented as a caller bug.
        let memory = match mode {
            MapMode::ReadOnly => unsafe { options.map(&self.file) }.map(ViewMemory::ReadOnly),
            MapMode::ReadWrite => unsafe { options.map_mut(&self.file) }.map(ViewMemory::Writable),
            MapMode::CopyOnWrite => {
                unsafe { options.map_copy(&self.file) }.map(ViewMemory::Writable)
            }
        }
        .map_err(translate_io_error)?;

        debug_io::trace_map_view(mode, offset, len);
        Ok(MappedView {
            memory,
            mode,
            offset,
        })
    }
}

#[derive(Debug)]
enum ViewMemory {
    ReadOnly(Mmap),
    Writable(MmapMut),
}

/// A window of process memory backed by a [`FileMapping`].
#[derive(Debug)]
pub struct MappedView {
    memory: ViewMemory,
    mode: MapMode,
    offset: u64,
}

impl MappedView {
    /// Returns the protection mode of the view.
    #[must_use]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Returns the offset of the view within the mapping.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the length of the view in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` when the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the mapped bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match &self.memory {
            ViewMemory::ReadOnly(map) => map,
            ViewMemory::Writable(map) => map,
        }
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    ///
    /// # Panics
    ///
    /// Panics when `offset + dst.len()` exceeds [`MappedView::len`].
    pub fn read(&self, offset: usize, dst: &mut [u8]) -> usize {
        dst.copy_from_slice(&self.as_slice()[offset..offset + dst.len()]);
        dst.len()
    }

    /// Copies `src` into the view starting at `offset`.
    ///
    /// # Errors
    ///
    /// Fails with [`FileBufferError::Io`] (access denied) on read-only views.
    ///
    /// # Panics
    ///
    /// Panics when `offset + src.len()` exceeds [`MappedView::len`].
    pub fn write(&mut self, offset: usize, src: &[u8]) -> FileBufferResult<usize> {
        self.writable()?[offset..offset + src.len()].copy_from_slice(src);
        Ok(src.len())
    }

    /// Returns the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is outside the view.
    #[must_use]
    pub fn read_byte(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Stores `value` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics when `offset` is outside the view.
    pub fn write_byte(&mut self, offset: usize, value: u8) -> FileBufferResult<()> {
        self.writable()?[offset] = value;
        Ok(())
    }

    /// Writes dirty pages in `[offset, offset + len)` back to the file.
    ///
    /// Read-only views have nothing to write back and copy-on-write views
    /// never reach the file, so both succeed without a syscall.
    pub fn flush(&self, offset: usize, len: usize) -> FileBufferResult<()> {
        if self.mode != MapMode::ReadWrite || len == 0 {
            return Ok(());
        }
        debug_io::trace_view_flush(self.mode, offset, len);
        match &self.memory {
            ViewMemory::Writable(map) => map.flush_range(offset, len).map_err(translate_io_error),
            ViewMemory::ReadOnly(_) => Ok(()),
        }
    }

    fn writable(&mut self) -> FileBufferResult<&mut [u8]> {
        match &mut self.memory {
            ViewMemory::Writable(map) => Ok(map),
            ViewMemory::ReadOnly(_) => Err(FileBufferError::access_denied()),
        }
    }
}
