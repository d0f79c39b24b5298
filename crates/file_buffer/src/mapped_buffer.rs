//! [`FileBuffer`] over a mapped view with a logical size.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::buffer::{FileBuffer, check_range};
use crate::error::{FileBufferError, FileBufferResult};
use crate::mapping::{MapMode, MappedView};

#[derive(Debug)]
struct MappedState {
    view: MappedView,
    size: usize,
}

/// A mapped window exposed through the [`FileBuffer`] contract.
///
/// Positions are relative to the start of the window. The logical size
/// starts at the mapped size and can only shrink. Reads past it report
/// end-of-file, writes past it fail, and ranges straddling it are clamped.
#[derive(Debug)]
pub struct MappedFileBuffer {
    state: RwLock<Option<MappedState>>,
    mode: MapMode,
    base: usize,
}

impl MappedFileBuffer {
    /// Wraps `view`; the window starts `base` bytes into the view.
    pub(crate) fn new(view: MappedView, base: usize, size: usize) -> Self {
        Self {
            mode: view.mode(),
            state: RwLock::new(Some(MappedState { view, size })),
            base,
        }
    }

    /// Returns the protection mode of the underlying view.
    #[must_use]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    fn shared(&self) -> FileBufferResult<RwLockReadGuard<'_, Option<MappedState>>> {
        let guard = self.state.read().expect("mapped buffer lock poisoned");
        if guard.is_none() {
            return Err(FileBufferError::HandleClosed);
        }
        Ok(guard)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, Option<MappedState>> {
        self.state.write().expect("mapped buffer lock poisoned")
    }
}

/// Number of bytes of a `len`-byte request at `position` inside `size`.
fn clamp(position: u64, len: usize, size: usize) -> Option<usize> {
    let position = usize::try_from(position).ok().filter(|&p| p < size)?;
    Some(len.min(size - position))
}

impl FileBuffer for MappedFileBuffer {
    fn read(&self, position: u64, dst: &mut [u8]) -> FileBufferResult<Option<usize>> {
        check_range(position, dst.len())?;
        let guard = self.shared()?;
        let state = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;
        if dst.is_empty() {
            return Ok(Some(0));
        }
        let Some(amount) = clamp(position, dst.len(), state.size) else {
            return Ok(None);
        };
        let start = self.base + position as usize;
        Ok(Some(state.view.read(start, &mut dst[..amount])))
    }

    fn write(&self, position: u64, src: &[u8]) -> FileBufferResult<usize> {
        check_range(position, src.len())?;
        let mut guard = self.exclusive();
        let state = guard.as_mut().ok_or(FileBufferError::HandleClosed)?;
        if src.is_empty() {
            return Ok(0);
        }
        let Some(amount) = clamp(position, src.len(), state.size) else {
            return Err(FileBufferError::unexpected_eof(format!(
                "write at {position} is past the end of the {}-byte mapped region",
                state.size
            )));
        };
        let start = self.base + position as usize;
        state.view.write(start, &src[..amount])
    }

    fn size(&self) -> FileBufferResult<u64> {
        let guard = self.shared()?;
        let state = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;
        Ok(state.size as u64)
    }

    fn truncate(&self, size: u64) -> FileBufferResult<()> {
        let mut guard = self.exclusive();
        let state = guard.as_mut().ok_or(FileBufferError::HandleClosed)?;
        if let Ok(size) = usize::try_from(size) {
            state.size = state.size.min(size);
        }
        Ok(())
    }

    fn force(&self, _include_metadata: bool) -> FileBufferResult<()> {
        let guard = self.exclusive();
        let state = guard.as_ref().ok_or(FileBufferError::HandleClosed)?;
        state.view.flush(self.base, state.size)
    }

    fn is_read_only(&self) -> bool {
        !self.mode.is_writable()
    }

    fn is_open(&self) -> bool {
        self.state
            .read()
            .expect("mapped buffer lock poisoned")
            .is_some()
    }

    fn close(&self) -> FileBufferResult<()> {
        drop(self.exclusive().take());
        Ok(())
    }
}
