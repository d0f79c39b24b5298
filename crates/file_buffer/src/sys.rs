//! Platform primitives for positional I/O, handle release and mapping geometry.
//!
//! Everything that differs between Unix and Windows lives here so the handle
//! and mapping modules stay platform-neutral:
//!
//! - positioned reads and writes (`pread`/`pwrite` vs. overlapped `ReadFile`/`WriteFile`)
//! - the distinguished end-of-file signal of positioned reads on Windows
//!
//! Windows reads call `ReadFile` with an `OVERLAPPED` offset directly.
//! `FileExt::seek_read` in std folds `ERROR_HANDLE_EOF` into `Ok(0)`, which
//! would leave the end-of-file retry in the handle module unreachable. On
//! Unix `pread` reports end-of-file as a zero count, so the retry never runs
//! there.
//! - stale-handle detection (`EBADF` vs. `ERROR_INVALID_HANDLE`)
//! - close with error reporting, which `Drop for File` discards
//! - the allocation granularity mapped view offsets must be aligned to

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use crate::handle::AccessMode;

#[cfg(unix)]
mod imp {
    use super::{AccessMode, File, OpenOptions, Path, io};
    use std::os::fd::IntoRawFd;
    use std::os::unix::fs::FileExt;

    pub const STALE_HANDLE: i32 = libc::EBADF;
    pub const ACCESS_DENIED: i32 = libc::EACCES;
    pub const INVALID_PARAMETER: i32 = libc::EINVAL;

    pub fn open(path: &Path, access: AccessMode) -> io::Result<File> {
        match access {
            AccessMode::ReadOnly => OpenOptions::new().read(true).open(path),
            AccessMode::ReadWrite => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path),
        }
    }

    pub fn read_at(file: &File, buf: &mut [u8], position: u64) -> io::Result<usize> {
        file.read_at(buf, position)
    }

    pub fn write_at(file: &File, buf: &[u8], position: u64) -> io::Result<usize> {
        file.write_all_at(buf, position)?;
        Ok(buf.len())
    }

    /// `pread` reports end-of-file as a zero count, never as an error.
    pub fn is_eof_signal(_error: &io::Error) -> bool {
        false
    }

    pub fn sync(file: &File, include_metadata: bool) -> io::Result<()> {
        if include_metadata {
            file.sync_all()
        } else {
            file.sync_data()
        }
    }

    pub fn close(file: File) -> io::Result<()> {
        let fd = file.into_raw_fd();
        // SAFETY: `fd` was just released from an owned `File`, so it is open and
        // nothing else will close it.
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn allocation_granularity() -> u64 {
        // SAFETY: sysconf has no preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 { size as u64 } else { 4096 }
    }
}

#[cfg(windows)]
mod imp {
    use super::{AccessMode, File, OpenOptions, Path, io};
    use std::os::windows::fs::{FileExt, OpenOptionsExt};
    use std::os::windows::io::{AsRawHandle, IntoRawHandle};

    use windows_sys::Win32::Foundation::{
        CloseHandle, ERROR_ACCESS_DENIED, ERROR_HANDLE_EOF, ERROR_INVALID_HANDLE,
        ERROR_INVALID_PARAMETER,
    };
    use windows_sys::Win32::Storage::FileSystem::{FILE_SHARE_READ, FILE_SHARE_WRITE, ReadFile};
    use windows_sys::Win32::System::IO::OVERLAPPED;
    use windows_sys::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};

    pub const STALE_HANDLE: i32 = ERROR_INVALID_HANDLE as i32;
    pub const ACCESS_DENIED: i32 = ERROR_ACCESS_DENIED as i32;
    pub const INVALID_PARAMETER: i32 = ERROR_INVALID_PARAMETER as i32;

    pub fn open(path: &Path, access: AccessMode) -> io::Result<File> {
        match access {
            AccessMode::ReadOnly => OpenOptions::new()
                .read(true)
                .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE)
                .open(path),
            AccessMode::ReadWrite => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .share_mode(FILE_SHARE_READ)
                .open(path),
        }
    }

    /// Positioned read that surfaces `ERROR_HANDLE_EOF` to the caller.
    pub fn read_at(file: &File, buf: &mut [u8], position: u64) -> io::Result<usize> {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut read = 0u32;
        // SAFETY: OVERLAPPED is plain data; all-zero is its documented initial state.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
        overlapped.Anonymous.Anonymous.Offset = position as u32;
        overlapped.Anonymous.Anonymous.OffsetHigh = (position >> 32) as u32;
        // SAFETY: `buf` is valid for `len` bytes and the handle is owned by `file`
        // for the duration of this synchronous call.
        let ok = unsafe {
            ReadFile(
                file.as_raw_handle(),
                buf.as_mut_ptr(),
                len,
                &mut read,
                &mut overlapped,
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(read as usize)
    }

    pub fn write_at(file: &File, buf: &[u8], position: u64) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            let n = file.seek_write(&buf[written..], position + written as u64)?;
            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            written += n;
        }
        Ok(written)
    }

    pub fn is_eof_signal(error: &io::Error) -> bool {
        error.raw_os_error() == Some(ERROR_HANDLE_EOF as i32)
    }

    /// `FlushFileBuffers` has no data-only variant, so the flag is best-effort.
    pub fn sync(file: &File, _include_metadata: bool) -> io::Result<()> {
        file.sync_all()
    }

    pub fn close(file: File) -> io::Result<()> {
        let handle = file.into_raw_handle();
        // SAFETY: `handle` was just released from an owned `File`.
        if unsafe { CloseHandle(handle) } != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn allocation_granularity() -> u64 {
        // SAFETY: GetSystemInfo only writes into the provided struct.
        let info = unsafe {
            let mut info: SYSTEM_INFO = std::mem::zeroed();
            GetSystemInfo(&mut info);
            info
        };
        u64::from(info.dwAllocationGranularity)
    }
}

pub(crate) use imp::{
    ACCESS_DENIED, INVALID_PARAMETER, STALE_HANDLE, allocation_granularity, close, is_eof_signal,
    open, read_at, sync, write_at,
};

/// Returns `true` when `code` means the handle reference is no longer valid.
pub(crate) fn is_stale_handle(code: i32) -> bool {
    code == STALE_HANDLE
}
