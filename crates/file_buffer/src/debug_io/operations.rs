//! File handle tracing: open, close, end-of-file retry, truncate, flush.

use std::path::Path;

use crate::handle::AccessMode;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Trace a handle open.
///
/// # Arguments
///
/// * `path` - Path the handle was opened from
/// * `access` - Requested access mode
/// * `size` - File length query, only run when the event is recorded
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_open(path: &Path, access: AccessMode, size: impl FnOnce() -> Option<u64>) {
    if !tracing::enabled!(target: "filebuf::io", tracing::Level::DEBUG) {
        return;
    }
    let size = size();
    debug!(
        target: "filebuf::io",
        operation = "open",
        path = %path.display(),
        read_only = access.is_read_only(),
        size = size,
        "open {}",
        path.display()
    );
}

/// Trace a handle open - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_open(_path: &Path, _access: AccessMode, _size: impl FnOnce() -> Option<u64>) {}

/// Trace an explicit handle close.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_close(path: &Path) {
    debug!(
        target: "filebuf::io",
        operation = "close",
        path = %path.display(),
        "close {}",
        path.display()
    );
}

/// Trace an explicit handle close - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_close(_path: &Path) {}

/// Trace the seek-and-reread fallback taken after a positioned read hit the
/// platform's end-of-file signal.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_eof_retry(path: &Path, position: u64, requested: usize) {
    trace!(
        target: "filebuf::io",
        operation = "eof_retry",
        path = %path.display(),
        position = position,
        requested = requested,
        "eof retry at {} for {} bytes",
        position,
        requested
    );
}

/// Trace the end-of-file retry - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_eof_retry(_path: &Path, _position: u64, _requested: usize) {}

/// Trace a shrinking truncate.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_truncate(path: &Path, from: u64, to: u64) {
    debug!(
        target: "filebuf::io",
        operation = "truncate",
        path = %path.display(),
        from = from,
        to = to,
        "truncate {} from {} to {} bytes",
        path.display(),
        from,
        to
    );
}

/// Trace a shrinking truncate - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_truncate(_path: &Path, _from: u64, _to: u64) {}

/// Trace a durability flush.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_flush(path: &Path, include_metadata: bool) {
    trace!(
        target: "filebuf::io",
        operation = "flush",
        path = %path.display(),
        metadata = include_metadata,
        "flush {}",
        path.display()
    );
}

/// Trace a durability flush - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_flush(_path: &Path, _include_metadata: bool) {}
