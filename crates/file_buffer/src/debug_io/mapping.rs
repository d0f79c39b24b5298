//! Mapping tracing: mapping objects, views and view flushes.

use crate::mapping::MapMode;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Trace creation of a mapping object.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_map_open(mode: MapMode, size: u64, grew_file: bool) {
    debug!(
        target: "filebuf::map",
        operation = "map_open",
        mode = mode.code(),
        size = size,
        grew_file = grew_file,
        "mapping {} bytes ({:?})",
        size,
        mode
    );
}

/// Trace creation of a mapping object - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_map_open(_mode: MapMode, _size: u64, _grew_file: bool) {}

/// Trace creation of a view into a mapping.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_map_view(mode: MapMode, offset: u64, len: u32) {
    debug!(
        target: "filebuf::map",
        operation = "map_view",
        mode = mode.code(),
        offset = offset,
        len = len,
        "view {} bytes at {} ({:?})",
        len,
        offset,
        mode
    );
}

/// Trace creation of a view - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_map_view(_mode: MapMode, _offset: u64, _len: u32) {}

/// Trace a flush of dirty view pages.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_view_flush(mode: MapMode, offset: usize, len: usize) {
    trace!(
        target: "filebuf::map",
        operation = "view_flush",
        mode = mode.code(),
        offset = offset,
        len = len,
        "flush view range {}..{}",
        offset,
        offset + len
    );
}

/// Trace a view flush - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_view_flush(_mode: MapMode, _offset: usize, _len: usize) {}
