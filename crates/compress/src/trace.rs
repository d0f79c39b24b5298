//! Codec lifecycle tracing on the `filebuf::codec` target.
//!
//! Helpers are `#[inline]` and compile to no-ops without the `tracing`
//! feature. Per-call transform events are emitted at `trace` level; lifecycle
//! events at `debug`.

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Which side of the codec an event belongs to.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Side {
    Deflate,
    Inflate,
}

impl Side {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    const fn name(self) -> &'static str {
        match self {
            Self::Deflate => "deflate",
            Self::Inflate => "inflate",
        }
    }
}

/// Trace codec construction.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_codec_init(side: Side, level: i32, raw: bool) {
    debug!(
        target: "filebuf::codec",
        operation = "init",
        side = side.name(),
        level = level,
        raw = raw,
        "{} stream created",
        side.name()
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_codec_init(_side: Side, _level: i32, _raw: bool) {}

/// Trace a preset dictionary being installed.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_dictionary(side: Side, id: u32, len: usize) {
    debug!(
        target: "filebuf::codec",
        operation = "set_dictionary",
        side = side.name(),
        dictionary_id = id,
        len = len,
        "{} dictionary {:#010x} ({} bytes)",
        side.name(),
        id,
        len
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_dictionary(_side: Side, _id: u32, _len: usize) {}

/// Trace a level or strategy change taking effect.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_params_applied(level: i32, strategy: i32, mid_stream: bool) {
    debug!(
        target: "filebuf::codec",
        operation = "set_params",
        level = level,
        strategy = strategy,
        mid_stream = mid_stream,
        "parameters applied (level {}, strategy {})",
        level,
        strategy
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_params_applied(_level: i32, _strategy: i32, _mid_stream: bool) {}

/// Trace one transform step.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_transform(side: Side, flush: i32, consumed: usize, produced: usize) {
    trace!(
        target: "filebuf::codec",
        operation = "transform",
        side = side.name(),
        flush = flush,
        consumed = consumed,
        produced = produced,
        "{} step: {} in, {} out",
        side.name(),
        consumed,
        produced
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_transform(_side: Side, _flush: i32, _consumed: usize, _produced: usize) {}

/// Trace the end of a stream being reached.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_stream_end(side: Side, total_in: u64, total_out: u64, checksum: u32) {
    debug!(
        target: "filebuf::codec",
        operation = "stream_end",
        side = side.name(),
        total_in = total_in,
        total_out = total_out,
        checksum = checksum,
        "{} finished: {} -> {} bytes",
        side.name(),
        total_in,
        total_out
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_stream_end(_side: Side, _total_in: u64, _total_out: u64, _checksum: u32) {}

/// Trace a reset back to the initial state.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_codec_reset(side: Side) {
    trace!(
        target: "filebuf::codec",
        operation = "reset",
        side = side.name(),
        "{} reset",
        side.name()
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_codec_reset(_side: Side) {}

/// Trace explicit release of a codec.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_codec_end(side: Side, total_in: u64, total_out: u64) {
    debug!(
        target: "filebuf::codec",
        operation = "end",
        side = side.name(),
        total_in = total_in,
        total_out = total_out,
        "{} released",
        side.name()
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_codec_end(_side: Side, _total_in: u64, _total_out: u64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_functions_compile() {
        trace_codec_init(Side::Deflate, 6, false);
        trace_dictionary(Side::Inflate, 0x1234_5678, 32);
        trace_params_applied(9, 0, true);
        trace_transform(Side::Deflate, 4, 1000, 22);
        trace_stream_end(Side::Inflate, 22, 1000, 1);
        trace_codec_reset(Side::Deflate);
        trace_codec_end(Side::Deflate, 1000, 22);
        assert_eq!(Side::Deflate.name(), "deflate");
    }
}
