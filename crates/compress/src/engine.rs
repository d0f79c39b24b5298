//! Owned zlib deflate stream driven through the `libz-rs-sys` C API.
//!
//! `flate2` exposes neither the deflate strategy nor `deflateParams`, so the
//! compressor talks to the zlib-rs implementation directly. Everything
//! unsafe about the stream is confined to this module: the `z_stream` is
//! boxed so its address stays fixed for the lifetime of the internal state,
//! and the input and output pointers are only set for the duration of a
//! single call.

#![allow(unsafe_code)]

use std::ffi::{CStr, c_int};
use std::mem;

use libz_rs_sys::{
    deflate, deflateEnd, deflateInit2_, deflateParams, deflateReset, deflateSetDictionary,
    z_stream, zlibVersion,
};

use crate::error::{CodecError, CodecResult};
use crate::params::{FlushMode, Strategy};

const Z_OK: c_int = 0;
const Z_STREAM_END: c_int = 1;
const Z_STREAM_ERROR: c_int = -2;
const Z_DATA_ERROR: c_int = -3;
const Z_MEM_ERROR: c_int = -4;
const Z_BUF_ERROR: c_int = -5;
const Z_VERSION_ERROR: c_int = -6;

const Z_DEFLATED: c_int = 8;
const MAX_WBITS: c_int = 15;
const DEF_MEM_LEVEL: c_int = 8;

/// Result of one `deflate` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Step {
    pub(crate) consumed: usize,
    pub(crate) produced: usize,
    pub(crate) stream_end: bool,
}

/// Result of one `deflateParams` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ParamsStep {
    pub(crate) produced: usize,
    pub(crate) applied: bool,
}

/// A live deflate stream in zlib (`raw == false`) or raw framing.
pub(crate) struct DeflateEngine {
    stream: Box<z_stream>,
}

// SAFETY: the stream is exclusively owned, every call takes `&mut self`, and
// no pointer into caller memory outlives the call that installed it.
unsafe impl Send for DeflateEngine {}

impl DeflateEngine {
    /// Initialises a stream with a 32 KiB window and the default memory level.
    pub(crate) fn new(level: i32, strategy: Strategy, raw: bool) -> CodecResult<Self> {
        // SAFETY: an all-zero `z_stream` is the documented initial state: null
        // buffers, no allocator (zlib-rs falls back to its own), no state.
        let mut stream: Box<z_stream> = Box::new(unsafe { mem::zeroed() });
        let window_bits = if raw { -MAX_WBITS } else { MAX_WBITS };
        // SAFETY: `stream` points at a zeroed, heap-pinned `z_stream` and the
        // version string and struct size describe the linked library.
        let code = unsafe {
            deflateInit2_(
                &mut *stream,
                level,
                Z_DEFLATED,
                window_bits,
                DEF_MEM_LEVEL,
                strategy.code(),
                zlibVersion(),
                mem::size_of::<z_stream>() as c_int,
            )
        };
        if code != Z_OK {
            // Nothing was allocated when initialisation fails.
            return Err(error_for(code, "deflateInit2", message(&stream)));
        }
        Ok(Self { stream })
    }

    /// Installs a preset dictionary; valid before the first `deflate` call.
    pub(crate) fn set_dictionary(&mut self, dictionary: &[u8]) -> CodecResult<()> {
        let length = u32::try_from(dictionary.len())
            .map_err(|_| CodecError::invalid_argument("dictionary longer than 4 GiB"))?;
        // SAFETY: the stream is initialised and `dictionary` is valid for
        // `length` bytes for the duration of the call; zlib copies it.
        let code = unsafe { deflateSetDictionary(&mut *self.stream, dictionary.as_ptr(), length) };
        self.check(code, "deflateSetDictionary")
    }

    /// Compresses from `input` into `output` under `flush`.
    pub(crate) fn deflate(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> CodecResult<Step> {
        let (consumed, produced, code) = self.with_buffers(input, output, |stream| {
            // SAFETY: the stream is initialised and its buffers were just set
            // to live slices.
            unsafe { deflate(stream, flush.code()) }
        });
        match code {
            Z_OK | Z_BUF_ERROR | Z_STREAM_END => Ok(Step {
                consumed,
                produced,
                stream_end: code == Z_STREAM_END,
            }),
            _ => Err(CodecError::Internal(format!(
                "deflate failed ({code}): {}",
                message(&self.stream)
            ))),
        }
    }

    /// Changes level and strategy, flushing buffered input into `output`
    /// when the change alters the compression function.
    ///
    /// `applied` is `false` when `output` was too small to take the flush;
    /// call again with more space.
    pub(crate) fn params(
        &mut self,
        level: i32,
        strategy: Strategy,
        output: &mut [u8],
    ) -> CodecResult<ParamsStep> {
        let (_, produced, code) = self.with_buffers(&[], output, |stream| {
            // SAFETY: as for `deflate`; no input is supplied.
            unsafe { deflateParams(stream, level, strategy.code()) }
        });
        match code {
            Z_OK => Ok(ParamsStep {
                produced,
                applied: true,
            }),
            Z_BUF_ERROR => Ok(ParamsStep {
                produced,
                applied: false,
            }),
            _ => Err(error_for(code, "deflateParams", message(&self.stream))),
        }
    }

    /// Returns the stream to its initial state, keeping level and strategy.
    pub(crate) fn reset(&mut self) -> CodecResult<()> {
        // SAFETY: the stream is initialised.
        let code = unsafe { deflateReset(&mut *self.stream) };
        self.check(code, "deflateReset")
    }

    fn with_buffers(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        call: impl FnOnce(&mut z_stream) -> c_int,
    ) -> (usize, usize, c_int) {
        let avail_in = u32::try_from(input.len()).unwrap_or(u32::MAX);
        let avail_out = u32::try_from(output.len()).unwrap_or(u32::MAX);
        let stream = &mut *self.stream;
        stream.next_in = input.as_ptr().cast_mut();
        stream.avail_in = avail_in;
        stream.next_out = output.as_mut_ptr();
        stream.avail_out = avail_out;

        let code = call(stream);

        let consumed = (avail_in - stream.avail_in) as usize;
        let produced = (avail_out - stream.avail_out) as usize;
        stream.next_in = std::ptr::null_mut::<u8>();
        stream.avail_in = 0;
        stream.next_out = std::ptr::null_mut::<u8>();
        stream.avail_out = 0;
        (consumed, produced, code)
    }

    fn check(&self, code: c_int, operation: &str) -> CodecResult<()> {
        if code == Z_OK {
            Ok(())
        } else {
            Err(error_for(code, operation, message(&self.stream)))
        }
    }
}

impl Drop for DeflateEngine {
    fn drop(&mut self) {
        // SAFETY: the stream was initialised by `deflateInit2_` and is ended
        // exactly once. The result only reports discarded pending output.
        unsafe {
            deflateEnd(&mut *self.stream);
        }
    }
}

impl std::fmt::Debug for DeflateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeflateEngine")
            .field("total_in", &u64::from(self.stream.total_in))
            .field("total_out", &u64::from(self.stream.total_out))
            .finish_non_exhaustive()
    }
}

/// Maps a zlib return code to the codec taxonomy.
fn error_for(code: c_int, operation: &str, detail: String) -> CodecError {
    match code {
        Z_MEM_ERROR => CodecError::OutOfMemory,
        Z_STREAM_ERROR => CodecError::InvalidArgument(format!("{operation} rejected its parameters")),
        Z_DATA_ERROR | Z_VERSION_ERROR => CodecError::Internal(format!("{operation}: {detail}")),
        _ => CodecError::Internal(format!("{operation} failed ({code}): {detail}")),
    }
}

/// The stream's diagnostic text, if it set one.
fn message(stream: &z_stream) -> String {
    if stream.msg.is_null() {
        return String::from("no diagnostic");
    }
    // SAFETY: a non-null `msg` points at a static NUL-terminated string.
    unsafe { CStr::from_ptr(stream.msg) }
        .to_string_lossy()
        .into_owned()
}
