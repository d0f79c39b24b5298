//! Resumable deflate compressor over caller-supplied buffers.
//!
//! # State machine
//!
//! A [`Deflater`] starts ready, becomes active on the first
//! [`transform`](Deflater::transform) and is finished once the end of the
//! stream has been written. A finished compressor rejects further transforms
//! until [`reset`](Deflater::reset); [`end`](Deflater::end) releases it.
//!
//! # Parameter changes
//!
//! [`set_params`](Deflater::set_params) only records a change. The next
//! transform applies it instead of compressing. Before any data the change is
//! immediate. Mid-stream, a change of compression function first flushes the
//! buffered input as a deflate block into the output; when the output is too
//! small for that, the change stays pending and the call reports the bytes
//! it did write.

use adler2::Adler32;

use crate::checksum::dictionary_id;
use crate::engine::DeflateEngine;
use crate::error::{CodecError, CodecResult};
use crate::level::CompressionLevel;
use crate::outcome::{Status, TransformOutcome};
use crate::params::{FlushMode, Strategy};
use crate::trace::{self, Side};

/// Streaming compressor.
///
/// # Example
///
/// ```
/// use compress::{Deflater, FlushMode, Status, Strategy};
///
/// let mut deflater = Deflater::new(Strategy::Default, 6, false)?;
/// let input = b"abcabcabcabcabcabcabcabcabcabc";
/// let mut output = [0u8; 64];
/// let outcome = deflater.transform(FlushMode::Finish, input, &mut output)?;
/// assert_eq!(outcome.consumed, input.len());
/// assert_eq!(outcome.status, Status::StreamEnd);
/// assert!(deflater.finished());
/// # Ok::<(), compress::CodecError>(())
/// ```
#[derive(Debug)]
pub struct Deflater {
    engine: DeflateEngine,
    level: CompressionLevel,
    strategy: Strategy,
    raw: bool,
    pending: Option<(Strategy, CompressionLevel)>,
    dictionary_id: Option<u32>,
    started: bool,
    finished: bool,
    input_offset: usize,
    input_remaining: usize,
    adler: Adler32,
    total_in: u64,
    total_out: u64,
}

impl Deflater {
    /// Creates a compressor from a zlib numeric level (`-1..=9`).
    ///
    /// `raw` selects headerless deflate; otherwise the stream is zlib-wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] when `level` is out of range,
    /// and the errors of [`with_level`](Self::with_level).
    pub fn new(strategy: Strategy, level: i32, raw: bool) -> CodecResult<Self> {
        let level = CompressionLevel::from_numeric(level)?;
        Self::with_level(level, strategy, raw)
    }

    /// Creates a compressor from an already validated level.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfMemory`] when the stream state cannot be
    /// allocated, [`CodecError::InvalidArgument`] when the library rejects
    /// the parameter combination and [`CodecError::Internal`] otherwise.
    pub fn with_level(level: CompressionLevel, strategy: Strategy, raw: bool) -> CodecResult<Self> {
        let engine = DeflateEngine::new(level.numeric(), strategy, raw)?;
        trace::trace_codec_init(Side::Deflate, level.numeric(), raw);
        Ok(Self {
            engine,
            level,
            strategy,
            raw,
            pending: None,
            dictionary_id: None,
            started: false,
            finished: false,
            input_offset: 0,
            input_remaining: 0,
            adler: Adler32::new(),
            total_in: 0,
            total_out: 0,
        })
    }

    /// Primes the compressor with a preset dictionary and returns its id.
    ///
    /// Only valid before the first transform. Wrapped streams announce the
    /// id in their header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] once compression has started
    /// and the library's error when it rejects the dictionary.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> CodecResult<u32> {
        if self.started || self.finished {
            return Err(CodecError::invalid_argument(
                "a dictionary can only be set before the first transform",
            ));
        }
        self.engine.set_dictionary(dictionary)?;
        let id = dictionary_id(dictionary);
        self.dictionary_id = Some(id);
        trace::trace_dictionary(Side::Deflate, id, dictionary.len());
        Ok(id)
    }

    /// Records a strategy and level change for the next transform.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] when `level` is out of range;
    /// the pending state is left untouched in that case.
    pub fn set_params(&mut self, strategy: Strategy, level: i32) -> CodecResult<()> {
        let level = CompressionLevel::from_numeric(level)?;
        self.pending = Some((strategy, level));
        Ok(())
    }

    /// Returns `true` while a parameter change awaits the next transform.
    #[must_use]
    pub fn params_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs one compression step.
    ///
    /// Compresses from `input` into `output` under `flush`, or applies a
    /// pending parameter change instead (reported as
    /// [`Status::ParamsApplied`], with nothing consumed). A step that can make
    /// no progress reports [`Status::BufferUnderflow`] rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] after the stream has finished
    /// and [`CodecError::Internal`] when the library fails.
    pub fn transform(
        &mut self,
        flush: FlushMode,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecResult<TransformOutcome> {
        if self.finished {
            return Err(CodecError::invalid_argument(
                "stream already finished; reset before reusing the compressor",
            ));
        }

        let outcome = match self.pending {
            Some(params) => self.apply_params(params, output)?,
            None => self.deflate(flush, input, output)?,
        };

        self.input_offset = outcome.consumed;
        self.input_remaining = input.len() - outcome.consumed;
        self.total_in += outcome.consumed as u64;
        self.total_out += outcome.produced as u64;
        trace::trace_transform(Side::Deflate, flush.code(), outcome.consumed, outcome.produced);
        if self.finished {
            trace::trace_stream_end(Side::Deflate, self.total_in, self.total_out, self.checksum());
        }
        Ok(outcome)
    }

    fn deflate(
        &mut self,
        flush: FlushMode,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecResult<TransformOutcome> {
        self.started = true;
        let step = self.engine.deflate(input, output, flush)?;
        self.adler.write_slice(&input[..step.consumed]);
        if step.stream_end {
            self.finished = true;
            return Ok(TransformOutcome::new(step.consumed, step.produced, Status::StreamEnd));
        }
        Ok(TransformOutcome::progress(step.consumed, step.produced))
    }

    fn apply_params(
        &mut self,
        (strategy, level): (Strategy, CompressionLevel),
        output: &mut [u8],
    ) -> CodecResult<TransformOutcome> {
        let step = self.engine.params(level.numeric(), strategy, output)?;
        if !step.applied {
            return Ok(TransformOutcome::progress(0, step.produced));
        }

        self.level = level;
        self.strategy = strategy;
        self.pending = None;
        trace::trace_params_applied(level.numeric(), strategy.code(), self.started);
        Ok(TransformOutcome::new(0, step.produced, Status::ParamsApplied))
    }

    /// Returns `true` once the end of the stream has been written.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Adler-32 of all input consumed so far.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.adler.checksum()
    }

    /// Total bytes consumed since creation or the last reset.
    #[must_use]
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total bytes produced since creation or the last reset.
    #[must_use]
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Offset into the last input slice where consumption stopped.
    #[must_use]
    pub fn input_offset(&self) -> usize {
        self.input_offset
    }

    /// Bytes of the last input slice left unconsumed.
    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input_remaining
    }

    /// Current compression level.
    #[must_use]
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Current strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns `true` for headerless deflate output.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Id of the preset dictionary, if one was set.
    #[must_use]
    pub fn dictionary_id(&self) -> Option<u32> {
        self.dictionary_id
    }

    /// Returns to the ready state, keeping level, strategy and any pending
    /// parameter change. The preset dictionary is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Internal`] when the library cannot reset the
    /// stream.
    pub fn reset(&mut self) -> CodecResult<()> {
        self.engine.reset()?;
        self.dictionary_id = None;
        self.started = false;
        self.finished = false;
        self.input_offset = 0;
        self.input_remaining = 0;
        self.adler = Adler32::new();
        self.total_in = 0;
        self.total_out = 0;
        trace::trace_codec_reset(Side::Deflate);
        Ok(())
    }

    /// Releases the compressor.
    pub fn end(self) {
        trace::trace_codec_end(Side::Deflate, self.total_in, self.total_out);
    }
}
