//! Resumable deflate decompressor over caller-supplied buffers.

use adler2::Adler32;
use flate2::{Decompress, Status as FlateStatus};

use crate::error::{CodecError, CodecResult};
use crate::checksum::dictionary_id;
use crate::outcome::{Status, TransformOutcome};
use crate::params::FlushMode;
use crate::trace::{self, Side};

/// Streaming decompressor.
///
/// Wrapped streams are parsed and verified by the backend, including the
/// Adler-32 trailer. When a wrapped stream announces a preset dictionary the
/// transform reports [`Status::NeedsDictionary`] with the expected id; supply
/// it through [`set_dictionary`](Inflater::set_dictionary) and call again.
#[derive(Debug)]
pub struct Inflater {
    stream: Decompress,
    raw: bool,
    started: bool,
    finished: bool,
    awaiting_dictionary: Option<u32>,
    input_offset: usize,
    input_remaining: usize,
    adler: Adler32,
    total_in: u64,
    total_out: u64,
}

impl Inflater {
    /// Creates a decompressor for raw (`raw = true`) or zlib-wrapped input.
    #[must_use]
    pub fn new(raw: bool) -> Self {
        trace::trace_codec_init(Side::Inflate, 0, raw);
        Self {
            stream: Decompress::new(!raw),
            raw,
            started: false,
            finished: false,
            awaiting_dictionary: None,
            input_offset: 0,
            input_remaining: 0,
            adler: Adler32::new(),
            total_in: 0,
            total_out: 0,
        }
    }

    /// Supplies a preset dictionary and returns its id.
    ///
    /// Wrapped streams accept a dictionary only after the transform reported
    /// [`Status::NeedsDictionary`]; raw streams only before the first
    /// transform.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] at any other time or when the
    /// build has no zlib-class backend, and [`CodecError::Internal`] when the
    /// backend rejects the dictionary, for instance because its id does not
    /// match the one the stream announced.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> CodecResult<u32> {
        let accepted = if self.raw {
            !self.started
        } else {
            self.awaiting_dictionary.is_some()
        };
        if !accepted {
            return Err(CodecError::invalid_argument(if self.raw {
                "a raw stream takes its dictionary before the first transform"
            } else {
                "the stream has not asked for a dictionary"
            }));
        }

        install_dictionary(&mut self.stream, dictionary)?;
        self.awaiting_dictionary = None;
        let id = dictionary_id(dictionary);
        trace::trace_dictionary(Side::Inflate, id, dictionary.len());
        Ok(id)
    }

    /// Runs one decompression step.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] after the stream has finished
    /// and [`CodecError::Internal`] for corrupt input.
    pub fn transform(
        &mut self,
        flush: FlushMode,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecResult<TransformOutcome> {
        if self.finished {
            return Err(CodecError::invalid_argument(
                "stream already finished; reset before reusing the decompressor",
            ));
        }
        self.started = true;

        let before_in = self.stream.total_in();
        let before_out = self.stream.total_out();
        let result = self.stream.decompress(input, output, flush.into());
        let consumed = (self.stream.total_in() - before_in) as usize;
        let produced = (self.stream.total_out() - before_out) as usize;

        let outcome = match result {
            Ok(FlateStatus::StreamEnd) => {
                self.finished = true;
                TransformOutcome::new(consumed, produced, Status::StreamEnd)
            }
            Ok(FlateStatus::Ok | FlateStatus::BufError) => TransformOutcome::progress(consumed, produced),
            Err(error) => match error.needs_dictionary() {
                Some(id) => {
                    self.awaiting_dictionary = Some(id);
                    TransformOutcome::new(consumed, produced, Status::NeedsDictionary(id))
                }
                None => return Err(CodecError::internal(error)),
            },
        };

        self.adler.write_slice(&output[..produced]);
        self.input_offset = consumed;
        self.input_remaining = input.len() - consumed;
        self.total_in += consumed as u64;
        self.total_out += produced as u64;
        trace::trace_transform(Side::Inflate, flush.code(), consumed, produced);
        if self.finished {
            trace::trace_stream_end(Side::Inflate, self.total_in, self.total_out, self.checksum());
        }
        Ok(outcome)
    }

    /// Returns `true` once the end of the stream has been reached.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Id of the dictionary the stream is waiting for, if any.
    #[must_use]
    pub fn needs_dictionary(&self) -> Option<u32> {
        self.awaiting_dictionary
    }

    /// Adler-32 of all output produced so far.
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

    /// Returns `true` for headerless deflate input.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Returns to the ready state for a new stream of the same framing.
    pub fn reset(&mut self) {
        self.stream.reset(!self.raw);
        self.started = false;
        self.finished = false;
        self.awaiting_dictionary = None;
        self.input_offset = 0;
        self.input_remaining = 0;
        self.adler = Adler32::new();
        self.total_in = 0;
        self.total_out = 0;
        trace::trace_codec_reset(Side::Inflate);
    }

    /// Releases the decompressor.
    pub fn end(self) {
        trace::trace_codec_end(Side::Inflate, self.total_in, self.total_out);
    }
}

#[cfg(any(feature = "zlib-ng", feature = "zlib-rs"))]
fn install_dictionary(stream: &mut Decompress, dictionary: &[u8]) -> CodecResult<()> {
    stream
        .set_dictionary(dictionary)
        .map(|_| ())
        .map_err(CodecError::internal)
}

#[cfg(not(any(feature = "zlib-ng", feature = "zlib-rs")))]
fn install_dictionary(_stream: &mut Decompress, _dictionary: &[u8]) -> CodecResult<()> {
    Err(CodecError::invalid_argument(
        "preset dictionaries need the zlib-ng or zlib-rs backend",
    ))
}
