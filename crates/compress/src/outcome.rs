//! Result of a single transform step.

/// How a transform step ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// Input was consumed or output produced; call again as needed.
    Progress,
    /// No progress was possible with the supplied buffers.
    ///
    /// Supply more input or more output space and retry.
    BufferUnderflow,
    /// The end of the stream was produced or reached.
    StreamEnd,
    /// The stream requires the preset dictionary with this Adler-32 id.
    NeedsDictionary(u32),
    /// A pending parameter change took effect; no input was consumed.
    ParamsApplied,
}

/// Counters reported by one call to `transform`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransformOutcome {
    /// Bytes taken from the input slice.
    pub consumed: usize,
    /// Bytes written to the output slice.
    pub produced: usize,
    /// Why the step ended.
    pub status: Status,
}

impl TransformOutcome {
    pub(crate) const fn new(consumed: usize, produced: usize, status: Status) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }

    /// Outcome of a step that made no progress.
    pub(crate) const fn underflow() -> Self {
        Self::new(0, 0, Status::BufferUnderflow)
    }

    /// Outcome of a data step that did not end the stream.
    pub(crate) const fn progress(consumed: usize, produced: usize) -> Self {
        if consumed == 0 && produced == 0 {
            Self::underflow()
        } else {
            Self::new(consumed, produced, Status::Progress)
        }
    }

    /// Returns `true` when the step ended the stream.
    #[must_use]
    pub const fn is_stream_end(&self) -> bool {
        matches!(self.status, Status::StreamEnd)
    }
}
