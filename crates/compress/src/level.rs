//! Compression levels.

use std::num::NonZeroU8;

use flate2::Compression;

use crate::error::{CodecError, CodecResult};

/// Compression levels recognised by the compressor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionLevel {
    /// Emit stored blocks only (level 0).
    None,
    /// Favour speed over compression ratio.
    Fast,
    /// Use zlib's default balance between speed and ratio.
    #[default]
    Default,
    /// Favour the best possible compression ratio.
    Best,
    /// Use an explicit zlib compression level in the range `1..=9`.
    Precise(NonZeroU8),
}

impl CompressionLevel {
    /// Numeric value callers use for [`CompressionLevel::Default`].
    pub const DEFAULT_NUMERIC: i32 = -1;

    /// Creates a level from its zlib numeric encoding.
    ///
    /// Accepts `-1` (default) and `0..=9`; anything else is rejected with
    /// [`CodecError::InvalidArgument`].
    pub fn from_numeric(level: i32) -> CodecResult<Self> {
        match level {
            Self::DEFAULT_NUMERIC => Ok(Self::Default),
            0 => Ok(Self::None),
            1..=9 => NonZeroU8::new(level as u8)
                .map(Self::Precise)
                .ok_or_else(|| CodecError::invalid_argument("level must be non-zero")),
            _ => Err(CodecError::invalid_argument(format!(
                "compression level {level} is outside the supported range -1..=9"
            ))),
        }
    }

    /// Constructs a [`CompressionLevel::Precise`] variant from the provided zlib level.
    #[must_use]
    pub const fn precise(level: NonZeroU8) -> Self {
        Self::Precise(level)
    }

    /// Returns the zlib numeric encoding, `-1` for the default level.
    #[must_use]
    pub const fn numeric(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Fast => 1,
            Self::Default => Self::DEFAULT_NUMERIC,
            Self::Best => 9,
            Self::Precise(level) => level.get() as i32,
        }
    }

    /// Returns the level the compressor actually runs at (`0..=9`).
    #[must_use]
    pub const fn effective(self) -> u32 {
        match self {
            Self::Default => 6,
            other => other.numeric() as u32,
        }
    }
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::None => Self::none(),
            CompressionLevel::Fast => Self::fast(),
            CompressionLevel::Default => Self::default(),
            CompressionLevel::Best => Self::best(),
            CompressionLevel::Precise(value) => Self::new(u32::from(value.get())),
        }
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = CodecError;

    fn try_from(level: i32) -> CodecResult<Self> {
        Self::from_numeric(level)
    }
}
