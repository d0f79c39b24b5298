//! Strategy and flush directives with their stable numeric encodings.

use flate2::FlushDecompress;

use crate::error::{CodecError, CodecResult};

/// Compression strategy, encoded as in zlib.
///
/// Passed to the encoder unchanged; the codes are zlib's `Z_*` strategy
/// constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// General purpose matching.
    #[default]
    Default,
    /// Tuned for data produced by a filter or predictor.
    Filtered,
    /// Huffman coding only, no string matching.
    HuffmanOnly,
    /// Run-length matching only.
    Rle,
    /// Fixed Huffman codes only.
    Fixed,
}

impl Strategy {
    /// Returns the zlib code of the strategy.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Default => 0,
            Self::Filtered => 1,
            Self::HuffmanOnly => 2,
            Self::Rle => 3,
            Self::Fixed => 4,
        }
    }

    /// Looks up a strategy by its zlib code.
    pub fn from_code(code: i32) -> CodecResult<Self> {
        match code {
            0 => Ok(Self::Default),
            1 => Ok(Self::Filtered),
            2 => Ok(Self::HuffmanOnly),
            3 => Ok(Self::Rle),
            4 => Ok(Self::Fixed),
            _ => Err(CodecError::invalid_argument(format!("unknown strategy {code}"))),
        }
    }
}

/// Flush directive passed to every transform, encoded as in zlib.
///
/// The codes are handed to `deflate` as-is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FlushMode {
    /// Let the codec decide how much to buffer.
    #[default]
    None,
    /// Emit all pending output on a byte boundary.
    Sync,
    /// As [`FlushMode::Sync`], and reset the match history.
    Full,
    /// Complete the stream.
    Finish,
}

impl FlushMode {
    /// Returns the zlib code of the directive.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Sync => 2,
            Self::Full => 3,
            Self::Finish => 4,
        }
    }

    /// Looks up a directive by its zlib code.
    pub fn from_code(code: i32) -> CodecResult<Self> {
        match code {
            0 => Ok(Self::None),
            2 => Ok(Self::Sync),
            3 => Ok(Self::Full),
            4 => Ok(Self::Finish),
            _ => Err(CodecError::invalid_argument(format!("unknown flush mode {code}"))),
        }
    }
}

// Inflate has no history to reset, so a full flush is a sync flush. Finish is
// only a hint to inflate: the end of the stream is detected either way, and
// some backends switch to single-shot buffering when it is passed.
impl From<FlushMode> for FlushDecompress {
    fn from(mode: FlushMode) -> Self {
        match mode {
            FlushMode::None | FlushMode::Finish => Self::None,
            FlushMode::Sync | FlushMode::Full => Self::Sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_codes_round_trip() {
        for strategy in [
            Strategy::Default,
            Strategy::Filtered,
            Strategy::HuffmanOnly,
            Strategy::Rle,
            Strategy::Fixed,
        ] {
            assert_eq!(Strategy::from_code(strategy.code()).unwrap(), strategy);
        }
        assert!(Strategy::from_code(5).is_err());
        assert!(Strategy::from_code(-1).is_err());
    }

    #[test]
    fn flush_codes_match_zlib() {
        assert_eq!(FlushMode::None.code(), 0);
        assert_eq!(FlushMode::Sync.code(), 2);
        assert_eq!(FlushMode::Full.code(), 3);
        assert_eq!(FlushMode::Finish.code(), 4);
        assert!(matches!(
            FlushMode::from_code(1),
            Err(CodecError::InvalidArgument(_))
        ));
        assert_eq!(FlushMode::from_code(4).unwrap(), FlushMode::Finish);
    }
}
