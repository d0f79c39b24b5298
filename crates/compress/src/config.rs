//! Codec configuration presets.

use crate::deflater::Deflater;
use crate::error::CodecResult;
use crate::inflater::Inflater;
use crate::level::CompressionLevel;
use crate::params::Strategy;

/// Settings shared by a compressor and its matching decompressor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Compression level.
    pub level: CompressionLevel,
    /// Compression strategy.
    pub strategy: Strategy,
    /// Headerless deflate instead of zlib framing.
    pub raw: bool,
}

impl CodecConfig {
    /// Creates a config favouring speed.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            level: CompressionLevel::Fast,
            ..Self::default()
        }
    }

    /// Creates a config favouring compression ratio.
    #[must_use]
    pub fn best() -> Self {
        Self {
            level: CompressionLevel::Best,
            ..Self::default()
        }
    }

    /// Returns the config with raw deflate framing switched on or off.
    #[must_use]
    pub const fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Returns the config with a different strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds a compressor from this config.
    ///
    /// # Errors
    ///
    /// Propagates the initialisation errors of [`Deflater::with_level`].
    pub fn build_deflater(&self) -> CodecResult<Deflater> {
        Deflater::with_level(self.level, self.strategy, self.raw)
    }

    /// Builds the decompressor matching this config's framing.
    #[must_use]
    pub fn build_inflater(&self) -> Inflater {
        Inflater::new(self.raw)
    }
}
