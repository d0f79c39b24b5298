#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `compress` is the codec half of `filebuf`: a stateful, resumable deflate
//! compressor ([`Deflater`]) and decompressor ([`Inflater`]) that work on
//! caller-supplied input and output slices without buffering on their own.
//! Each [`transform`](Deflater::transform) call reports how many bytes it
//! consumed and produced, and the codecs keep a running Adler-32 of the
//! uncompressed data together with cumulative byte counters.
//!
//! # Design
//!
//! Compression runs on the zlib-rs implementation of the zlib C API
//! (`libz-rs-sys`), which honours the [`Strategy`], applies parameter changes
//! with `deflateParams` and takes preset dictionaries on every build.
//! Decompression runs on [`flate2`](https://docs.rs/flate2). This crate owns
//! the contract around both: the state machine (ready, active, finished),
//! dictionary timing, pending parameter changes and the translation of
//! library conditions into [`Status`] values and [`CodecError`]s.
//!
//! # Invariants
//!
//! - `consumed + remaining_input() == input.len()` after every transform.
//! - An underflow, where no progress is possible with the supplied buffers,
//!   is reported as [`Status::BufferUnderflow`] and never as an error.
//! - A finished codec rejects transforms until it is reset.
//!
//! # Features
//!
//! - `zlib-ng` (default) or `zlib-rs` select the decompressor's backend,
//!   which decompressor-side preset dictionaries require. Without either,
//!   `flate2` falls back to `miniz_oxide`.
//! - `tracing` (default) emits lifecycle events on the `filebuf::codec` target.
//! - `serde` derives serialization for [`CodecConfig`] and friends.
//!
//! # Examples
//!
//! ```
//! use compress::{Deflater, FlushMode, Inflater, Status, Strategy};
//!
//! let input = b"streaming example payload, streaming example payload";
//! let mut deflater = Deflater::new(Strategy::Default, 6, false)?;
//! let mut compressed = [0u8; 128];
//! let step = deflater.transform(FlushMode::Finish, input, &mut compressed)?;
//! assert_eq!(step.status, Status::StreamEnd);
//!
//! let mut inflater = Inflater::new(false);
//! let mut restored = [0u8; 128];
//! let back = inflater.transform(FlushMode::None, &compressed[..step.produced], &mut restored)?;
//! assert_eq!(&restored[..back.produced], input);
//! assert_eq!(inflater.checksum(), deflater.checksum());
//! # Ok::<(), compress::CodecError>(())
//! ```

mod checksum;
mod config;
mod deflater;
mod engine;
mod error;
mod inflater;
mod level;
mod outcome;
mod params;
mod trace;
pub mod zlib;

pub use config::CodecConfig;
pub use deflater::Deflater;
pub use error::{CodecError, CodecResult};
pub use inflater::Inflater;
pub use level::CompressionLevel;
pub use outcome::{Status, TransformOutcome};
pub use params::{FlushMode, Strategy};
pub use zlib::{compress_to_vec, decompress_to_vec};
