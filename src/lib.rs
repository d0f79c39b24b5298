#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `filebuf` bundles the storage and codec primitives used by buffered file
//! I/O: positional file handles, memory-mapped regions and a resumable
//! deflate/inflate codec.
//!
//! The member crates are re-exported whole ([`file_buffer`], [`compress`],
//! [`logging`]) and their main types are lifted to the crate root. [`Error`]
//! unifies the two error enums so callers mixing storage and codec work can
//! use a single `?`.
//!
//! # Examples
//!
//! ```no_run
//! use filebuf::{CodecConfig, FileBuffer, SystemFileBuffer, compress_to_vec};
//!
//! let buffer = SystemFileBuffer::open("payload.z", false)?;
//! let compressed = compress_to_vec(b"hello hello hello", &CodecConfig::best())?;
//! buffer.write(0, &compressed)?;
//! buffer.close()?;
//! # Ok::<(), filebuf::Error>(())
//! ```

mod error;

pub use compress;
pub use file_buffer;
pub use logging;

pub use compress::{
    CodecConfig, CodecError, CompressionLevel, Deflater, FlushMode, Inflater, Status, Strategy,
    TransformOutcome, compress_to_vec, decompress_to_vec,
};
pub use error::{Error, ErrorKind, Result};
pub use file_buffer::{
    FileBuffer, FileBufferError, FileMapping, MapMode, MappedFileBuffer, MappedView,
    PositionalFile, SystemFileBuffer,
};
pub use logging::{LogConfig, LogLevel};
