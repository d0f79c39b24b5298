//! Positional file handles and memory-mapped regions.
//!
//! This crate provides the storage half of `filebuf`: owned OS file handles
//! addressed by absolute 64-bit positions, mapping objects and views over
//! them, and the [`FileBuffer`] contract that file-backed and mapped buffers
//! share.
//!
//! # Layers
//!
//! - [`PositionalFile`] owns one open file and performs cursor-free reads and
//!   writes, single-byte access, size queries, shrink-only truncation,
//!   durability flushes and error-reporting close.
//! - [`FileMapping`] and [`MappedView`] expose a byte range of a file as
//!   process memory in read-only, read-write or copy-on-write mode.
//! - [`SystemFileBuffer`] and [`MappedFileBuffer`] implement [`FileBuffer`] on
//!   top of the two, adding close tracking and a logical size.
//!
//! # Errors
//!
//! Every fallible operation returns [`FileBufferError`]. Native error codes
//! are translated once, by [`translate_io_error`]: stale handles become
//! [`FileBufferError::HandleClosed`], everything else keeps its code and
//! description in [`FileBufferError::Io`].
//!
//! # Tracing
//!
//! With the `tracing` feature (enabled by default) handle and mapping events
//! are emitted on the `filebuf::io` and `filebuf::map` targets.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

mod buffer;
mod debug_io;
mod error;
mod handle;
mod mapped_buffer;
mod mapping;
mod sys;
mod system_buffer;

pub use buffer::FileBuffer;
pub use error::{FileBufferError, FileBufferResult, translate_io_error};
pub use handle::{AccessMode, MAX_POSITION, PositionalFile};
pub use mapped_buffer::MappedFileBuffer;
pub use mapping::{FileMapping, MapMode, MappedView, allocation_granularity};
pub use system_buffer::SystemFileBuffer;
