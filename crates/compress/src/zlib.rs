//! One-shot helpers that drive the streaming codec to completion.
//!
//! ```
//! use compress::{CodecConfig, compress_to_vec, decompress_to_vec};
//!
//! let config = CodecConfig::best();
//! let data = b"highly compressible payload, highly compressible payload";
//! let compressed = compress_to_vec(data, &config)?;
//! assert_eq!(decompress_to_vec(&compressed, &config)?, data);
//! # Ok::<(), compress::CodecError>(())
//! ```

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::outcome::Status;
use crate::params::FlushMode;

/// Scratch buffer size for one transform step (32 KiB).
const CHUNK_SIZE: usize = 32 * 1024;

fn scratch() -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(CHUNK_SIZE)
        .map_err(|_| CodecError::OutOfMemory)?;
    buffer.resize(CHUNK_SIZE, 0);
    Ok(buffer)
}

fn append(target: &mut Vec<u8>, bytes: &[u8]) -> CodecResult<()> {
    target
        .try_reserve(bytes.len())
        .map_err(|_| CodecError::OutOfMemory)?;
    target.extend_from_slice(bytes);
    Ok(())
}

/// Compresses `input` into a new [`Vec`].
pub fn compress_to_vec(input: &[u8], config: &CodecConfig) -> CodecResult<Vec<u8>> {
    let mut deflater = config.build_deflater()?;
    let mut chunk = scratch()?;
    let mut compressed = Vec::new();
    let mut rest = input;

    loop {
        let outcome = deflater.transform(FlushMode::Finish, rest, &mut chunk)?;
        rest = &rest[outcome.consumed..];
        append(&mut compressed, &chunk[..outcome.produced])?;
        match outcome.status {
            Status::StreamEnd => break,
            Status::BufferUnderflow => {
                return Err(CodecError::Internal("compressor made no progress".into()));
            }
            _ => {}
        }
    }
    deflater.end();
    Ok(compressed)
}

/// Decompresses a complete stream into a new [`Vec`].
///
/// Bytes after the end of the stream are ignored.
///
/// # Errors
///
/// Fails with [`CodecError::InvalidArgument`] when the stream requires a
/// preset dictionary and with [`CodecError::Internal`] when it is corrupt or
/// truncated.
pub fn decompress_to_vec(input: &[u8], config: &CodecConfig) -> CodecResult<Vec<u8>> {
    let mut inflater = config.build_inflater();
    let mut chunk = scratch()?;
    let mut output = Vec::new();
    let mut rest = input;

    loop {
        let outcome = inflater.transform(FlushMode::None, rest, &mut chunk)?;
        rest = &rest[outcome.consumed..];
        append(&mut output, &chunk[..outcome.produced])?;
        match outcome.status {
            Status::StreamEnd => break,
            Status::NeedsDictionary(id) => {
                return Err(CodecError::InvalidArgument(format!(
                    "stream requires preset dictionary {id:#010x}"
                )));
            }
            Status::BufferUnderflow => {
                return Err(CodecError::Internal("truncated deflate stream".into()));
            }
            Status::Progress | Status::ParamsApplied => {}
        }
    }
    inflater.end();
    Ok(output)
}
