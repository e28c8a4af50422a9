//! Kosinski decompression
//!
//! Kosinski is an LZ77-style format: a literal/copy command stream steered by
//! 16-bit little-endian descriptor words, with back-references into the last
//! 8KB of output. Two entry points share one decoder:
//!
//! - [`decompress_into`] writes into a caller-provided buffer and never writes
//!   past its end, reporting `(success, bytes written)` in a [`BoundedOutcome`].
//! - [`decompress`] grows its own buffer up to a configurable ceiling and
//!   returns a `Result`.

mod bits;
mod decoder;
mod sink;

use crate::source::ByteSource;
use crate::{GenesisError, Result, DEFAULT_MAX_OUTPUT};
use sink::{OutputSink, SliceSink, VecSink};

/// Window reachable by the full (two-byte) copy form
pub const FULL_WINDOW: usize = 0x2000;

/// Window reachable by the inline (one-byte) copy form
pub const INLINE_WINDOW: usize = 0x100;

/// Largest up-front allocation for a growable decode
const INITIAL_CAPACITY_CAP: usize = 0x10000;

/// Result of decoding into a fixed-size buffer
#[derive(Debug)]
pub struct BoundedOutcome {
    /// Whether the end marker was reached without error
    pub success: bool,
    /// Bytes written to the caller's buffer
    pub written: usize,
    /// Compressed bytes consumed from the source
    pub consumed: usize,
    /// Why decoding stopped early, if it did
    pub error: Option<GenesisError>,
}

/// Decompress into `out`, stopping at its end
///
/// On failure `out[..written]` holds everything decoded before the error; an
/// overflowing stream stops exactly at `out.len()` and reports
/// [`GenesisError::OutputLimitExceeded`].
pub fn decompress_into(src: &mut ByteSource<'_>, out: &mut [u8]) -> BoundedOutcome {
    let start = src.consumed();
    let mut sink = SliceSink::new(out);
    let result = decoder::expand(src, &mut sink);
    let written = sink.len();
    let consumed = src.consumed() - start;

    match result {
        Ok(()) => BoundedOutcome {
            success: true,
            written,
            consumed,
            error: None,
        },
        Err(e) => {
            log::debug!("kosinski: bounded decode stopped after {} bytes: {}", written, e);
            BoundedOutcome {
                success: false,
                written,
                consumed,
                error: Some(e),
            }
        }
    }
}

/// Decompress from a byte source into a new buffer of at most `limit` bytes
pub fn decompress_from(src: &mut ByteSource<'_>, limit: usize) -> Result<Vec<u8>> {
    let hint = src
        .remaining()
        .saturating_mul(2)
        .min(INITIAL_CAPACITY_CAP);
    let mut sink = VecSink::new(limit, hint);
    decoder::expand(src, &mut sink)?;
    Ok(sink.into_inner())
}

/// Decompress a Kosinski stream with a custom output ceiling
pub fn decompress_with_limit(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    decompress_from(&mut ByteSource::new(data), limit)
}

/// Decompress a Kosinski stream held in memory
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_limit(data, DEFAULT_MAX_OUTPUT)
}
