//! genesis-decomp - Rust decoders for Sega Genesis / Mega Drive compression formats
//!
//! This crate decodes the compression formats used by Sonic the Hedgehog era
//! Genesis games to store graphics, mappings and sound in ROM. Every decoder is
//! a pure function over in-memory bytes; decoding never panics, whatever the
//! input.
//!
//! # Formats
//!
//! - **Kosinski** - LZ77-style, 8KB window; bounded-buffer and growable variants
//! - **Nemesis** - prefix-coded nibble runs for 8x8 tile patterns
//! - **Saxman** - LZSS over a 4KB ring window, used for sound driver data
//! - **Enigma** - bit-packed run-length coding of plane mapping words
//! - **DCM** - 4-bit delta PCM samples
//!
//! # Example
//!
//! ```no_run
//! use genesis_decomp::{decompress_at, DecodeOptions, DecodeReader, Format};
//! use std::io::Read;
//!
//! let rom = std::fs::read("sonic2.bin")?;
//!
//! // Decode a Nemesis art block found at a known ROM offset
//! let art = decompress_at(Format::Nemesis, &rom, 0x7_2000, &DecodeOptions::default())?;
//!
//! // Or use the streaming API
//! let mut reader = DecodeReader::new(std::fs::File::open("level.kos")?, Format::Kosinski);
//! let mut output = Vec::new();
//! reader.read_to_end(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod dcm;
pub mod enigma;
pub mod error;
pub mod kosinski;
pub mod nemesis;
pub mod reader;
pub mod saxman;
pub mod source;

mod bits;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use common::{
    DecodeJob, DecodeOptions, DecompressionStats, Format, GenesisError, Result,
    DEFAULT_MAX_OUTPUT, TILE_SIZE,
};
pub use kosinski::BoundedOutcome;
pub use reader::DecodeReader;
pub use source::ByteSource;

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchDecoder;
#[cfg(feature = "async")]
pub use async_convenience::*;

/// Decode one stream of `format` from a byte source
///
/// The source is left positioned after the last byte the stream used.
pub fn decompress_from(
    format: Format,
    src: &mut ByteSource<'_>,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    match format {
        Format::Kosinski => kosinski::decompress_from(src, options.max_output),
        Format::Nemesis => nemesis::decompress_from(src),
        Format::Saxman => Ok(saxman::decompress_from(src)),
        Format::Enigma => enigma::decompress_from(src, options),
        Format::Dcm => Ok(dcm::decompress_from(src)),
    }
}

/// Decompress data held in memory
///
/// # Arguments
/// * `format` - The compression format of `data`
/// * `data` - The compressed data
/// * `options` - Output ceiling and Enigma art tile bias
///
/// # Returns
/// A vector containing the decompressed data
pub fn decompress(format: Format, data: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    decompress_from(format, &mut ByteSource::new(data), options)
}

/// Decompress a stream that starts at `offset` inside a ROM image
pub fn decompress_at(
    format: Format,
    rom: &[u8],
    offset: usize,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    decompress_from(format, &mut ByteSource::at(rom, offset)?, options)
}

/// Decompress a stream at `offset` and report how many bytes it occupied
pub fn decompress_with_stats(
    format: Format,
    rom: &[u8],
    offset: usize,
    options: &DecodeOptions,
) -> Result<(Vec<u8>, DecompressionStats)> {
    let mut src = ByteSource::at(rom, offset)?;
    let output = decompress_from(format, &mut src, options)?;

    let stats = DecompressionStats {
        input_bytes: src.consumed(),
        output_bytes: output.len(),
    };
    log::debug!(
        "{} at {:#x}: {} -> {} bytes ({:.1}%)",
        format,
        offset,
        stats.input_bytes,
        stats.output_bytes,
        stats.ratio()
    );

    Ok((output, stats))
}
