//! Common types and constants for the Genesis decompression suite
//!
//! This module defines the format selector, per-call decode options, statistics
//! and the error type shared by every decoder in the crate.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Compression format of a ROM asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// LZ77-style dictionary format with an 8KB back-reference window
    Kosinski,
    /// Prefix-coded nibble-run format for 8x8 tile patterns
    Nemesis,
    /// LZSS-style format with a 4KB ring window
    Saxman,
    /// Bit-packed run-length format for plane mappings
    Enigma,
    /// 4-bit delta PCM audio samples
    Dcm,
}

impl Format {
    /// All supported formats, in a stable order
    pub const ALL: [Format; 5] = [
        Format::Kosinski,
        Format::Nemesis,
        Format::Saxman,
        Format::Enigma,
        Format::Dcm,
    ];

    /// Canonical lowercase name of the format
    pub fn name(&self) -> &'static str {
        match self {
            Format::Kosinski => "kosinski",
            Format::Nemesis => "nemesis",
            Format::Saxman => "saxman",
            Format::Enigma => "enigma",
            Format::Dcm => "dcm",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kosinski" | "kos" => Ok(Format::Kosinski),
            "nemesis" | "nem" => Ok(Format::Nemesis),
            "saxman" | "sax" => Ok(Format::Saxman),
            "enigma" | "eni" => Ok(Format::Enigma),
            "dcm" | "dpcm" => Ok(Format::Dcm),
            _ => Err(GenesisError::UnknownFormat(s.to_string())),
        }
    }
}

/// Per-call decoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Hard ceiling on decompressed size for the unbounded decoders
    pub max_output: usize,
    /// Additive bias applied to every Enigma output word
    pub art_tile: u16,
}

impl DecodeOptions {
    /// Create options with the default output ceiling and no art tile bias
    pub fn new() -> Self {
        Self {
            max_output: DEFAULT_MAX_OUTPUT,
            art_tile: 0,
        }
    }

    /// Set the output ceiling
    pub fn with_max_output(mut self, limit: usize) -> Self {
        self.max_output = limit;
        self
    }

    /// Set the Enigma art tile bias
    pub fn with_art_tile(mut self, art_tile: u16) -> Self {
        self.art_tile = art_tile;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A single decode request against a shared ROM image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeJob {
    /// Format of the asset
    pub format: Format,
    /// Absolute offset of the compressed stream in the ROM
    pub offset: usize,
    /// Enigma art tile bias (ignored by the other formats)
    pub art_tile: u16,
}

impl DecodeJob {
    /// Create a job with no art tile bias
    pub fn new(format: Format, offset: usize) -> Self {
        Self {
            format,
            offset,
            art_tile: 0,
        }
    }
}

/// Error type for decoding operations
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The compressed stream ended before the decoder reached its terminator
    #[error("Unexpected end of input at offset {offset:#x}")]
    UnexpectedEof {
        /// Absolute source offset of the missing byte
        offset: usize,
    },

    /// A back-reference points before the start of the output
    #[error("Invalid back-reference: distance {distance} at output position {position:#x}")]
    InvalidBackReference {
        /// Backward distance requested by the stream
        distance: usize,
        /// Output length when the copy was decoded
        position: usize,
    },

    /// A Nemesis bit pattern matches neither the code table nor the inline escape
    #[error("Invalid Nemesis code {code:#04x} near offset {offset:#x}")]
    InvalidCode {
        /// The 8-bit lookahead that failed to decode
        code: u8,
        /// Source offset of the bit cursor
        offset: usize,
    },

    /// A Nemesis code table entry declares a code longer than 8 bits
    #[error("Invalid Nemesis code length: {0} (expected 0 to 8)")]
    InvalidCodeLength(u8),

    /// An Enigma header declares an inline value wider than 16 bits
    #[error("Invalid Enigma packet length: {0} (expected at most 16)")]
    InvalidPacketLength(u8),

    /// Decoding would exceed the output ceiling
    #[error("Output limit of {limit} bytes exceeded")]
    OutputLimitExceeded {
        /// The ceiling that was hit
        limit: usize,
    },

    /// The requested start offset lies outside the source
    #[error("Offset {offset:#x} is outside the source ({len} bytes)")]
    OffsetOutOfRange {
        /// Requested offset
        offset: usize,
        /// Source length
        len: usize,
    },

    /// Unrecognized format name
    #[error("Unknown compression format: {0}")]
    UnknownFormat(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, GenesisError>;

/// Default ceiling for the unbounded decoders (1MB)
pub const DEFAULT_MAX_OUTPUT: usize = 0x10_0000;

/// Size of one 4bpp 8x8 tile pattern in bytes
pub const TILE_SIZE: usize = 32;

/// Statistics for a single decode operation
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DecompressionStats {
    /// Compressed bytes consumed from the source
    pub input_bytes: usize,
    /// Decompressed bytes produced
    pub output_bytes: usize,
}

impl DecompressionStats {
    /// Compressed size as a percentage of the decompressed size
    pub fn ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            return 0.0;
        }
        (self.input_bytes as f64 / self.output_bytes as f64) * 100.0
    }
}
