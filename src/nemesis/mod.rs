//! Nemesis decompression
//!
//! Nemesis compresses 4bpp tile patterns as runs of identical nibbles, each
//! run identified by a per-stream prefix code. A stream is laid out as:
//!
//! - a 16-bit big-endian header: bit 15 selects XOR-delta rows, bits 0-14
//!   hold the tile count;
//! - the code table preamble, terminated by `0xFF`;
//! - an MSB-first bitstream of codes, 8 rows of 8 nibbles per tile.
//!
//! The bit pattern `111111` is reserved as an inline escape carrying a raw
//! 3-bit run length and 4-bit nibble.

mod decoder;
mod table;

pub use table::{CodeEntry, CodeTable};

use crate::source::ByteSource;
use crate::{Result, TILE_SIZE};

/// Header bit selecting XOR-delta row storage
pub const XOR_MODE_FLAG: u16 = 0x8000;

/// Code table terminator
pub const TABLE_END: u8 = 0xFF;

/// Top six bits of the lookahead that introduce an inline run
pub const INLINE_ESCAPE: u8 = 0x3F;

/// Rows in one 8x8 tile
pub const ROWS_PER_TILE: usize = 8;

/// Nibbles (pixels) in one tile row
pub const NIBBLES_PER_ROW: usize = 8;

/// Parsed Nemesis stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NemesisHeader {
    /// Rows are stored XORed with the previous output row
    pub xor_mode: bool,
    /// Number of 32-byte tiles in the output
    pub tile_count: u16,
}

impl NemesisHeader {
    /// Split a raw header word into its flag and count
    pub fn from_word(word: u16) -> Self {
        Self {
            xor_mode: word & XOR_MODE_FLAG != 0,
            tile_count: word & !XOR_MODE_FLAG,
        }
    }

    /// Read the header from a byte source
    pub fn read(src: &mut ByteSource<'_>) -> Result<Self> {
        Ok(Self::from_word(src.read_u16_be()?))
    }

    /// Exact decompressed size in bytes
    pub fn output_size(&self) -> usize {
        self.tile_count as usize * TILE_SIZE
    }
}

/// Number of tiles a Nemesis stream decompresses to, from its header alone
pub fn tile_count(data: &[u8]) -> Result<u16> {
    Ok(NemesisHeader::read(&mut ByteSource::new(data))?.tile_count)
}

/// Decompress a Nemesis stream from a byte source
pub fn decompress_from(src: &mut ByteSource<'_>) -> Result<Vec<u8>> {
    let header = NemesisHeader::read(src)?;
    log::debug!(
        "nemesis: {} tiles, xor mode {}",
        header.tile_count,
        header.xor_mode
    );

    let table = CodeTable::read(src)?;
    if header.tile_count == 0 {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(header.output_size());
    decoder::decode_rows(src, &table, header, &mut out)?;

    Ok(out)
}

/// Decompress a Nemesis stream held in memory
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_from(&mut ByteSource::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenesisError;

    /// One tile, palette 0xA coded "0" and palette 3 coded "10", runs of 8
    const STRIPES: [u8; 11] = [
        0x00, 0x01, 0x8A, 0x71, 0x00, 0x83, 0x72, 0x02, 0xFF, 0x49, 0x20,
    ];

    #[test]
    fn test_header_fields() {
        let header = NemesisHeader::from_word(0x8123);
        assert!(header.xor_mode);
        assert_eq!(header.tile_count, 0x123);
        assert_eq!(header.output_size(), 0x123 * 32);
        assert_eq!(tile_count(&STRIPES).unwrap(), 1);
    }

    #[test]
    fn test_plain_rows() {
        let out = decompress(&STRIPES).unwrap();

        let mut expected = Vec::new();
        for _ in 0..4 {
            expected.extend_from_slice(&[0xAA; 4]);
            expected.extend_from_slice(&[0x33; 4]);
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn test_xor_rows() {
        let mut data = STRIPES;
        data[0] = 0x80;

        let out = decompress(&data).unwrap();

        let mut expected = Vec::new();
        for _ in 0..2 {
            for byte in [0xAA, 0x99, 0x33, 0x00] {
                expected.extend_from_slice(&[byte; 4]);
            }
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn test_zero_tiles() {
        assert!(decompress(&[0x80, 0x00, 0x80, 0xFF]).unwrap().is_empty());
        assert!(matches!(
            decompress(&[0x00, 0x00]),
            Err(GenesisError::UnexpectedEof { offset: 2 })
        ));
    }

    #[test]
    fn test_zero_tiles_consume_table() {
        let stream = [0x00, 0x00, 0x80, 0x71, 0x00, 0xFF];
        let mut rom = stream.to_vec();
        rom.extend_from_slice(&[0x12, 0x34]);

        let mut src = ByteSource::new(&rom);
        assert!(decompress_from(&mut src).unwrap().is_empty());
        assert_eq!(src.consumed(), stream.len());
    }

    #[test]
    fn test_consumed_bytes() {
        let mut rom = STRIPES.to_vec();
        rom.extend_from_slice(&[0xDE, 0xAD]);

        let mut src = ByteSource::new(&rom);
        decompress_from(&mut src).unwrap();
        assert_eq!(src.consumed(), STRIPES.len());
    }

    #[test]
    fn test_truncated_rows() {
        assert!(matches!(
            decompress(&STRIPES[..10]),
            Err(GenesisError::UnexpectedEof { .. })
        ));
    }
}
