//! Enigma decompression
//!
//! Enigma packs 16-bit plane mapping words (tile index plus priority,
//! palette line and flip flags) as a stream of short run-length packets. The
//! 6-byte header holds the inline value width, a mask of the flag bits that
//! are stored per value, a shared incrementing word and a common word:
//!
//! | Packet | Meaning |
//! |---|---|
//! | `00 cccc` | incrementing word, `c+1` times, advancing it each time |
//! | `01 cccc` | common word, `c+1` times |
//! | `100 cccc` | one inline value, `c+1` times |
//! | `101 cccc` | one inline value, `c+1` times, +1 after each |
//! | `110 cccc` | one inline value, `c+1` times, -1 after each |
//! | `111 cccc` | `c+1` separate inline values; `c = 15` ends the stream |
//!
//! Every emitted word has the caller's art tile bias added, modulo 2^16.

use crate::bits::MsbBits;
use crate::source::ByteSource;
use crate::{DecodeOptions, GenesisError, Result};

/// Count field value that ends the stream in the inline-literal mode
const END_OF_STREAM: u32 = 0x0F;

/// Flag mask bits (high to low) and the output bit each one controls
const FLAG_BITS: [(u8, u16); 5] = [
    (0x10, 0x8000), // priority
    (0x08, 0x4000), // palette line, high bit
    (0x04, 0x2000), // palette line, low bit
    (0x02, 0x1000), // vertical flip
    (0x01, 0x0800), // horizontal flip
];

/// Parsed Enigma stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnigmaHeader {
    /// Width in bits of an inline value
    pub packet_length: u8,
    /// Which of the five high flag bits are stored per inline value
    pub flag_mask: u8,
    /// Seed of the shared incrementing word
    pub incrementing_value: u16,
    /// The common word
    pub common_value: u16,
}

impl EnigmaHeader {
    /// Read the header from a byte source
    pub fn read(src: &mut ByteSource<'_>) -> Result<Self> {
        let packet_length = src.read_u8()?;
        if packet_length > 16 {
            return Err(GenesisError::InvalidPacketLength(packet_length));
        }

        Ok(Self {
            packet_length,
            flag_mask: src.read_u8()?,
            incrementing_value: src.read_u16_be()?,
            common_value: src.read_u16_be()?,
        })
    }
}

struct WordWriter {
    words: Vec<u16>,
    bias: u16,
    limit: usize,
}

impl WordWriter {
    fn push(&mut self, word: u16) -> Result<()> {
        if (self.words.len() + 1) * 2 > self.limit {
            return Err(GenesisError::OutputLimitExceeded { limit: self.limit });
        }
        self.words.push(word.wrapping_add(self.bias));
        Ok(())
    }
}

/// Read the flag bits selected by the mask, then the raw value
fn read_inline_value(
    src: &mut ByteSource<'_>,
    bits: &mut MsbBits,
    header: &EnigmaHeader,
) -> Result<u16> {
    let mut word = 0u16;

    for (mask_bit, output_bit) in FLAG_BITS {
        if header.flag_mask & mask_bit != 0 && bits.read_bit(src)? {
            word |= output_bit;
        }
    }

    let value = bits.read(src, header.packet_length as u32)? as u16;
    Ok(word | value)
}

/// Decompress an Enigma stream into words from a byte source
pub fn decompress_words_from(
    src: &mut ByteSource<'_>,
    options: &DecodeOptions,
) -> Result<Vec<u16>> {
    let header = EnigmaHeader::read(src)?;
    log::debug!("enigma: {:?}, art tile {:#06x}", header, options.art_tile);

    let mut incrementing = header.incrementing_value;
    let mut bits = MsbBits::new();
    let mut out = WordWriter {
        words: Vec::new(),
        bias: options.art_tile,
        limit: options.max_output,
    };

    loop {
        if bits.read_bit(src)? {
            let mode = bits.read(src, 2)?;
            let count = bits.read(src, 4)?;

            if mode == 3 {
                if count == END_OF_STREAM {
                    break;
                }
                for _ in 0..=count {
                    let word = read_inline_value(src, &mut bits, &header)?;
                    out.push(word)?;
                }
                continue;
            }

            let mut word = read_inline_value(src, &mut bits, &header)?;
            for _ in 0..=count {
                out.push(word)?;
                word = match mode {
                    0 => word,
                    1 => word.wrapping_add(1),
                    _ => word.wrapping_sub(1),
                };
            }
        } else {
            let common = bits.read_bit(src)?;
            let count = bits.read(src, 4)?;

            for _ in 0..=count {
                if common {
                    out.push(header.common_value)?;
                } else {
                    out.push(incrementing)?;
                    incrementing = incrementing.wrapping_add(1);
                }
            }
        }
    }

    log::debug!(
        "enigma: end of stream at offset {:#x}, {} words",
        src.position(),
        out.words.len()
    );

    Ok(out.words)
}

/// Decompress an Enigma stream held in memory into words
pub fn decompress_words(data: &[u8], options: &DecodeOptions) -> Result<Vec<u16>> {
    decompress_words_from(&mut ByteSource::new(data), options)
}

/// Decompress an Enigma stream from a byte source into big-endian bytes
pub fn decompress_from(src: &mut ByteSource<'_>, options: &DecodeOptions) -> Result<Vec<u8>> {
    let words = decompress_words_from(src, options)?;
    Ok(words.iter().flat_map(|word| word.to_be_bytes()).collect())
}

/// Decompress an Enigma stream held in memory into big-endian bytes
pub fn decompress(data: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    decompress_from(&mut ByteSource::new(data), options)
}
