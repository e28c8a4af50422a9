//! DCM (delta PCM) decompression
//!
//! Each input byte holds two 4-bit delta codes, low nibble first. Samples are
//! 8-bit unsigned, starting from mid-scale, and saturate at both ends.

use crate::source::ByteSource;

/// Signed step for each 4-bit delta code
pub const DELTA_TABLE: [i16; 16] = [
    0, 1, 2, 4, 8, 16, 32, 64, -128, -1, -2, -4, -8, -16, -32, -64,
];

/// Sample value before the first delta
pub const INITIAL_SAMPLE: u8 = 0x80;

fn step(sample: u8, code: u8) -> u8 {
    (sample as i16 + DELTA_TABLE[(code & 0x0F) as usize]).clamp(0, 255) as u8
}

/// Expand DCM data into unsigned 8-bit PCM, two samples per input byte
pub fn decompress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut sample = INITIAL_SAMPLE;

    for &byte in data {
        sample = step(sample, byte);
        out.push(sample);
        sample = step(sample, byte >> 4);
        out.push(sample);
    }

    log::debug!("dcm: {} bytes to {} samples", data.len(), out.len());
    out
}

/// Expand the rest of a byte source, which DCM always consumes entirely
pub fn decompress_from(src: &mut ByteSource<'_>) -> Vec<u8> {
    let data = src.rest();
    src.skip(data.len());
    decompress(data)
}
