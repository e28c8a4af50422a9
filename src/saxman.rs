//! Saxman decompression
//!
//! Saxman is an LZSS variant over a 4 KiB ring window, used for the Sonic 2
//! sound driver and its music. The payload is preceded by a 16-bit length,
//! normally little-endian. Control bits come LSB first from one descriptor
//! byte at a time: `1` copies a literal, `0` reads a two-byte back-reference
//! `(low, high)` whose 12-bit window position is rebased by `0x12`.
//!
//! References that resolve to data not yet written expand to zeros, which is
//! how the format encodes runs of zero bytes. Decoding stops quietly wherever
//! the payload ends, so neither function here can fail.

use crate::source::ByteSource;

/// Ring window size
pub const WINDOW_SIZE: usize = 0x1000;

/// Rebase applied to the 12-bit window position of a back-reference
pub const WINDOW_REBASE: usize = 0x12;

/// Shortest back-reference
pub const MIN_MATCH: usize = 3;

/// Payload length from the 2-byte header, little-endian unless that would
/// run past the end of `data`
fn payload_length(data: &[u8]) -> usize {
    let available = data.len().saturating_sub(2);
    let le = u16::from_le_bytes([data[0], data[1]]) as usize;
    if le <= available {
        return le;
    }

    let be = u16::from_be_bytes([data[0], data[1]]) as usize;
    log::debug!(
        "saxman: little-endian size {:#x} overruns {:#x} bytes, trying big-endian {:#x}",
        le,
        available,
        be
    );
    be.min(available)
}

/// Resolve a back-reference to a source offset in `out`, or `None` when it
/// points outside the data written so far
fn resolve(low: u8, high: u8, dest: usize) -> Option<usize> {
    let base = ((((high as usize) & 0xF0) << 4) | low as usize) + WINDOW_REBASE;
    let base = base % WINDOW_SIZE;
    let offset = base.wrapping_sub(dest) % WINDOW_SIZE;

    (offset + dest)
        .checked_sub(WINDOW_SIZE)
        .filter(|&source| source < dest)
}

/// Decompress a Saxman stream from a byte source
///
/// The source is left after the header and the declared payload.
pub fn decompress_from(src: &mut ByteSource<'_>) -> Vec<u8> {
    let data = src.rest();
    if data.len() < 2 {
        log::debug!("saxman: {} bytes is too short for a header", data.len());
        src.skip(data.len());
        return Vec::new();
    }

    let size = payload_length(data);
    src.skip(2 + size);
    decompress_with_size(&data[2..], size)
}

/// Decompress a Saxman stream with its 2-byte length header
pub fn decompress(data: &[u8]) -> Vec<u8> {
    decompress_from(&mut ByteSource::new(data))
}

/// Decompress a headerless Saxman payload of known compressed size
pub fn decompress_with_size(payload: &[u8], size: usize) -> Vec<u8> {
    let payload = &payload[..size.min(payload.len())];
    let mut out = Vec::with_capacity(payload.len() * 2);
    let mut pos = 0;
    let mut descriptor = 0u8;
    let mut remaining = 0;

    loop {
        if remaining == 0 {
            let Some(&byte) = payload.get(pos) else { break };
            descriptor = byte;
            remaining = 8;
            pos += 1;
        }

        let literal = descriptor & 1 != 0;
        descriptor >>= 1;
        remaining -= 1;

        if literal {
            let Some(&byte) = payload.get(pos) else { break };
            log::trace!("saxman: literal {:#04x}", byte);
            out.push(byte);
            pos += 1;
            continue;
        }

        let (Some(&low), Some(&high)) = (payload.get(pos), payload.get(pos + 1)) else {
            break;
        };
        pos += 2;

        let count = (high & 0x0F) as usize + MIN_MATCH;
        let dest = out.len();

        match resolve(low, high, dest) {
            Some(source) => {
                log::trace!("saxman: copy {} from {:#x}", count, source);
                for i in 0..count {
                    let byte = out[source + i];
                    out.push(byte);
                }
            }
            None => {
                log::trace!("saxman: zero fill {}", count);
                out.resize(dest + count, 0);
            }
        }
    }

    log::debug!(
        "saxman: {} payload bytes to {} bytes",
        payload.len(),
        out.len()
    );

    out
}
