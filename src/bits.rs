//! MSB-first bit cursor
//!
//! Nemesis and Enigma read their bitstreams most-significant bit first,
//! pulling one byte at a time from the source. Kosinski's LSB-first
//! descriptor cursor is unrelated and lives in its own module.

use crate::source::ByteSource;
use crate::Result;

const fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}

/// MSB-first bit cursor with 8-bit refill
///
/// The accumulator only ever holds bits of bytes already taken from the
/// source, so [`ByteSource::consumed`] stays exact. Lookahead through
/// [`MsbBits::peek`] reads ahead without consuming and treats bits past the
/// end of the stream as zero.
#[derive(Debug, Default)]
pub(crate) struct MsbBits {
    acc: u32,
    count: u32,
}

impl MsbBits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look at the next `n` bits (at most 16) without consuming them
    pub fn peek(&self, src: &ByteSource<'_>, n: u32) -> u32 {
        debug_assert!(n <= 16);

        let mut acc = self.acc;
        let mut count = self.count;
        let mut ahead = src.rest().iter();

        while count < n {
            let byte = ahead.next().copied().unwrap_or(0);
            acc = (acc << 8) | byte as u32;
            count += 8;
        }

        (acc >> (count - n)) & mask(n)
    }

    /// Consume the next `n` bits (at most 16)
    pub fn read(&mut self, src: &mut ByteSource<'_>, n: u32) -> Result<u32> {
        debug_assert!(n <= 16);

        while self.count < n {
            let byte = src.read_u8()?;
            self.acc = (self.acc << 8) | byte as u32;
            self.count += 8;
        }

        self.count -= n;
        let value = (self.acc >> self.count) & mask(n);
        self.acc &= mask(self.count);

        Ok(value)
    }

    /// Consume a single bit
    pub fn read_bit(&mut self, src: &mut ByteSource<'_>) -> Result<bool> {
        Ok(self.read(src, 1)? != 0)
    }
}
