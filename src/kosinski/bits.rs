//! Kosinski descriptor field
//!
//! Control bits arrive in 16-bit little-endian descriptor words and are
//! consumed least-significant bit first. A new descriptor is loaded as soon as
//! the previous one runs out, before any data byte belonging to the command
//! that used its last bit.

use crate::source::ByteSource;
use crate::{GenesisError, Result};

/// LSB-first bit cursor with 16-bit refill
#[derive(Debug)]
pub(crate) struct DescriptorBits {
    word: u16,
    remaining: u8,
    /// Source offset at which a refill found the stream exhausted
    exhausted_at: Option<usize>,
}

impl DescriptorBits {
    /// Load the first descriptor word
    pub fn new(src: &mut ByteSource<'_>) -> Result<Self> {
        let word = src.read_u16_le()?;
        Ok(Self {
            word,
            remaining: 16,
            exhausted_at: None,
        })
    }

    /// Take the next control bit
    pub fn next_bit(&mut self, src: &mut ByteSource<'_>) -> Result<bool> {
        if let Some(offset) = self.exhausted_at {
            return Err(GenesisError::UnexpectedEof { offset });
        }

        let bit = self.word & 1 != 0;
        self.word >>= 1;
        self.remaining -= 1;

        if self.remaining == 0 {
            self.refill(src);
        }

        Ok(bit)
    }

    /// Eagerly load the next descriptor
    ///
    /// A stream may legally end right after a descriptor's last bit (the
    /// terminator used it), so a missing word is only an error once another
    /// bit is requested.
    fn refill(&mut self, src: &mut ByteSource<'_>) {
        if src.remaining() < 2 {
            self.exhausted_at = Some(src.position() + src.remaining());
            return;
        }

        match src.read_u16_le() {
            Ok(word) => {
                self.word = word;
                self.remaining = 16;
            }
            Err(_) => self.exhausted_at = Some(src.position()),
        }
    }
}
