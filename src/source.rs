//! Forward-only byte cursor over compressed data
//!
//! Every stream decoder reads its input through a [`ByteSource`]. The source
//! wraps a ROM image (or any in-memory blob) together with a start offset and
//! never seeks backwards; running off the end is reported as
//! [`GenesisError::UnexpectedEof`] with the absolute offset of the missing byte.

use crate::{GenesisError, Result};

/// Forward-only reader over a byte slice
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    data: &'a [u8],
    start: usize,
    pos: usize,
}

impl<'a> ByteSource<'a> {
    /// Create a source reading from the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            pos: 0,
        }
    }

    /// Create a source reading `data` from `offset`
    ///
    /// An offset equal to the length is accepted (an empty stream); anything
    /// past it is rejected.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(GenesisError::OffsetOutOfRange {
                offset,
                len: data.len(),
            });
        }

        Ok(Self {
            data,
            start: offset,
            pos: offset,
        })
    }

    /// Absolute position of the next byte
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes consumed since the start offset
    pub fn consumed(&self) -> usize {
        self.pos - self.start
    }

    /// Number of bytes left in the underlying slice
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the source has no more bytes
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(GenesisError::UnexpectedEof { offset: self.pos }),
        }
    }

    /// Read a big-endian 16-bit word
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()?;
        let lo = self.read_u8()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Read a little-endian 16-bit word
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// The unread tail of the underlying slice
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Advance past up to `count` bytes, stopping at the end of the slice
    pub fn skip(&mut self, count: usize) {
        self.pos = self.pos.saturating_add(count).min(self.data.len());
    }
}
