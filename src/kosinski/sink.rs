//! Output sinks for the Kosinski decoder
//!
//! The grammar is decoded once, in [`super::decoder`]; the two public
//! variants differ only in where the bytes go. Both sinks double as the
//! back-reference dictionary, since already written output is the window.

use crate::{GenesisError, Result};

/// Destination of decoded bytes that can also be read back
pub(crate) trait OutputSink {
    /// Number of bytes written so far
    fn len(&self) -> usize;

    /// Byte previously written at `index`
    fn byte_at(&self, index: usize) -> u8;

    /// Append one byte
    fn push(&mut self, byte: u8) -> Result<()>;

    /// Copy `count` bytes starting `distance` bytes behind the write position
    ///
    /// Bytes are copied one at a time so a copy may overlap its own output.
    fn copy_back(&mut self, distance: usize, count: usize) -> Result<()> {
        let position = self.len();
        if distance == 0 || distance > position {
            return Err(GenesisError::InvalidBackReference { distance, position });
        }

        for _ in 0..count {
            let byte = self.byte_at(self.len() - distance);
            self.push(byte)?;
        }

        Ok(())
    }
}

/// Fixed-size caller buffer
#[derive(Debug)]
pub(crate) struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }
}

impl OutputSink for SliceSink<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn byte_at(&self, index: usize) -> u8 {
        self.buf[index]
    }

    fn push(&mut self, byte: u8) -> Result<()> {
        match self.buf.get_mut(self.len) {
            Some(slot) => {
                *slot = byte;
                self.len += 1;
                Ok(())
            }
            None => Err(GenesisError::OutputLimitExceeded {
                limit: self.buf.len(),
            }),
        }
    }
}

/// Growable buffer with a hard ceiling
#[derive(Debug)]
pub(crate) struct VecSink {
    data: Vec<u8>,
    limit: usize,
}

impl VecSink {
    pub fn new(limit: usize, capacity_hint: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity_hint.min(limit)),
            limit,
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl OutputSink for VecSink {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn byte_at(&self, index: usize) -> u8 {
        self.data[index]
    }

    fn push(&mut self, byte: u8) -> Result<()> {
        if self.data.len() >= self.limit {
            return Err(GenesisError::OutputLimitExceeded { limit: self.limit });
        }
        self.data.push(byte);
        Ok(())
    }
}
