//! DecodeReader - `Read` adapter over any decoder
//!
//! None of the formats can be decoded incrementally with a bounded window
//! (Nemesis and Enigma have no length until the terminator, Kosinski reaches
//! 8KB back), so the reader pulls the whole compressed input on first use and
//! then serves the decoded bytes.

use crate::{DecodeOptions, Format, Result};
use std::io::Read;

/// Streaming decompression reader implementing Read trait
#[derive(Debug)]
pub struct DecodeReader<R: Read> {
    reader: R,
    format: Format,
    options: DecodeOptions,
    decoded: bool,
    failure: Option<String>,
    output_buffer: Vec<u8>,
    output_pos: usize,
}

impl<R: Read> DecodeReader<R> {
    /// Create a new DecodeReader with default options
    pub fn new(reader: R, format: Format) -> Self {
        Self::with_options(reader, format, DecodeOptions::default())
    }

    /// Create a new DecodeReader with explicit options
    pub fn with_options(reader: R, format: Format, options: DecodeOptions) -> Self {
        Self {
            reader,
            format,
            options,
            decoded: false,
            failure: None,
            output_buffer: Vec::new(),
            output_pos: 0,
        }
    }

    /// Format this reader decodes
    pub fn format(&self) -> Format {
        self.format
    }

    /// Read all compressed input and decode it
    fn decode(&mut self) -> Result<()> {
        let mut compressed = Vec::new();
        self.reader.read_to_end(&mut compressed)?;

        self.output_buffer = crate::decompress(self.format, &compressed, &self.options)?;
        self.output_pos = 0;
        self.decoded = true;

        log::debug!(
            "{}: reader decoded {} bytes from {}",
            self.format,
            self.output_buffer.len(),
            compressed.len()
        );

        Ok(())
    }

    /// Consume the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Read for DecodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(message) = &self.failure {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                message.clone(),
            ));
        }

        if !self.decoded {
            if let Err(e) = self.decode() {
                self.failure = Some(e.to_string());
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
            }
        }

        let available = &self.output_buffer[self.output_pos..];
        let to_copy = buf.len().min(available.len());
        buf[..to_copy].copy_from_slice(&available[..to_copy]);
        self.output_pos += to_copy;

        Ok(to_copy)
    }
}
