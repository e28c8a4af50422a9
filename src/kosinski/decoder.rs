//! Kosinski command decoding
//!
//! This module implements the single Kosinski grammar shared by the bounded
//! and growable entry points.

use super::bits::DescriptorBits;
use super::sink::OutputSink;
use super::{FULL_WINDOW, INLINE_WINDOW};
use crate::source::ByteSource;
use crate::Result;

/// One decoded Kosinski command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Copy one raw byte
    Literal(u8),
    /// Copy `count` bytes from `distance` bytes back
    Copy { distance: usize, count: usize },
    /// Extended count of 1: no copy, keep going
    Continue,
    /// End of stream marker
    End,
}

/// Decode the next command from the stream
pub(crate) fn next_command(
    src: &mut ByteSource<'_>,
    bits: &mut DescriptorBits,
) -> Result<Command> {
    if bits.next_bit(src)? {
        return Ok(Command::Literal(src.read_u8()?));
    }

    if bits.next_bit(src)? {
        // Full form: 13-bit distance, 3-bit count with an extension byte
        let lo = src.read_u8()? as usize;
        let hi = src.read_u8()? as usize;
        let distance = FULL_WINDOW - (((hi & 0xF8) << 5) | lo);

        let count = match hi & 0x07 {
            0 => match src.read_u8()? {
                0 => return Ok(Command::End),
                1 => return Ok(Command::Continue),
                n => n as usize + 1,
            },
            n => n + 2,
        };

        Ok(Command::Copy { distance, count })
    } else {
        // Inline form: 2-bit count from the descriptor, 8-bit distance
        let high = bits.next_bit(src)? as usize;
        let low = bits.next_bit(src)? as usize;
        let count = ((high << 1) | low) + 2;
        let distance = INLINE_WINDOW - src.read_u8()? as usize;

        Ok(Command::Copy { distance, count })
    }
}

/// Run the decoder until the end marker, writing into `sink`
pub(crate) fn expand<S: OutputSink>(src: &mut ByteSource<'_>, sink: &mut S) -> Result<()> {
    let mut bits = DescriptorBits::new(src)?;

    loop {
        let command = next_command(src, &mut bits)?;
        log::trace!("kosinski: {:?} at output {:#x}", command, sink.len());

        match command {
            Command::Literal(byte) => sink.push(byte)?,
            Command::Copy { distance, count } => sink.copy_back(distance, count)?,
            Command::Continue => {}
            Command::End => break,
        }
    }

    log::debug!(
        "kosinski: end marker at offset {:#x}, {} bytes decoded",
        src.position(),
        sink.len()
    );

    Ok(())
}
