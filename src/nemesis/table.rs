//! Nemesis code table
//!
//! The table maps every possible 8-bit lookahead to the nibble run whose
//! prefix code it starts with. Codes are expanded into all 2^(8-L) slots that
//! share their top L bits, so decoding is a single array index.

use super::TABLE_END;
use crate::source::ByteSource;
use crate::{GenesisError, Result};

/// A run of identical nibbles together with its code length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// Palette index written for every nibble of the run
    pub nibble: u8,
    /// Number of nibbles in the run (1 to 8)
    pub run: u8,
    /// Length of the prefix code in bits (1 to 8)
    pub length: u8,
}

/// 256-slot prefix code lookup table
#[derive(Debug, Clone)]
pub struct CodeTable {
    slots: [Option<CodeEntry>; 256],
}

impl CodeTable {
    /// Parse the table preamble that follows the Nemesis header
    pub fn read(src: &mut ByteSource<'_>) -> Result<Self> {
        let mut table = Self {
            slots: [None; 256],
        };
        let mut nibble = 0;
        let mut byte = src.read_u8()?;

        while byte != TABLE_END {
            if byte & 0x80 != 0 {
                nibble = byte & 0x0F;
                byte = src.read_u8()?;
                continue;
            }

            let run = ((byte & 0x70) >> 4) + 1;
            let length = byte & 0x0F;
            let code = src.read_u8()?;

            if length > 8 {
                return Err(GenesisError::InvalidCodeLength(length));
            }
            if length > 0 {
                table.assign(
                    code,
                    CodeEntry {
                        nibble,
                        run,
                        length,
                    },
                );
            }

            byte = src.read_u8()?;
        }

        log::debug!(
            "nemesis: code table with {} of 256 slots assigned",
            table.slots.iter().filter(|slot| slot.is_some()).count()
        );

        Ok(table)
    }

    fn assign(&mut self, code: u8, entry: CodeEntry) {
        let shift = 8 - entry.length as usize;
        let code = code as usize & ((1 << entry.length) - 1);
        let first = code << shift;

        for slot in &mut self.slots[first..first + (1 << shift)] {
            *slot = Some(entry);
        }
    }

    /// Entry whose code prefixes the 8-bit lookahead
    pub fn lookup(&self, lookahead: u8) -> Option<CodeEntry> {
        self.slots[lookahead as usize]
    }
}
