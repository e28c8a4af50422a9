//! Nemesis row decoding
//!
//! Rows are 8 nibbles (4 bytes) wide. Each code yields a run of identical
//! nibbles; a run that does not fit in the current row continues in the next
//! one, and whatever is left after the last row is discarded.

use super::table::CodeTable;
use super::{NemesisHeader, INLINE_ESCAPE, NIBBLES_PER_ROW, ROWS_PER_TILE};
use crate::bits::MsbBits;
use crate::source::ByteSource;
use crate::{GenesisError, Result};

/// Read the next nibble run as `(nibble, run length)`
fn next_run(
    src: &mut ByteSource<'_>,
    bits: &mut MsbBits,
    table: &CodeTable,
) -> Result<(u8, u8)> {
    let lookahead = bits.peek(src, 8) as u8;

    if lookahead >> 2 == INLINE_ESCAPE {
        bits.read(src, 6)?;
        let run = bits.read(src, 3)? as u8 + 1;
        let nibble = bits.read(src, 4)? as u8;
        return Ok((nibble, run));
    }

    match table.lookup(lookahead) {
        Some(entry) => {
            bits.read(src, entry.length as u32)?;
            Ok((entry.nibble, entry.run))
        }
        None => Err(GenesisError::InvalidCode {
            code: lookahead,
            offset: src.position(),
        }),
    }
}

/// Decode all rows described by `header` into `out`
pub(crate) fn decode_rows(
    src: &mut ByteSource<'_>,
    table: &CodeTable,
    header: NemesisHeader,
    out: &mut Vec<u8>,
) -> Result<()> {
    let total_rows = header.tile_count as usize * ROWS_PER_TILE;
    let mut bits = MsbBits::new();

    let mut row: u32 = 0;
    let mut filled = 0;
    let mut previous: u32 = 0;
    let mut rows_done = 0;

    while rows_done < total_rows {
        let (nibble, mut run) = next_run(src, &mut bits, table)?;

        while run > 0 && rows_done < total_rows {
            row = (row << 4) | nibble as u32;
            filled += 1;
            run -= 1;

            if filled == NIBBLES_PER_ROW {
                let value = if header.xor_mode {
                    previous ^= row;
                    previous
                } else {
                    row
                };
                out.extend_from_slice(&value.to_be_bytes());

                row = 0;
                filled = 0;
                rows_done += 1;
            }
        }
    }

    Ok(())
}
