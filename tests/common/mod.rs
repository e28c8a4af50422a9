//! Stream builders shared by the integration tests

#![allow(dead_code)]

/// Kosinski window searched by [`kosinski_encode`]
const SEARCH_WINDOW: usize = 0x2000;

/// Longest copy a Kosinski command can express
const MAX_COPY: usize = 0x100;

/// Bit-level Kosinski stream writer
///
/// Descriptor words are reserved as soon as the previous one fills up, which
/// is where a decoder with eager refill expects them.
pub struct KosinskiWriter {
    out: Vec<u8>,
    descriptor_pos: usize,
    bits: u32,
}

impl KosinskiWriter {
    pub fn new() -> Self {
        Self {
            out: vec![0, 0],
            descriptor_pos: 0,
            bits: 0,
        }
    }

    fn bit(&mut self, set: bool) {
        if set {
            let pos = self.descriptor_pos;
            let word = u16::from_le_bytes([self.out[pos], self.out[pos + 1]]) | (1 << self.bits);
            self.out[pos..pos + 2].copy_from_slice(&word.to_le_bytes());
        }

        self.bits += 1;
        if self.bits == 16 {
            self.descriptor_pos = self.out.len();
            self.out.extend_from_slice(&[0, 0]);
            self.bits = 0;
        }
    }

    pub fn literal(&mut self, byte: u8) {
        self.bit(true);
        self.out.push(byte);
    }

    /// Distance 1..=256, count 2..=5
    pub fn inline_copy(&mut self, distance: usize, count: usize) {
        let code = count - 2;
        self.bit(false);
        self.bit(false);
        self.bit(code & 2 != 0);
        self.bit(code & 1 != 0);
        self.out.push((0x100 - distance) as u8);
    }

    /// Distance 1..=0x2000, count 3..=256
    pub fn full_copy(&mut self, distance: usize, count: usize) {
        let offset = 0x2000 - distance;
        let high = ((offset >> 5) & 0xF8) as u8;

        self.bit(false);
        self.bit(true);
        self.out.push((offset & 0xFF) as u8);
        if count <= 9 {
            self.out.push(high | (count - 2) as u8);
        } else {
            self.out.push(high);
            self.out.push((count - 1) as u8);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bit(false);
        self.bit(true);
        self.out.extend_from_slice(&[0x00, 0xF0, 0x00]);
        self.out
    }
}

fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let mut best = (0, 0);
    for start in pos.saturating_sub(SEARCH_WINDOW)..pos {
        let mut len = 0;
        while len < MAX_COPY && pos + len < data.len() && data[start + len] == data[pos + len] {
            len += 1;
        }
        if len > best.1 {
            best = (pos - start, len);
        }
    }
    best
}

/// Greedy Kosinski encoder
pub fn kosinski_encode(data: &[u8]) -> Vec<u8> {
    let mut writer = KosinskiWriter::new();
    let mut pos = 0;

    while pos < data.len() {
        let (distance, len) = longest_match(data, pos);

        if (2..=5).contains(&len) && distance <= 0x100 {
            writer.inline_copy(distance, len);
            pos += len;
        } else if len >= 3 {
            writer.full_copy(distance, len);
            pos += len;
        } else {
            writer.literal(data[pos]);
            pos += 1;
        }
    }

    writer.finish()
}

/// Codes `0`, `10`, `110`, `1110`, `11110`, `111110`; together with the
/// `111111` escape every bit pattern decodes
const COMPLETE_CODES: [(u8, u8); 6] = [(0, 1), (2, 2), (6, 3), (14, 4), (30, 5), (62, 6)];

/// Nemesis code table assigning the complete code set to `(nibble, run)` pairs
pub fn nemesis_complete_table(entries: [(u8, u8); 6]) -> Vec<u8> {
    let mut table = Vec::new();
    for ((nibble, run), (code, length)) in entries.into_iter().zip(COMPLETE_CODES) {
        table.push(0x80 | (nibble & 0x0F));
        table.push(((run - 1) << 4) | length);
        table.push(code);
    }
    table.push(0xFF);
    table
}

/// Nemesis stream over the complete table with an arbitrary code bitstream
///
/// `bitstream` must hold at least `tiles * 104` bytes to be sure every row
/// can be filled.
pub fn nemesis_stream(tiles: u16, xor: bool, entries: [(u8, u8); 6], bitstream: &[u8]) -> Vec<u8> {
    let header = tiles | if xor { 0x8000 } else { 0 };
    let mut stream = header.to_be_bytes().to_vec();
    stream.extend_from_slice(&nemesis_complete_table(entries));
    stream.extend_from_slice(bitstream);
    stream
}

/// Enough code bytes for `tiles` tiles even when every code is 13 bits
pub fn nemesis_bitstream_len(tiles: u16) -> usize {
    tiles as usize * 8 * 8 * 13 / 8
}
