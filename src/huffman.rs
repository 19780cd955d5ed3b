//! Canonical Huffman code assignment and the two-level decode table:
//! a direct table covering codes up to `DECODE_LOOKUP_SIZE` bits, with an
//! overflow region for longer codes reached through a pointer entry.

use crate::bitreader::BitReader;
use crate::constants::{DECODE_LOOKUP_SIZE, MAX_HUFF_TREE_DEPTH, SMALL_TABLE_SIZE};
use crate::InflateError;

const ENTRY_LONG_FLAG: u16 = 0x8000;
const ENTRY_SYMBOL_MASK: u16 = 0x1FF;
const ENTRY_LENGTH_SHIFT: u32 = 9;

/// A single symbol's code length (in bits) and, once assigned, its
/// bit-reversed canonical codeword.
#[derive(Clone, Copy, Default)]
pub struct HuffCode {
    pub length: u8,
    pub code: u16,
}

/// A decoded two-level Huffman lookup table. The short table resolves every
/// code of at most `DECODE_LOOKUP_SIZE` bits directly; longer codes are
/// grouped by their shared low bits into a region of `long_code_lookup`.
pub struct HuffmanTable {
    small_code_lookup: [u16; SMALL_TABLE_SIZE],
    long_code_lookup: Vec<u16>,
}

impl Default for HuffmanTable {
    fn default() -> Self {
        Self {
            small_code_lookup: [0; SMALL_TABLE_SIZE],
            long_code_lookup: Vec::new(),
        }
    }
}

#[inline(always)]
fn terminal_entry(symbol: u16, length: u8) -> u16 {
    symbol | ((length as u16) << ENTRY_LENGTH_SHIFT)
}

#[inline(always)]
fn pointer_entry(offset: u16, max_length: u8) -> u16 {
    offset | ((max_length as u16) << ENTRY_LENGTH_SHIFT) | ENTRY_LONG_FLAG
}

#[inline(always)]
fn bit_reverse(code: u16, length: u8) -> u16 {
    let mut bits = code;
    bits = ((bits >> 1) & 0x5555) | ((bits & 0x5555) << 1);
    bits = ((bits >> 2) & 0x3333) | ((bits & 0x3333) << 2);
    bits = ((bits >> 4) & 0x0F0F) | ((bits & 0x0F0F) << 4);
    bits = ((bits >> 8) & 0x00FF) | ((bits & 0x00FF) << 8);
    bits >> (16 - length as u32)
}

/// Histogram of code lengths, `counts[len]` = number of symbols with that
/// length. Zero-length ("unused") symbols are not counted: they occupy no
/// codespace and must not feed the canonical code recurrence.
pub fn histogram(codes: &[HuffCode]) -> [u16; MAX_HUFF_TREE_DEPTH + 1] {
    let mut counts = [0u16; MAX_HUFF_TREE_DEPTH + 1];
    for c in codes {
        if c.length != 0 {
            counts[c.length as usize] += 1;
        }
    }
    counts
}

/// Assigns canonical codes to every symbol in `codes` with non-zero length,
/// then builds `table` from them. `counts` must be the histogram of
/// `codes`' lengths (see `histogram`).
pub fn build(table: &mut HuffmanTable, codes: &mut [HuffCode], counts: &[u16; MAX_HUFF_TREE_DEPTH + 1]) {
    let mut next_code = [0u16; MAX_HUFF_TREE_DEPTH + 1];
    next_code[1] = 0;
    for len in 2..=MAX_HUFF_TREE_DEPTH {
        next_code[len] = (next_code[len - 1] + counts[len - 1]) << 1;
    }

    let mut long_syms: Vec<usize> = Vec::new();

    for i in 0..codes.len() {
        let len = codes[i].length;
        if len == 0 {
            continue;
        }
        let len = len as usize;
        codes[i].code = bit_reverse(next_code[len], codes[i].length);
        next_code[len] += 1;

        if len <= DECODE_LOOKUP_SIZE {
            let step = 1usize << len;
            let reps = 1usize << (DECODE_LOOKUP_SIZE - len);
            let mut slot = codes[i].code as usize;
            for _ in 0..reps {
                table.small_code_lookup[slot] = terminal_entry(i as u16, codes[i].length);
                slot += step;
            }
        } else {
            long_syms.push(i);
        }
    }

    table.long_code_lookup.clear();
    for pos in 0..long_syms.len() {
        let i = long_syms[pos];
        if codes[i].code == 0xFFFF {
            continue; // already folded into an earlier group
        }
        let first_bits = (codes[i].code as usize) & (SMALL_TABLE_SIZE - 1);
        let mut max_length = codes[i].length;
        let mut group = [i].to_vec();
        for &j in &long_syms[pos + 1..] {
            if codes[j].code != 0xFFFF
                && (codes[j].code as usize) & (SMALL_TABLE_SIZE - 1) == first_bits
            {
                max_length = max_length.max(codes[j].length);
                group.push(j);
            }
        }

        let region_offset = table.long_code_lookup.len();
        let region_size = 1usize << (max_length as usize - DECODE_LOOKUP_SIZE);
        table
            .long_code_lookup
            .resize(region_offset + region_size, 0);

        for &member in &group {
            let len = codes[member].length;
            let stride = 1usize << (len as usize - DECODE_LOOKUP_SIZE);
            let entry = terminal_entry(member as u16, len);
            let mut long_bits = (codes[member].code as usize) >> DECODE_LOOKUP_SIZE;
            while long_bits < region_size {
                table.long_code_lookup[region_offset + long_bits] = entry;
                long_bits += stride;
            }
            codes[member].code = 0xFFFF;
        }

        table.small_code_lookup[first_bits] = pointer_entry(region_offset as u16, max_length);
    }
}

/// Decodes one symbol from `reader` using `table`, consuming exactly as many
/// bits as the matched codeword's length. Returns `InvalidSymbol` for a
/// terminal entry of length zero (an incomplete or empty code was fed a bit
/// pattern that resolves nowhere).
#[inline(always)]
pub fn decode_next(table: &HuffmanTable, reader: &mut BitReader) -> Result<u16, InflateError> {
    if reader.bits_left() <= crate::constants::DEFLATE_CODE_MAX_LENGTH as i32 {
        reader.force_refill();
    }

    let next_bits = reader.peek_bits(DECODE_LOOKUP_SIZE as u32);
    let entry = table.small_code_lookup[next_bits as usize];

    let (symbol, length) = if entry & ENTRY_LONG_FLAG == 0 {
        (entry & ENTRY_SYMBOL_MASK, (entry >> ENTRY_LENGTH_SHIFT) as u8)
    } else {
        let max_length = ((entry & !ENTRY_LONG_FLAG) >> ENTRY_LENGTH_SHIFT) as u32;
        let masked = reader.peek_bits(max_length);
        let long_index = (entry & ENTRY_SYMBOL_MASK) as usize
            + (masked as usize >> DECODE_LOOKUP_SIZE);
        let long_entry = table.long_code_lookup[long_index];
        (
            long_entry & ENTRY_SYMBOL_MASK,
            (long_entry >> ENTRY_LENGTH_SHIFT) as u8,
        )
    };

    if length == 0 {
        return Err(InflateError::InvalidSymbol);
    }

    reader.consume_bits(length as u32);
    if reader.underflowed() {
        return Err(InflateError::EndOfInput);
    }
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(lengths: &[u8]) -> Vec<HuffCode> {
        lengths
            .iter()
            .map(|&l| HuffCode {
                length: l,
                code: 0,
            })
            .collect()
    }

    #[test]
    fn single_symbol_three_bit_codes_round_trip() {
        // Symbols 0..3 all length 3, symbol 4 length 1: a small complete-ish
        // code used only to exercise the short table and bit-reversal.
        let mut codes = codes_of(&[3, 3, 3, 3, 1]);
        let counts = histogram(&codes);
        let mut table = HuffmanTable::default();
        build(&mut table, &mut codes, &counts);

        for (sym, c) in codes.iter().enumerate() {
            // Feed the codeword's bits (already bit-reversed for LSB-first
            // consumption) followed by padding, and confirm decode_next
            // recovers the original symbol and consumes the right length.
            let mut buf = [0u8; 4];
            buf[0] = c.code as u8;
            let mut reader = BitReader::new(&buf);
            let decoded = decode_next(&table, &mut reader).unwrap();
            assert_eq!(decoded as usize, sym);
        }
    }

    #[test]
    fn long_code_group_records_shared_first_bits_and_max_length() {
        // 20 symbols of equal length > DECODE_LOOKUP_SIZE: every codespace
        // slot below that length has zero count, so the canonical codes are
        // simply 0..20 in ascending order before bit-reversal.
        let length = (DECODE_LOOKUP_SIZE as u8) + 1;
        let lengths: Vec<u8> = (0..20).map(|_| length).collect();
        let mut codes = codes_of(&lengths);
        let counts = histogram(&codes);
        let mut table = HuffmanTable::default();
        build(&mut table, &mut codes, &counts);

        let has_pointer = table
            .small_code_lookup
            .iter()
            .any(|&e| e & ENTRY_LONG_FLAG != 0);
        assert!(has_pointer);

        for sym in 0..20u16 {
            let code = super::bit_reverse(sym, length);
            let mut buf = [0u8; 4];
            buf[0] = code as u8;
            buf[1] = (code >> 8) as u8;
            let mut reader = BitReader::new(&buf);
            let decoded = decode_next(&table, &mut reader).unwrap();
            assert_eq!(decoded, sym);
        }
    }
}
