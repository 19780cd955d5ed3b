//! Block header parsing: dispatch on `btype`, fixed-Huffman code length
//! synthesis, and the dynamic-header meta-Huffman / run-length decode.

use crate::constants::{
    CODE_LENGTH_CODE_ORDER, CODE_LEN_CODES, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN,
    DEFLATE_BLOCKTYPE_STATIC_HUFFMAN, DEFLATE_BLOCKTYPE_STORED, DIST_LEN, LIT_LEN,
};
use crate::huffman::{self, HuffCode, HuffmanTable};
use crate::state::InflateState;
use crate::InflateError;

pub fn read_header(state: &mut InflateState) -> Result<(), InflateError> {
    state.new_block = false;

    state.bfinal = state.reader.read_bits(1) != 0;
    state.btype = state.reader.read_bits(2) as u8;
    if state.reader.underflowed() {
        return Err(InflateError::EndOfInput);
    }

    match state.btype as u32 {
        DEFLATE_BLOCKTYPE_STORED => {
            state.reader.rewind_to_byte_boundary();
            Ok(())
        }
        DEFLATE_BLOCKTYPE_STATIC_HUFFMAN => setup_static_header(state),
        DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => setup_dynamic_header(state),
        _ => Err(InflateError::InvalidBlockHeader),
    }
}

/// Canonical code lengths for the fixed Huffman code, RFC 1951 section 3.2.6.
fn setup_static_header(state: &mut InflateState) -> Result<(), InflateError> {
    let mut lit_codes = [HuffCode::default(); LIT_LEN + 2];
    let mut dist_codes = [HuffCode::default(); DIST_LEN + 2];

    for c in &mut lit_codes[0..144] {
        c.length = 8;
    }
    for c in &mut lit_codes[144..256] {
        c.length = 9;
    }
    for c in &mut lit_codes[256..280] {
        c.length = 7;
    }
    for c in &mut lit_codes[280..LIT_LEN + 2] {
        c.length = 8;
    }
    for c in &mut dist_codes[0..DIST_LEN + 2] {
        c.length = 5;
    }

    let lit_counts = huffman::histogram(&lit_codes);
    let dist_counts = huffman::histogram(&dist_codes);
    huffman::build(&mut state.lit_huff_code, &mut lit_codes, &lit_counts);
    huffman::build(&mut state.dist_huff_code, &mut dist_codes, &dist_counts);
    Ok(())
}

/// Reads HLIT/HDIST/HCLEN, the 19-entry code-length code, then run-length
/// decodes the combined literal/length + distance code-length sequence and
/// builds both Huffman tables from it.
fn setup_dynamic_header(state: &mut InflateState) -> Result<(), InflateError> {
    let hlit = state.reader.read_bits(5) as usize + 257;
    let hdist = state.reader.read_bits(5) as usize + 1;
    let hclen = state.reader.read_bits(4) as usize + 4;
    if state.reader.underflowed() {
        return Err(InflateError::EndOfInput);
    }

    let mut precode_codes = [HuffCode::default(); CODE_LEN_CODES];
    for i in 0..hclen {
        let length = state.reader.read_bits(3) as u8;
        precode_codes[CODE_LENGTH_CODE_ORDER[i] as usize].length = length;
    }
    if state.reader.underflowed() {
        return Err(InflateError::EndOfInput);
    }

    let precode_counts = huffman::histogram(&precode_codes);
    let mut precode_table = HuffmanTable::default();
    huffman::build(&mut precode_table, &mut precode_codes, &precode_counts);

    let mut lens = [0u8; LIT_LEN + DIST_LEN];
    let mut lit_counts = [0u16; crate::constants::MAX_HUFF_TREE_DEPTH + 1];
    let mut dist_counts = [0u16; crate::constants::MAX_HUFF_TREE_DEPTH + 1];

    let end = LIT_LEN + hdist;
    let mut cursor = 0usize;
    let mut previous: Option<u8> = None;

    // Writes `value` at the current cursor, bumps the right histogram
    // (literal/length below LIT_LEN, distance at or above it), advances the
    // cursor, and jumps it to LIT_LEN if it just crossed the literal/length
    // boundary. Shared by the direct symbols 0..15 and every unit of a
    // 16/17/18 repeat so the boundary check is applied uniformly.
    fn place(
        cursor: &mut usize,
        lens: &mut [u8],
        lit_counts: &mut [u16],
        dist_counts: &mut [u16],
        hlit: usize,
        value: u8,
    ) {
        lens[*cursor] = value;
        if value != 0 {
            let counts = if *cursor < hlit {
                &mut *lit_counts
            } else {
                &mut *dist_counts
            };
            counts[value as usize] += 1;
        }
        *cursor += 1;
        if *cursor == hlit {
            *cursor = LIT_LEN;
        }
    }

    while cursor < end {
        let symbol = huffman::decode_next(&precode_table, &mut state.reader)?;
        match symbol {
            0..=15 => {
                place(
                    &mut cursor,
                    &mut lens,
                    &mut lit_counts,
                    &mut dist_counts,
                    hlit,
                    symbol as u8,
                );
                previous = Some(symbol as u8);
            }
            16 => {
                let rep_value = previous.ok_or(InflateError::InvalidBlockHeader)?;
                let rep_count = 3 + state.reader.read_bits(2) as usize;
                for _ in 0..rep_count {
                    if cursor >= end {
                        return Err(InflateError::InvalidBlockHeader);
                    }
                    place(
                        &mut cursor,
                        &mut lens,
                        &mut lit_counts,
                        &mut dist_counts,
                        hlit,
                        rep_value,
                    );
                }
                previous = Some(rep_value);
            }
            17 | 18 => {
                let rep_count = if symbol == 17 {
                    3 + state.reader.read_bits(3) as usize
                } else {
                    11 + state.reader.read_bits(7) as usize
                };
                for _ in 0..rep_count {
                    if cursor >= end {
                        return Err(InflateError::InvalidBlockHeader);
                    }
                    place(
                        &mut cursor,
                        &mut lens,
                        &mut lit_counts,
                        &mut dist_counts,
                        hlit,
                        0,
                    );
                }
                previous = Some(0);
            }
            _ => return Err(InflateError::InvalidBlockHeader),
        }

        if state.reader.underflowed() {
            return Err(InflateError::EndOfInput);
        }
    }

    let mut lit_codes: Vec<HuffCode> = lens[0..LIT_LEN]
        .iter()
        .map(|&l| HuffCode { length: l, code: 0 })
        .collect();
    let mut dist_codes: Vec<HuffCode> = lens[LIT_LEN..LIT_LEN + DIST_LEN]
        .iter()
        .map(|&l| HuffCode { length: l, code: 0 })
        .collect();

    huffman::build(&mut state.lit_huff_code, &mut lit_codes, &lit_counts);
    huffman::build(&mut state.dist_huff_code, &mut dist_codes, &dist_counts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitreader::BitReader;

    #[test]
    fn static_header_builds_tables_that_decode_the_end_of_block_symbol() {
        let data = [0u8; 4];
        let reader = BitReader::new(&data);
        let mut state = InflateState::from_parts(reader, &mut []);
        setup_static_header(&mut state).unwrap();
        // Symbol 256 (end-of-block) has fixed code length 7; its canonical
        // code (bit-reversed) is all-zero bits, matching our zeroed buffer.
        let sym = huffman::decode_next(&state.lit_huff_code, &mut state.reader).unwrap();
        assert_eq!(sym, 256);
    }
}
