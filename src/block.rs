//! Block body decoding: the stored-block byte copier and the Huffman
//! literal/length/distance symbol loop with overlap-aware back-copy.

use nightly_quirks::branch_pred::{likely, unlikely};

use crate::constants::{DIST_EXTRA_BIT_COUNT, DIST_START, LEN_EXTRA_BIT_COUNT, LEN_START};
use crate::huffman::decode_next;
use crate::state::InflateState;
use crate::{safety_check, InflateError};

pub fn decode_stored_block(state: &mut InflateState) -> Result<(), InflateError> {
    if state.avail_in() < 4 {
        return Err(InflateError::EndOfInput);
    }
    let len = state
        .reader
        .read_raw_u16_le()
        .ok_or(InflateError::EndOfInput)?;
    let nlen = state
        .reader
        .read_raw_u16_le()
        .ok_or(InflateError::EndOfInput)?;
    if len != !nlen {
        return Err(InflateError::InvalidNonCompressedBlockLength);
    }

    if state.avail_out() < len as usize {
        return Err(InflateError::OutBufferOverflow);
    }

    let requested = len as usize;
    let copy_len = requested.min(state.avail_in());
    state.new_block = copy_len == requested;

    let copied = state.reader.take_raw(copy_len);
    state.write_slice(copied);

    if !state.new_block {
        return Err(InflateError::EndOfInput);
    }
    Ok(())
}

pub fn decode_huffman_block_body(state: &mut InflateState) -> Result<(), InflateError> {
    while !state.new_block {
        let sym = decode_next(&state.lit_huff_code, &mut state.reader)?;

        if likely(sym < 256) {
            if unlikely(state.avail_out() < 1) {
                return Err(InflateError::OutBufferOverflow);
            }
            state.write_byte(sym as u8);
        } else if unlikely(sym == 256) {
            state.new_block = true;
        } else if likely(sym < 286) {
            let len_idx = (sym - 257) as usize;
            safety_check!(len_idx < LEN_START.len(), InflateError::InvalidSymbol);
            let length = LEN_START[len_idx] as usize
                + state.reader.read_bits(LEN_EXTRA_BIT_COUNT[len_idx] as u32) as usize;

            if unlikely(state.avail_out() < length) {
                return Err(InflateError::OutBufferOverflow);
            }

            let dsym = decode_next(&state.dist_huff_code, &mut state.reader)?;
            safety_check!((dsym as usize) < DIST_START.len(), InflateError::InvalidSymbol);
            let distance = DIST_START[dsym as usize] as usize
                + state.reader.read_bits(DIST_EXTRA_BIT_COUNT[dsym as usize] as u32) as usize;

            if unlikely(state.reader.underflowed()) {
                return Err(InflateError::EndOfInput);
            }
            if unlikely(distance > state.total_out()) {
                return Err(InflateError::InvalidLookBackDistance);
            }

            state.back_copy(distance, length);
        } else {
            return Err(InflateError::InvalidSymbol);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitreader::BitReader;

    #[test]
    fn stored_block_zero_length_is_a_no_op() {
        let buf = vec![0x00, 0x00, 0xFF, 0xFF];
        let reader = BitReader::new(&buf);
        let mut out = [0u8; 0];
        let mut state = InflateState::from_parts(reader, &mut out);
        decode_stored_block(&mut state).unwrap();
        assert_eq!(state.total_out(), 0);
        assert!(state.new_block);
    }

    #[test]
    fn stored_block_copies_bytes() {
        // len=5, nlen=!5, then "hello"
        let mut buf = vec![0x05, 0x00, 0xFA, 0xFF];
        buf.extend_from_slice(b"hello");
        let reader = BitReader::new(&buf);
        let mut out = [0u8; 16];
        let mut state = InflateState::from_parts(reader, &mut out);
        decode_stored_block(&mut state).unwrap();
        assert_eq!(state.total_out(), 5);
        assert_eq!(&out[..5], b"hello");
    }

    #[test]
    fn stored_block_rejects_mismatched_length() {
        let buf = vec![0x05, 0x00, 0x00, 0x00];
        let reader = BitReader::new(&buf);
        let mut out = [0u8; 16];
        let mut state = InflateState::from_parts(reader, &mut out);
        let err = decode_stored_block(&mut state).unwrap_err();
        assert_eq!(err, InflateError::InvalidNonCompressedBlockLength);
    }

    #[test]
    fn back_copy_with_distance_one_replicates_last_byte() {
        let reader = BitReader::new(&[]);
        let mut out = [b'a', 0, 0, 0, 0];
        let mut state = InflateState::from_parts(reader, &mut out);
        state.write_byte(b'a');
        // Overwrite: we already wrote index 0; pretend total_out is 1 and
        // back-copy 4 more bytes at distance 1.
        state.back_copy(1, 4);
        assert_eq!(&out, b"aaaaa");
    }
}
