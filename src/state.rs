//! `InflateState`: the single mutable object threaded through a decode, and
//! the `inflate_stateless` driver loop that walks blocks until the final one
//! is consumed.

use crate::bitreader::BitReader;
use crate::block;
use crate::constants::DEFLATE_BLOCKTYPE_STORED;
use crate::header;
use crate::huffman::HuffmanTable;
use crate::InflateError;

pub struct InflateState<'a> {
    pub(crate) reader: BitReader<'a>,
    output: &'a mut [u8],
    total_out: usize,

    pub(crate) lit_huff_code: HuffmanTable,
    pub(crate) dist_huff_code: HuffmanTable,

    pub(crate) btype: u8,
    pub(crate) bfinal: bool,
    pub(crate) new_block: bool,
}

impl<'a> InflateState<'a> {
    /// Zeros the bit buffer, marks the decoder as between blocks, and wires
    /// the input/output buffers. Re-initing and re-running on the same input
    /// reproduces the same output (no state survives from a prior call).
    pub fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            reader: BitReader::new(input),
            output,
            total_out: 0,
            lit_huff_code: HuffmanTable::default(),
            dist_huff_code: HuffmanTable::default(),
            btype: 0,
            bfinal: false,
            new_block: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(reader: BitReader<'a>, output: &'a mut [u8]) -> Self {
        Self {
            reader,
            output,
            total_out: 0,
            lit_huff_code: HuffmanTable::default(),
            dist_huff_code: HuffmanTable::default(),
            btype: 0,
            bfinal: false,
            new_block: true,
        }
    }

    #[inline(always)]
    pub fn avail_out(&self) -> usize {
        self.output.len() - self.total_out
    }

    #[inline(always)]
    pub fn avail_in(&self) -> usize {
        self.reader.avail_in()
    }

    #[inline(always)]
    pub fn total_out(&self) -> usize {
        self.total_out
    }

    #[inline(always)]
    pub(crate) fn write_byte(&mut self, b: u8) {
        self.output[self.total_out] = b;
        self.total_out += 1;
    }

    #[inline(always)]
    pub(crate) fn write_slice(&mut self, bytes: &[u8]) {
        let n = bytes.len();
        self.output[self.total_out..self.total_out + n].copy_from_slice(bytes);
        self.total_out += n;
    }

    /// Overlapping-aware back-copy: `distance` bytes before the output
    /// cursor, `length` bytes long. When `distance >= length` the source and
    /// destination ranges don't overlap and a block copy is correct; when
    /// `distance < length` each written byte can become a source for a
    /// later write in the same call, which `copy_within`/memmove does not
    /// reproduce, so that case is done byte by byte.
    #[inline(always)]
    pub(crate) fn back_copy(&mut self, distance: usize, length: usize) {
        let dst = self.total_out;
        let src = dst - distance;
        if distance >= length {
            self.output.copy_within(src..src + length, dst);
        } else {
            for i in 0..length {
                self.output[dst + i] = self.output[src + i];
            }
        }
        self.total_out += length;
    }
}

/// Runs blocks until the final block's end-of-block (or, for a stored
/// block, its full length) has been consumed. On success, rewinds the bit
/// reader so `avail_in`/consumed-byte accounting reflects only whole bytes
/// logically consumed.
pub fn inflate_stateless(state: &mut InflateState) -> Result<(), InflateError> {
    while !state.new_block || !state.bfinal {
        if state.new_block {
            header::read_header(state)?;
        }

        if state.btype as u32 == DEFLATE_BLOCKTYPE_STORED {
            block::decode_stored_block(state)?;
        } else {
            block::decode_huffman_block_body(state)?;
        }
    }

    state.reader.rewind_consumed_bits();
    Ok(())
}
