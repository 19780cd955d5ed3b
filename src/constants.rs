//! RFC 1951 alphabet sizes and the fixed tables the format defines.

use static_assertions::const_assert;

/// Bit-width of the direct ("short") Huffman lookup table. Codes up to this
/// length resolve in a single table access; longer codes fall through to a
/// `long_code_lookup` region.
pub const DECODE_LOOKUP_SIZE: usize = 9;
pub const SMALL_TABLE_SIZE: usize = 1 << DECODE_LOOKUP_SIZE;

/// DEFLATE never uses a codeword longer than this.
pub const MAX_HUFF_TREE_DEPTH: usize = 15;
pub const DEFLATE_CODE_MAX_LENGTH: usize = MAX_HUFF_TREE_DEPTH;

/// Literal/length alphabet size (literals 0-255, end-of-block 256, length
/// codes 257-285; two trailing slots are never assigned a codeword but
/// builders are allowed to see them with length 0).
pub const LIT_LEN: usize = 286;
/// Distance alphabet size.
pub const DIST_LEN: usize = 30;
/// Size of the meta-Huffman alphabet used to compress the code-length
/// sequence in a dynamic block header.
pub const CODE_LEN_CODES: usize = 19;

const_assert!(DECODE_LOOKUP_SIZE < MAX_HUFF_TREE_DEPTH);
const_assert!(LIT_LEN <= SMALL_TABLE_SIZE);
const_assert!(DIST_LEN <= SMALL_TABLE_SIZE);

pub const DEFLATE_BLOCKTYPE_STORED: u32 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC_HUFFMAN: u32 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u32 = 2;

/// The order in which code-length-code lengths are transmitted in a dynamic
/// header; RFC 1951 section 3.2.7.
pub const CODE_LENGTH_CODE_ORDER: [u8; CODE_LEN_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Base length and extra-bit count for length symbols 257..285 (index = symbol - 257).
pub const LEN_START: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
pub const LEN_EXTRA_BIT_COUNT: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distance and extra-bit count for the 30 distance symbols.
pub const DIST_START: [u32; DIST_LEN] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
pub const DIST_EXTRA_BIT_COUNT: [u8; DIST_LEN] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

const_assert!(LEN_START.len() == LEN_EXTRA_BIT_COUNT.len());
const_assert!(DIST_START.len() == DIST_EXTRA_BIT_COUNT.len());
