//! A stateless RFC 1951 (DEFLATE) decompressor core: give it a compressed
//! input buffer and an output buffer, get back the inflated bytes or a
//! well-defined error. No gzip/zlib container parsing, no checksums, no
//! resumable streaming, no encoder -- those are external collaborators.

pub mod bitreader;
pub mod block;
pub mod constants;
pub mod header;
pub mod huffman;
pub mod state;

pub use state::InflateState;

#[macro_use]
extern crate static_assertions;

/// Bails out of the current function with `Err($err)` unless `$cond` holds.
#[macro_export]
macro_rules! safety_check {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

/// Result of a call to `inflate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    /// Ran out of input before a block's decode could complete.
    EndOfInput,
    /// A block header's `btype` field (or another header detail) was invalid.
    InvalidBlockHeader,
    /// A stored block's `LEN`/`NLEN` fields were not complements of each other.
    InvalidNonCompressedBlockLength,
    /// The output buffer is too small to hold the decompressed data.
    OutBufferOverflow,
    /// A back-reference's distance pointed before the start of the output.
    InvalidLookBackDistance,
    /// A Huffman code resolved to a symbol outside its alphabet, or an empty
    /// code was fed a bit pattern that resolves nowhere.
    InvalidSymbol,
}

/// Outcome of a successful `inflate()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateResult {
    pub total_out: usize,
    pub consumed_in: usize,
}

/// Decompresses one complete DEFLATE stream (RFC 1951) from `input` into
/// `output`, stopping after the final block. `output` must be large enough
/// to hold the decompressed data; a too-small buffer is reported as
/// `OutBufferOverflow`, not silently truncated.
pub fn inflate(input: &[u8], output: &mut [u8]) -> Result<InflateResult, InflateError> {
    let in_len = input.len();
    let mut state = InflateState::new(input, output);
    state::inflate_stateless(&mut state)?;
    Ok(InflateResult {
        total_out: state.total_out(),
        consumed_in: in_len - state.avail_in(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fixed_block() {
        // BFINAL=1, BTYPE=01 (fixed), immediately followed by the
        // end-of-block symbol (256, code 0000000).
        let input = [0x03, 0x00];
        let mut output = [0u8; 0];
        let result = inflate(&input, &mut output).unwrap();
        assert_eq!(result.total_out, 0);
    }

    #[test]
    fn stored_block_round_trip() {
        // BFINAL=1, BTYPE=00 (stored): header bits 0b001 then pad to a byte
        // boundary, LEN=5, NLEN=!5, then the literal bytes "hello".
        let mut input = vec![0x01, 0x05, 0x00, 0xFA, 0xFF];
        input.extend_from_slice(b"hello");
        let mut output = [0u8; 5];
        let result = inflate(&input, &mut output).unwrap();
        assert_eq!(result.total_out, 5);
        assert_eq!(&output, b"hello");
    }

    #[test]
    fn corrupt_stored_block_length_is_rejected() {
        let input = [0x01, 0x05, 0x00, 0x00, 0x00];
        let mut output = [0u8; 5];
        let err = inflate(&input, &mut output).unwrap_err();
        assert_eq!(err, InflateError::InvalidNonCompressedBlockLength);
    }

    #[test]
    fn out_buffer_overflow_reports_bytes_written_so_far() {
        let mut input = vec![0x01, 0x05, 0x00, 0xFA, 0xFF];
        input.extend_from_slice(b"hello");
        let mut output = [0u8; 3];
        let err = inflate(&input, &mut output).unwrap_err();
        assert_eq!(err, InflateError::OutBufferOverflow);
    }
}
