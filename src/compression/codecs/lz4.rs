//! LZ4 block codec backed by `lz4_flex`

use super::compress_bounded;
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec, ERR_OUTPUT_TOO_SMALL};
use lz4_flex::block;

/// LZ4 block format without a size prefix; the level is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl PageCodec for Lz4Codec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lz4
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        block::get_maximum_output_size(input_len)
    }

    fn compress(&self, input: &[u8], output: &mut [u8], _level: u32) -> Result<usize, CodecError> {
        let bound = self.max_compressed_len(input.len());
        compress_bounded(Algorithm::Lz4, output, bound, |dst| {
            block::compress_into(input, dst)
                .map_err(|e| CodecError::new(Algorithm::Lz4, ERR_OUTPUT_TOO_SMALL, e.to_string()))
        })
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        block::decompress_into(input, output)
            .map_err(|e| CodecError::corrupt_input(Algorithm::Lz4, e.to_string()))
    }
}
