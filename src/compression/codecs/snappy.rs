//! Snappy raw codec backed by `snap`

use super::compress_bounded;
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};
use snap::raw::{max_compress_len, Decoder, Encoder};

/// Snappy raw format; the level is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyCodec;

impl PageCodec for SnappyCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Snappy
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        max_compress_len(input_len)
    }

    fn compress(&self, input: &[u8], output: &mut [u8], _level: u32) -> Result<usize, CodecError> {
        let bound = self.max_compressed_len(input.len());
        if bound == 0 {
            return Err(CodecError::internal(Algorithm::Snappy, "input too large"));
        }
        compress_bounded(Algorithm::Snappy, output, bound, |dst| {
            Encoder::new()
                .compress(input, dst)
                .map_err(|e| CodecError::internal(Algorithm::Snappy, e.to_string()))
        })
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        Decoder::new()
            .decompress(input, output)
            .map_err(|e| CodecError::corrupt_input(Algorithm::Snappy, e.to_string()))
    }
}
