//! zlib codec backed by `flate2`

use super::{drive_stream, stream_truncated, StreamProgress};
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// zlib wrapped deflate, levels 1 to 9
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibCodec;

impl PageCodec for ZlibCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Zlib
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        // compressBound() plus room for stored-block framing
        input_len + (input_len >> 12) + (input_len >> 14) + (input_len >> 25) + 13 + 64
    }

    fn compress(&self, input: &[u8], output: &mut [u8], level: u32) -> Result<usize, CodecError> {
        let mut stream = Compress::new(Compression::new(level.clamp(1, 9)), true);
        drive_stream(
            Algorithm::Zlib,
            input,
            output,
            CodecError::output_too_small,
            |src, dst| {
                let status = stream
                    .compress(src, dst, FlushCompress::Finish)
                    .map_err(|e| CodecError::internal(Algorithm::Zlib, e.to_string()))?;
                Ok(StreamProgress {
                    finished: matches!(status, Status::StreamEnd),
                    total_in: stream.total_in(),
                    total_out: stream.total_out(),
                })
            },
        )
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        let mut stream = Decompress::new(true);
        drive_stream(Algorithm::Zlib, input, output, stream_truncated, |src, dst| {
            let status = stream
                .decompress(src, dst, FlushDecompress::Finish)
                .map_err(|e| CodecError::corrupt_input(Algorithm::Zlib, e.to_string()))?;
            Ok(StreamProgress {
                finished: matches!(status, Status::StreamEnd),
                total_in: stream.total_in(),
                total_out: stream.total_out(),
            })
        })
    }
}
