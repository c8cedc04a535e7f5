//! bzip2 codec backed by the `bzip2` crate

use super::{drive_stream, stream_truncated, StreamProgress};
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};
use bzip2::{Action, Compress, Compression, Decompress, Status};

/// Block size used for every page; pages are far below 100 KB
const BLOCK_SIZE_100K: u32 = 1;

/// bzip2 with a 100 KB block and default work factor; the level is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct Bzip2Codec;

impl PageCodec for Bzip2Codec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bzip2
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        input_len + input_len / 100 + 600
    }

    fn compress(&self, input: &[u8], output: &mut [u8], _level: u32) -> Result<usize, CodecError> {
        let mut stream = Compress::new(Compression::new(BLOCK_SIZE_100K), 0);
        drive_stream(
            Algorithm::Bzip2,
            input,
            output,
            CodecError::output_too_small,
            |src, dst| {
                let status = stream
                    .compress(src, dst, Action::Finish)
                    .map_err(|e| CodecError::internal(Algorithm::Bzip2, e.to_string()))?;
                Ok(StreamProgress {
                    finished: matches!(status, Status::StreamEnd),
                    total_in: stream.total_in(),
                    total_out: stream.total_out(),
                })
            },
        )
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        let mut stream = Decompress::new(false);
        drive_stream(Algorithm::Bzip2, input, output, stream_truncated, |src, dst| {
            let status = stream
                .decompress(src, dst)
                .map_err(|e| CodecError::corrupt_input(Algorithm::Bzip2, e.to_string()))?;
            Ok(StreamProgress {
                finished: matches!(status, Status::StreamEnd),
                total_in: stream.total_in(),
                total_out: stream.total_out(),
            })
        })
    }
}
