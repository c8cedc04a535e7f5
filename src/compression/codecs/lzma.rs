//! LZMA codec backed by `xz2`

use super::{drive_stream, stream_truncated, StreamProgress};
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};
use xz2::stream::{Action, Check, Filters, LzmaOptions, Status, Stream};

/// Smallest dictionary liblzma accepts
const MIN_DICT_SIZE: u32 = 4096;

fn dict_size_for(input_len: usize) -> u32 {
    u32::try_from(input_len.next_power_of_two())
        .unwrap_or(u32::MAX)
        .max(MIN_DICT_SIZE)
}

/// `.xz` stream without integrity check, preset 0 to 9 with a page sized dictionary
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCodec;

impl PageCodec for LzmaCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lzma
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        input_len + input_len / 32 + 256
    }

    fn compress(&self, input: &[u8], output: &mut [u8], level: u32) -> Result<usize, CodecError> {
        let mut options = LzmaOptions::new_preset(level.min(9))
            .map_err(|e| CodecError::internal(Algorithm::Lzma, e.to_string()))?;
        // A page never needs a dictionary larger than itself
        options.dict_size(dict_size_for(input.len()));
        let mut filters = Filters::new();
        filters.lzma2(&options);
        let mut stream = Stream::new_stream_encoder(&filters, Check::None)
            .map_err(|e| CodecError::internal(Algorithm::Lzma, e.to_string()))?;
        drive_stream(
            Algorithm::Lzma,
            input,
            output,
            CodecError::output_too_small,
            |src, dst| {
                let status = stream
                    .process(src, dst, Action::Finish)
                    .map_err(|e| CodecError::internal(Algorithm::Lzma, e.to_string()))?;
                Ok(StreamProgress {
                    finished: matches!(status, Status::StreamEnd),
                    total_in: stream.total_in(),
                    total_out: stream.total_out(),
                })
            },
        )
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        let mut stream = Stream::new_stream_decoder(u64::MAX, 0)
            .map_err(|e| CodecError::internal(Algorithm::Lzma, e.to_string()))?;
        drive_stream(Algorithm::Lzma, input, output, stream_truncated, |src, dst| {
            let status = stream
                .process(src, dst, Action::Finish)
                .map_err(|e| CodecError::corrupt_input(Algorithm::Lzma, e.to_string()))?;
            Ok(StreamProgress {
                finished: matches!(status, Status::StreamEnd),
                total_in: stream.total_in(),
                total_out: stream.total_out(),
            })
        })
    }
}
