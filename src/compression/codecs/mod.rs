//! Built-in codecs
//!
//! Zlib is always compiled in. The others are behind cargo features of the same
//! name and only show up in [`builtin_codecs`] when linked.

use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};

#[cfg(feature = "bzip2")]
mod bzip2;
#[cfg(feature = "lz4")]
mod lz4;
#[cfg(feature = "lzma")]
mod lzma;
#[cfg(feature = "snappy")]
mod snappy;
mod zlib;

#[cfg(feature = "bzip2")]
pub use self::bzip2::Bzip2Codec;
#[cfg(feature = "lz4")]
pub use self::lz4::Lz4Codec;
#[cfg(feature = "lzma")]
pub use self::lzma::LzmaCodec;
#[cfg(feature = "snappy")]
pub use self::snappy::SnappyCodec;
pub use self::zlib::ZlibCodec;

/// Every codec compiled into this build
pub fn builtin_codecs() -> Vec<Box<dyn PageCodec>> {
    let mut codecs: Vec<Box<dyn PageCodec>> = vec![Box::new(ZlibCodec)];
    #[cfg(feature = "lz4")]
    codecs.push(Box::new(Lz4Codec));
    #[cfg(feature = "lzma")]
    codecs.push(Box::new(LzmaCodec));
    #[cfg(feature = "bzip2")]
    codecs.push(Box::new(Bzip2Codec));
    #[cfg(feature = "snappy")]
    codecs.push(Box::new(SnappyCodec));
    codecs
}

/// Run a codec that needs `bound` bytes of output even when the result is smaller
///
/// When `output` is shorter than `bound` the codec writes into a scratch buffer
/// and the result is copied over if it fits.
#[cfg(any(feature = "lz4", feature = "snappy"))]
pub(crate) fn compress_bounded<F>(
    algorithm: Algorithm,
    output: &mut [u8],
    bound: usize,
    compress: F,
) -> Result<usize, CodecError>
where
    F: FnOnce(&mut [u8]) -> Result<usize, CodecError>,
{
    if output.len() >= bound {
        return compress(output);
    }

    let mut scratch = vec![0u8; bound];
    let written = compress(&mut scratch)?;
    let dst = output
        .get_mut(..written)
        .ok_or_else(|| CodecError::output_too_small(algorithm, written))?;
    dst.copy_from_slice(&scratch[..written]);
    Ok(written)
}

/// Byte counter of a streaming codec as a buffer index
pub(crate) fn stream_pos(total: u64) -> usize {
    usize::try_from(total).unwrap_or(usize::MAX)
}

/// Counters reported by one step of a streaming codec
pub(crate) struct StreamProgress {
    pub finished: bool,
    pub total_in: u64,
    pub total_out: u64,
}

/// Error for a decoder that stopped before the end of its stream
pub(crate) fn stream_truncated(algorithm: Algorithm, available: usize) -> CodecError {
    CodecError::corrupt_input(
        algorithm,
        format!("stream truncated or larger than the {available} byte output buffer"),
    )
}

/// Feed a streaming codec until it reports the end of the stream
///
/// `step` gets the unconsumed input and the unused output and returns the
/// stream totals. A step that moves neither counter ends the loop with the
/// error built by `stalled`.
pub(crate) fn drive_stream<F>(
    algorithm: Algorithm,
    input: &[u8],
    output: &mut [u8],
    stalled: fn(Algorithm, usize) -> CodecError,
    mut step: F,
) -> Result<usize, CodecError>
where
    F: FnMut(&[u8], &mut [u8]) -> Result<StreamProgress, CodecError>,
{
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let progress = step(&input[consumed..], &mut output[written..])?;
        let now_in = stream_pos(progress.total_in);
        let now_out = stream_pos(progress.total_out);
        if progress.finished {
            return Ok(now_out);
        }
        if now_in == consumed && now_out == written {
            return Err(stalled(algorithm, output.len()));
        }
        consumed = now_in;
        written = now_out;
    }
}
