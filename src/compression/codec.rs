//! Codec capability shared by every compression primitive

use crate::compression::algorithm::Algorithm;
use thiserror::Error;

/// Output buffer ran out before the stream was complete
pub const ERR_OUTPUT_TOO_SMALL: i32 = -5;

/// Input is not a valid stream for this codec
pub const ERR_CORRUPT_INPUT: i32 = -3;

/// Codec could not be set up or failed internally
pub const ERR_INTERNAL: i32 = -2;

/// Error reported by a codec primitive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{algorithm} codec error {code}: {message}")]
pub struct CodecError {
    /// Codec that failed
    pub algorithm: Algorithm,
    /// Codec specific status code
    pub code: i32,
    /// Human readable detail
    pub message: String,
}

impl CodecError {
    /// Create a codec error
    pub fn new<S: Into<String>>(algorithm: Algorithm, code: i32, message: S) -> Self {
        Self {
            algorithm,
            code,
            message: message.into(),
        }
    }

    /// Output space was exhausted
    pub fn output_too_small(algorithm: Algorithm, available: usize) -> Self {
        Self::new(
            algorithm,
            ERR_OUTPUT_TOO_SMALL,
            format!("output buffer of {available} bytes too small"),
        )
    }

    /// Input could not be decoded
    pub fn corrupt_input<S: Into<String>>(algorithm: Algorithm, message: S) -> Self {
        Self::new(algorithm, ERR_CORRUPT_INPUT, message)
    }

    /// Codec failed internally
    pub fn internal<S: Into<String>>(algorithm: Algorithm, message: S) -> Self {
        Self::new(algorithm, ERR_INTERNAL, message)
    }
}

/// A compress/decompress primitive pair for one algorithm
///
/// Implementations write into caller-provided buffers and never allocate more
/// than a bounded scratch area, so the compressor controls page sized memory.
pub trait PageCodec: Send + Sync {
    /// Algorithm this codec implements
    fn algorithm(&self) -> Algorithm;

    /// Name used in diagnostics
    fn name(&self) -> &'static str {
        self.algorithm().name()
    }

    /// Worst-case output size for `input_len` bytes of input
    fn max_compressed_len(&self, input_len: usize) -> usize {
        input_len
    }

    /// Compress `input` into `output`, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// Returns a `CodecError` if the codec fails or `output` is too small
    fn compress(&self, input: &[u8], output: &mut [u8], level: u32) -> Result<usize, CodecError>;

    /// Decompress `input` into `output`, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// Returns a `CodecError` if `input` is not a valid stream or does not fit
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl PageCodec for Identity {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Lzo
        }

        fn compress(
            &self,
            input: &[u8],
            output: &mut [u8],
            _level: u32,
        ) -> Result<usize, CodecError> {
            let dst = output
                .get_mut(..input.len())
                .ok_or_else(|| CodecError::output_too_small(Algorithm::Lzo, input.len()))?;
            dst.copy_from_slice(input);
            Ok(input.len())
        }

        fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
            self.compress(input, output, 0)
        }
    }

    #[test]
    fn test_default_trait_methods() {
        let codec = Identity;
        assert_eq!(codec.name(), "LZO");
        assert_eq!(codec.max_compressed_len(100), 100);
    }

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::output_too_small(Algorithm::Snappy, 16);
        assert_eq!(err.code, ERR_OUTPUT_TOO_SMALL);
        assert_eq!(
            err.to_string(),
            "SNAPPY codec error -5: output buffer of 16 bytes too small"
        );
    }

    #[test]
    fn test_trait_object_dispatch() {
        let codec: Box<dyn PageCodec> = Box::new(Identity);
        let mut out = [0u8; 8];
        assert_eq!(codec.compress(b"abc", &mut out, 1), Ok(3));
        assert_eq!(&out[..3], b"abc");
        assert!(codec.compress(b"too long for it", &mut out, 1).is_err());
    }
}
