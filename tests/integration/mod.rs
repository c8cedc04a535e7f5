//! Integration test framework for page compression
//!
//! Builds compressor/decompressor pairs that share one registry and one stats
//! instance, so each test observes only its own counters.

#![allow(dead_code)]

use pagecomp::common::test_utils::init_test_logging;
use pagecomp::common::{Error, Result};
use pagecomp::compression::codec::{CodecError, PageCodec};
use pagecomp::{
    Algorithm, CodecRegistry, CompressOptions, CompressionConfig, CompressionOutcome,
    CompressionStats, CorruptionPolicy, DecodeOutcome, PageCompressor, PageDecompressor,
    Tablespace,
};
use std::sync::Arc;

/// Compressor and decompressor wired to shared state
pub struct TestEnvironment {
    /// Codecs available to both sides
    pub registry: Arc<CodecRegistry>,
    /// Counters shared by both sides
    pub stats: Arc<CompressionStats>,
    /// Settings both sides were built with
    pub config: CompressionConfig,
    /// Write path
    pub compressor: PageCompressor,
    /// Read path
    pub decompressor: PageDecompressor,
}

impl TestEnvironment {
    /// Environment with the built-in codecs and the given algorithm
    pub fn new(algorithm: Algorithm) -> Result<Self> {
        let config = CompressionConfig::builder().algorithm(algorithm).build()?;
        Self::with_config(config)
    }

    /// Environment with the built-in codecs and explicit settings
    pub fn with_config(config: CompressionConfig) -> Result<Self> {
        Self::with_registry(Arc::new(CodecRegistry::builtin()), config)
    }

    /// Environment with a caller-built registry
    pub fn with_registry(registry: Arc<CodecRegistry>, config: CompressionConfig) -> Result<Self> {
        init_test_logging();

        let stats = Arc::new(CompressionStats::new());
        let compressor = PageCompressor::new(registry.clone(), config, stats.clone())?;
        let decompressor = PageDecompressor::new(registry.clone(), &config, stats.clone())?;

        Ok(Self {
            registry,
            stats,
            config,
            compressor,
            decompressor,
        })
    }

    /// Page size of this environment
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Compress `page` in place and return the outcome and physical length
    pub fn compress_in_place(
        &self,
        space: Option<&dyn Tablespace>,
        page: &mut [u8],
        options: &CompressOptions,
    ) -> Result<(CompressionOutcome, usize)> {
        let result = self.compressor.compress(space, page, None, options)?;
        Ok((result.outcome.clone(), result.len()))
    }

    /// Compress a copy of `page`, decompress it again and return the result
    pub fn roundtrip(&self, page: &[u8], options: &CompressOptions) -> Result<RoundTrip> {
        let mut physical = page.to_vec();
        let (outcome, physical_len) = self.compress_in_place(None, &mut physical, options)?;

        // What would land on disk: the written prefix, the rest of the frame stale
        let mut on_disk = vec![0xA5u8; self.page_size()];
        on_disk[..physical_len].copy_from_slice(&physical[..physical_len]);
        let image = on_disk[..physical_len].to_vec();

        let decoded = self.decompressor.decompress(
            None,
            &mut on_disk,
            self.page_size(),
            CorruptionPolicy::Report,
        )?;

        Ok(RoundTrip {
            outcome,
            physical_len,
            image,
            decoded,
            logical: on_disk,
        })
    }
}

/// Everything observed during one compress/decompress cycle
pub struct RoundTrip {
    /// Compressor outcome
    pub outcome: CompressionOutcome,
    /// Bytes the compressor asked to write
    pub physical_len: usize,
    /// The written bytes
    pub image: Vec<u8>,
    /// Decompressor outcome
    pub decoded: DecodeOutcome,
    /// Page after decompression
    pub logical: Vec<u8>,
}

/// Helper for testing error conditions
pub struct ErrorTester;

impl ErrorTester {
    /// Test that a function returns a specific error type
    pub fn assert_error_type<T: std::fmt::Debug, F>(func: F, expected_predicate: fn(&Error) -> bool)
    where
        F: FnOnce() -> Result<T>,
    {
        let result = func();
        assert!(result.is_err(), "Expected error, got {:?}", result);

        let error = result.unwrap_err();
        assert!(
            expected_predicate(&error),
            "Error type mismatch. Got: {:?}",
            error
        );
    }

    /// Test that a function returns a corruption error
    pub fn assert_corruption_error<T: std::fmt::Debug, F>(func: F)
    where
        F: FnOnce() -> Result<T>,
    {
        Self::assert_error_type(func, |e| e.is_corruption());
    }

    /// Test that a function returns an invalid input error
    pub fn assert_invalid_input<T: std::fmt::Debug, F>(func: F)
    where
        F: FnOnce() -> Result<T>,
    {
        Self::assert_error_type(func, |e| e.is_invalid_input());
    }
}

/// Byte-oriented run-length codec registered under the LZO id
///
/// Stands in for an externally linked codec. Output is `(run, byte)` pairs.
pub struct RunLengthCodec;

impl PageCodec for RunLengthCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lzo
    }

    fn max_compressed_len(&self, input_len: usize) -> usize {
        input_len * 2
    }

    fn compress(
        &self,
        input: &[u8],
        output: &mut [u8],
        _level: u32,
    ) -> std::result::Result<usize, CodecError> {
        let capacity = output.len();
        let mut written = 0;
        let mut rest = input;
        while let Some(&byte) = rest.first() {
            let run = rest.iter().take(255).take_while(|&&b| b == byte).count();
            let dst = output
                .get_mut(written..written + 2)
                .ok_or_else(|| CodecError::output_too_small(Algorithm::Lzo, capacity))?;
            dst[0] = u8::try_from(run).unwrap_or(u8::MAX);
            dst[1] = byte;
            written += 2;
            rest = &rest[run..];
        }
        Ok(written)
    }

    fn decompress(
        &self,
        input: &[u8],
        output: &mut [u8],
    ) -> std::result::Result<usize, CodecError> {
        if input.len() % 2 != 0 {
            return Err(CodecError::corrupt_input(Algorithm::Lzo, "odd stream length"));
        }
        let capacity = output.len();
        let mut written = 0;
        for pair in input.chunks_exact(2) {
            let run = usize::from(pair[0]);
            let dst = output
                .get_mut(written..written + run)
                .ok_or_else(|| CodecError::output_too_small(Algorithm::Lzo, capacity))?;
            dst.fill(pair[1]);
            written += run;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation() {
        let env = TestEnvironment::new(Algorithm::Zlib).expect("Should create test environment");
        assert_eq!(env.page_size(), 16384);
        assert_eq!(env.compressor.config().algorithm, Algorithm::Zlib);
        assert!(env.registry.contains(Algorithm::Zlib));
    }

    #[test]
    fn test_run_length_codec() {
        let input = [7u8, 7, 7, 1, 0, 0];
        let mut packed = [0u8; 12];
        let n = RunLengthCodec.compress(&input, &mut packed, 0).unwrap();
        assert_eq!(&packed[..n], &[3, 7, 1, 1, 2, 0]);

        let mut unpacked = [0u8; 6];
        assert_eq!(RunLengthCodec.decompress(&packed[..n], &mut unpacked).unwrap(), 6);
        assert_eq!(unpacked, input);
    }

    #[test]
    fn test_run_length_codec_short_output() {
        let mut packed = [0u8; 3];
        let err = RunLengthCodec.compress(&[1, 2], &mut packed, 0).unwrap_err();
        assert_eq!(err, CodecError::output_too_small(Algorithm::Lzo, 3));

        let mut unpacked = [0u8; 2];
        let err = RunLengthCodec.decompress(&[5, 9], &mut unpacked).unwrap_err();
        assert_eq!(err, CodecError::output_too_small(Algorithm::Lzo, 2));
    }

    #[test]
    fn test_error_tester() {
        ErrorTester::assert_corruption_error(|| -> Result<()> {
            Err(Error::corruption(pagecomp::common::PageCorruption {
                space_id: 1,
                space_name: None,
                algorithm_id: 1,
                claimed_size: 0,
                actual_size: 0,
                kind: pagecomp::common::CorruptionKind::PayloadLengthOutOfRange,
            }))
        });

        ErrorTester::assert_invalid_input(|| -> Result<()> {
            Err(Error::invalid_input("zero length"))
        });
    }
}
