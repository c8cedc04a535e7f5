//! Configuration for the page compression layer
//!
//! The layer never reads configuration on its own. The embedding engine builds a
//! [`CompressionConfig`] from its settings and hands it to the compressor.

use crate::common::error::{Error, Result};
use crate::compression::algorithm::Algorithm;
use serde::{Deserialize, Serialize};

/// Default logical page size (16 KiB)
pub const DEFAULT_PAGE_SIZE: usize = 16 * 1024;

/// Smallest supported logical page size
pub const MIN_PAGE_SIZE: usize = 4 * 1024;

/// Largest supported logical page size
///
/// The payload length field is 16 bits wide, so a payload must stay below 64 KiB.
pub const MAX_PAGE_SIZE: usize = 64 * 1024;

/// Block size used when a caller passes zero
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Compression level used when a caller passes zero
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Process-wide compression settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Algorithm applied to eligible pages
    pub algorithm: Algorithm,
    /// Level used when a request does not carry its own
    pub default_level: u32,
    /// Write granularity of the storage device
    pub block_size: usize,
    /// Whether the unused tail of a compressed page may stay untouched on disk
    ///
    /// When false the tail is zeroed and the physical length reported is the
    /// full page size.
    pub use_trim: bool,
    /// Logical page size
    pub page_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Zlib,
            default_level: DEFAULT_COMPRESSION_LEVEL,
            block_size: DEFAULT_BLOCK_SIZE,
            use_trim: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CompressionConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> CompressionConfigBuilder {
        CompressionConfigBuilder::default()
    }

    /// Check that all values are in range
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first offending value
    pub fn validate(&self) -> Result<()> {
        if !self.page_size.is_power_of_two()
            || !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size)
        {
            return Err(Error::invalid_config(format!(
                "page size {} must be a power of two between {} and {}",
                self.page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE
            )));
        }
        if self.block_size > self.page_size {
            return Err(Error::invalid_config(format!(
                "block size {} exceeds page size {}",
                self.block_size, self.page_size
            )));
        }
        if self.default_level == 0 {
            return Err(Error::invalid_config("default compression level must be non-zero"));
        }
        Ok(())
    }

    /// Block size with the zero fallback applied
    pub fn effective_block_size(&self) -> usize {
        effective_block_size(self.block_size)
    }
}

/// Resolve a requested block size, mapping zero to [`DEFAULT_BLOCK_SIZE`]
pub fn effective_block_size(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_BLOCK_SIZE
    } else {
        requested
    }
}

/// Builder for [`CompressionConfig`]
#[derive(Debug, Clone, Default)]
pub struct CompressionConfigBuilder {
    config: CompressionConfig,
}

impl CompressionConfigBuilder {
    /// Set the algorithm
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the fallback level
    #[must_use]
    pub fn default_level(mut self, level: u32) -> Self {
        self.config.default_level = level;
        self
    }

    /// Set the device block size
    #[must_use]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Set the trim policy
    #[must_use]
    pub fn use_trim(mut self, use_trim: bool) -> Self {
        self.config.use_trim = use_trim;
        self
    }

    /// Set the logical page size
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Validate and return the configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a value is out of range
    pub fn build(self) -> Result<CompressionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressionConfig::default();
        assert_eq!(config.algorithm, Algorithm::Zlib);
        assert_eq!(config.default_level, 6);
        assert_eq!(config.block_size, 512);
        assert!(config.use_trim);
        assert_eq!(config.page_size, 16384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CompressionConfig::builder()
            .algorithm(Algorithm::Lz4)
            .default_level(1)
            .block_size(4096)
            .use_trim(false)
            .page_size(32 * 1024)
            .build()
            .unwrap();

        assert_eq!(config.algorithm, Algorithm::Lz4);
        assert_eq!(config.default_level, 1);
        assert_eq!(config.block_size, 4096);
        assert!(!config.use_trim);
        assert_eq!(config.page_size, 32 * 1024);
    }

    #[test]
    fn test_page_size_validation() {
        for bad in [0, 1000, 2048, 12 * 1024, 128 * 1024] {
            let result = CompressionConfig::builder().page_size(bad).build();
            assert!(matches!(result, Err(Error::InvalidConfig(_))), "{bad}");
        }
        for good in [4096, 8192, 16384, 32768, 65536] {
            assert!(CompressionConfig::builder().page_size(good).build().is_ok());
        }
    }

    #[test]
    fn test_block_size_validation() {
        let result = CompressionConfig::builder()
            .page_size(4096)
            .block_size(8192)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_default_level_rejected() {
        let result = CompressionConfig::builder().default_level(0).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_effective_block_size() {
        assert_eq!(effective_block_size(0), 512);
        assert_eq!(effective_block_size(1024), 1024);

        let config = CompressionConfig {
            block_size: 0,
            ..CompressionConfig::default()
        };
        assert_eq!(config.effective_block_size(), 512);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = CompressionConfig::builder()
            .algorithm(Algorithm::Snappy)
            .use_trim(false)
            .build()
            .unwrap();
        let bytes = bincode::serialize(&config).unwrap();
        let decoded: CompressionConfig = bincode::deserialize(&bytes).unwrap();
        assert_eq!(config, decoded);
    }
}
