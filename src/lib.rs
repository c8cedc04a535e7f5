//! pagecomp - page compression envelope for tablespace pages
//!
//! Turns a fixed-size logical page into a smaller, self-describing physical
//! page and back:
//! - pluggable codecs behind the [`PageCodec`] trait, looked up by a frozen
//!   on-disk algorithm id in a [`CodecRegistry`]
//! - a compressed page header with a plain and an encrypted variant
//! - block-aligned, zero-padded physical images
//! - best-effort compression that falls back to the original page
//! - corruption detection on decode with a report or fatal policy
//!
//! ```no_run
//! use pagecomp::{
//!     CodecRegistry, CompressOptions, CompressionConfig, CompressionStats, CorruptionPolicy,
//!     PageCompressor, PageDecompressor,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> pagecomp::Result<()> {
//! let registry = Arc::new(CodecRegistry::builtin());
//! let stats = Arc::new(CompressionStats::new());
//! let config = CompressionConfig::default();
//!
//! let compressor = PageCompressor::new(registry.clone(), config, stats.clone())?;
//! let decompressor = PageDecompressor::new(registry, &config, stats)?;
//!
//! let mut page = vec![0u8; config.page_size];
//! page[24..26].copy_from_slice(&17855u16.to_be_bytes());
//! let written = compressor.compress(None, &mut page, None, &CompressOptions::default())?;
//! assert!(written.len() < config.page_size);
//!
//! decompressor.decompress(None, &mut page, config.page_size, CorruptionPolicy::Report)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// Core modules
pub mod common;
pub mod compression;
pub mod storage;

// Re-exports for convenience
pub use common::{CompressionConfig, Error, Result};
pub use compression::{
    Algorithm, CodecRegistry, CompressOptions, CompressionOutcome, CompressionStats,
    CorruptionPolicy, DecodeOutcome, PageCodec, PageCompressor, PageDecompressor, SpaceInfo,
    Tablespace,
};

/// Version information
pub const VERSION_MAJOR: u32 = 0;
/// Version information
pub const VERSION_MINOR: u32 = 1;
/// Version information
pub const VERSION_PATCH: u32 = 0;
/// Version string
pub const VERSION: &str = "0.1.0";
