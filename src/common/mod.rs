//! Common utilities, configuration and error handling

pub mod config;
pub mod error;
pub mod logging;

pub mod test_utils;

pub use config::CompressionConfig;
pub use error::{CorruptionKind, Error, PageCorruption, Result};
