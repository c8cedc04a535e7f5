//! Error handling for the page compression layer

use crate::compression::algorithm::{algorithm_name, Algorithm};
use std::fmt;
use thiserror::Error;

/// Common result type for page compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for page compression operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller handed in a buffer or length that breaks the call contract
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Page type tag is not one of the known page types
    #[error("Invalid page type: {0}")]
    InvalidPageType(u16),
    /// Algorithm id is not part of the on-disk numbering
    #[error("Unknown compression algorithm id {0}")]
    UnknownAlgorithm(u64),
    /// Algorithm id is known but no codec for it is linked into this build
    #[error("Compression algorithm {0} is not available")]
    CodecUnavailable(Algorithm),
    /// A codec for this algorithm was already registered
    #[error("Codec for {0} registered twice")]
    DuplicateCodec(Algorithm),
    /// A compressed page failed validation or decoding
    #[error("Page corruption: {0}")]
    Corruption(Box<PageCorruption>),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Wrap a corruption report
    pub fn corruption(report: PageCorruption) -> Self {
        Error::Corruption(Box::new(report))
    }

    /// Check if this is a corruption error
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// Corruption details, if this is a corruption error
    pub fn corruption_report(&self) -> Option<&PageCorruption> {
        match self {
            Error::Corruption(report) => Some(report),
            _ => None,
        }
    }

    /// Check if the caller can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidInput(_)
            | Error::InvalidConfig(_)
            | Error::InvalidPageType(_)
            | Error::UnknownAlgorithm(_)
            | Error::CodecUnavailable(_)
            | Error::DuplicateCodec(_) => true,
            Error::Corruption(_) => false,
        }
    }
}

/// What exactly was wrong with a compressed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptionKind {
    /// Checksum slot does not hold the compressed-page marker
    BadIntegrityMarker {
        /// Value found in the checksum slot
        found: u32,
    },
    /// Stored payload length is zero or larger than the page
    PayloadLengthOutOfRange,
    /// Stored algorithm id has no codec
    UnknownAlgorithm,
    /// Codec rejected the payload
    DecodeFailed {
        /// Codec specific error code
        code: i32,
        /// Codec message
        message: String,
    },
    /// Codec produced a different number of bytes than a page holds
    LengthMismatch {
        /// Logical length the caller expects
        expected: usize,
    },
}

impl fmt::Display for CorruptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptionKind::BadIntegrityMarker { found } => {
                write!(f, "bad integrity marker 0x{found:08X}")
            }
            CorruptionKind::PayloadLengthOutOfRange => write!(f, "payload length out of range"),
            CorruptionKind::UnknownAlgorithm => write!(f, "unknown compression algorithm"),
            CorruptionKind::DecodeFailed { code, message } => {
                write!(f, "decompression failed with error {code} ({message})")
            }
            CorruptionKind::LengthMismatch { expected } => {
                write!(f, "decompressed length differs from expected {expected}")
            }
        }
    }
}

/// Context of a compressed page that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCorruption {
    /// Tablespace id read from the page frame
    pub space_id: u32,
    /// Tablespace name, when the caller could supply one
    pub space_name: Option<String>,
    /// Algorithm id claimed by the header
    pub algorithm_id: u64,
    /// Payload length claimed by the header
    pub claimed_size: usize,
    /// Bytes actually produced, or the buffer length when decoding never ran
    pub actual_size: usize,
    /// Failure classification
    pub kind: CorruptionKind,
}

impl PageCorruption {
    /// Diagnostic name of the claimed algorithm
    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm_id)
    }
}

impl fmt::Display for PageCorruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "space {} name {} compression method {} (id {}) size {} len {}: {}",
            self.space_id,
            self.space_name.as_deref().unwrap_or("NULL"),
            self.algorithm_name(),
            self.algorithm_id,
            self.claimed_size,
            self.actual_size,
            self.kind
        )
    }
}
