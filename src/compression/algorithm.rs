//! Compression algorithm identifiers
//!
//! The numeric ids are written into every compressed page. They are frozen: an
//! id is never renumbered and never reused for a different codec.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compression algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Algorithm {
    /// Pages are stored as-is
    None = 0,
    /// zlib wrapped deflate
    #[default]
    Zlib = 1,
    /// LZ4 block format
    Lz4 = 2,
    /// LZO1X
    Lzo = 3,
    /// LZMA in an xz container
    Lzma = 4,
    /// bzip2
    Bzip2 = 5,
    /// Snappy raw format
    Snappy = 6,
}

impl Algorithm {
    /// Every algorithm in id order
    pub const ALL: [Algorithm; 7] = [
        Algorithm::None,
        Algorithm::Zlib,
        Algorithm::Lz4,
        Algorithm::Lzo,
        Algorithm::Lzma,
        Algorithm::Bzip2,
        Algorithm::Snappy,
    ];

    /// On-disk id
    pub fn id(self) -> u64 {
        self as u64
    }

    /// On-disk id as stored in the 2 byte field of the encrypted header
    pub fn short_id(self) -> u16 {
        self as u16
    }

    /// Look up an algorithm by its on-disk id
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.id() == id)
    }

    /// Name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::None => "uncompressed",
            Algorithm::Zlib => "ZLIB",
            Algorithm::Lz4 => "LZ4",
            Algorithm::Lzo => "LZO",
            Algorithm::Lzma => "LZMA",
            Algorithm::Bzip2 => "BZIP2",
            Algorithm::Snappy => "SNAPPY",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Diagnostic name for any id read from disk
pub fn algorithm_name(id: u64) -> &'static str {
    Algorithm::from_id(id).map_or("NULL", Algorithm::name)
}
