//! Compression counters and warning suppression
//!
//! One [`CompressionStats`] is shared by the compressor and decompressor of an
//! engine instance. Tests build their own instance so counts never leak between
//! cases.
//!
//! # Memory Ordering
//! Counters use `Ordering::Relaxed`: each one only needs atomic increments and
//! readers accept a snapshot that is not consistent across counters.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counters for the page compression layer
#[derive(Debug, Default)]
pub struct CompressionStats {
    /// Logical bytes minus physical bytes, summed over compressed pages
    pub bytes_saved: AtomicU64,
    /// Pages written in compressed form
    pub pages_compressed: AtomicU64,
    /// Compressed pages decoded back into logical pages
    pub pages_decompressed: AtomicU64,
    /// Eligible pages that fell back to the uncompressed form
    pub compression_errors: AtomicU64,
    /// Tablespaces that already produced a compression warning
    warned_spaces: Mutex<HashSet<u32>>,
    /// Set once a page without a tablespace produced a warning
    warned_unattached: AtomicBool,
}

impl CompressionStats {
    /// Create a stats tracker with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully compressed page
    pub fn record_compressed(&self, bytes_saved: u64) {
        self.pages_compressed.fetch_add(1, Ordering::Relaxed);
        self.bytes_saved.fetch_add(bytes_saved, Ordering::Relaxed);
    }

    /// Record one successfully decompressed page
    pub fn record_decompressed(&self) {
        self.pages_decompressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a compression failure
    pub fn record_error(&self) {
        self.compression_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Decide whether a compression failure in `space_id` should be logged
    ///
    /// Returns true the first time for each tablespace and false afterwards.
    /// Pages compressed outside a tablespace (import paths) share one flag.
    pub fn should_warn(&self, space_id: Option<u32>) -> bool {
        match space_id {
            Some(id) => self.warned_spaces.lock().insert(id),
            None => !self.warned_unattached.swap(true, Ordering::Relaxed),
        }
    }

    /// Forget that a tablespace was warned about, e.g. after it is dropped
    pub fn forget_space(&self, space_id: u32) {
        self.warned_spaces.lock().remove(&space_id);
    }

    /// Get a snapshot of current statistics
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_saved: self.bytes_saved.load(Ordering::Relaxed),
            pages_compressed: self.pages_compressed.load(Ordering::Relaxed),
            pages_decompressed: self.pages_decompressed.load(Ordering::Relaxed),
            compression_errors: self.compression_errors.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters and warning state
    pub fn reset(&self) {
        self.bytes_saved.store(0, Ordering::Relaxed);
        self.pages_compressed.store(0, Ordering::Relaxed);
        self.pages_decompressed.store(0, Ordering::Relaxed);
        self.compression_errors.store(0, Ordering::Relaxed);
        self.warned_spaces.lock().clear();
        self.warned_unattached.store(false, Ordering::Relaxed);
    }
}

/// Non-atomic copy of [`CompressionStats`] for display and assertions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Logical bytes minus physical bytes, summed over compressed pages
    pub bytes_saved: u64,
    /// Pages written in compressed form
    pub pages_compressed: u64,
    /// Compressed pages decoded back into logical pages
    pub pages_decompressed: u64,
    /// Eligible pages that fell back to the uncompressed form
    pub compression_errors: u64,
}

impl StatsSnapshot {
    /// Pages the compressor attempted, successful or not
    pub fn pages_attempted(&self) -> u64 {
        self.pages_compressed + self.compression_errors
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compressed: {}, decompressed: {}, errors: {}, bytes saved: {}",
            self.pages_compressed,
            self.pages_decompressed,
            self.compression_errors,
            self.bytes_saved
        )
    }
}
