//! CRC32 helpers for comparing page images
//!
//! Compressed pages carry `BUF_NO_CHECKSUM_MAGIC` instead of a checksum, so CRC32
//! is only used to fingerprint logical page images in diagnostics.

use crc32fast::Hasher;

/// Calculate CRC32 checksum for data
pub fn calculate_crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Compare two page images, returning both fingerprints when they differ
pub fn compare_page_images(expected: &[u8], actual: &[u8]) -> Result<(), (u32, u32)> {
    if expected == actual {
        Ok(())
    } else {
        Err((calculate_crc32(expected), calculate_crc32(actual)))
    }
}
