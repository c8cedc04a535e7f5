//! Page frame offsets and fixed values of the on-disk page format
//!
//! All multi-byte fields in the page frame are big-endian.

/// Checksum slot, or the integrity marker on compressed pages (4 bytes)
pub const FIL_PAGE_SPACE_OR_CHKSUM: usize = 0;

/// Page number within the tablespace (4 bytes)
pub const FIL_PAGE_OFFSET: usize = 4;

/// Log sequence number of the last modification (8 bytes)
pub const FIL_PAGE_LSN: usize = 16;

/// Page type tag (2 bytes)
pub const FIL_PAGE_TYPE: usize = 24;

/// Flush LSN on the first page, key version on encrypted pages, algorithm id on
/// compressed pages (8 bytes)
pub const FIL_PAGE_FILE_FLUSH_LSN_OR_KEY_VERSION: usize = 26;

/// Tablespace id (4 bytes)
pub const FIL_PAGE_SPACE_ID: usize = 34;

/// First byte after the page frame header
pub const FIL_PAGE_DATA: usize = 38;

/// Width of the compressed payload length field
pub const FIL_PAGE_COMPRESSED_SIZE: usize = 2;

/// Width of the redundant algorithm id on compressed+encrypted pages
pub const FIL_PAGE_COMPRESSION_METHOD_SIZE: usize = 2;

/// Value stored in the checksum slot of compressed pages
pub const BUF_NO_CHECKSUM_MAGIC: u32 = 0xDEAD_BEEF;

/// Header length of a plain compressed page
pub const COMPRESSED_HEADER_LEN: usize = FIL_PAGE_DATA + FIL_PAGE_COMPRESSED_SIZE;

/// Header length of a compressed+encrypted page
pub const COMPRESSED_ENCRYPTED_HEADER_LEN: usize =
    COMPRESSED_HEADER_LEN + FIL_PAGE_COMPRESSION_METHOD_SIZE;

/// Read a big-endian u16 at `offset`
#[inline]
pub fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

/// Read a big-endian u32 at `offset`
#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_be_bytes(bytes)
}

/// Read a big-endian u64 at `offset`
#[inline]
pub fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

/// Write a big-endian u16 at `offset`
#[inline]
pub fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Write a big-endian u32 at `offset`
#[inline]
pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Write a big-endian u64 at `offset`
#[inline]
pub fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
}
