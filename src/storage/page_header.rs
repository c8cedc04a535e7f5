//! Compressed page header - the fields this layer owns inside the page frame
//!
//! # Layout
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     integrity marker (BUF_NO_CHECKSUM_MAGIC)
//! 24      2     page type (PageCompressed / PageCompressedEncrypted)
//! 26      8     algorithm id                  (plain variant only)
//! 38      2     payload length
//! 40      2     algorithm id, short copy      (encrypted variant only)
//! ```
//!
//! The encrypted variant cannot use offset 26: the encryption layer stores its
//! key version there, and it needs to know the algorithm before it decrypts.
//! Fields may only ever be appended after offset 42.

use crate::compression::algorithm::Algorithm;
use crate::storage::page_constants::{
    read_u16, read_u32, read_u64, write_u16, write_u32, write_u64, BUF_NO_CHECKSUM_MAGIC,
    COMPRESSED_ENCRYPTED_HEADER_LEN, COMPRESSED_HEADER_LEN, FIL_PAGE_COMPRESSED_SIZE,
    FIL_PAGE_DATA, FIL_PAGE_FILE_FLUSH_LSN_OR_KEY_VERSION, FIL_PAGE_SPACE_ID,
    FIL_PAGE_SPACE_OR_CHKSUM, FIL_PAGE_TYPE,
};
use crate::storage::page_type::PageType;

/// Offset of the short algorithm id in the encrypted variant
const OFFSET_SHORT_ALGORITHM: usize = FIL_PAGE_DATA + FIL_PAGE_COMPRESSED_SIZE;

/// Header of a page produced by the compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressedHeader {
    /// Compressed only
    Plain {
        /// Length of the compressed payload
        payload_len: u16,
        /// Algorithm id, full 8 byte field
        algorithm_id: u64,
    },
    /// Compressed, to be encrypted afterwards
    Encrypted {
        /// Length of the compressed payload
        payload_len: u16,
        /// Algorithm id, 2 byte copy
        algorithm_id: u16,
    },
}

impl CompressedHeader {
    /// Build the header variant matching `encrypted`
    pub fn new(payload_len: u16, algorithm: Algorithm, encrypted: bool) -> Self {
        if encrypted {
            CompressedHeader::Encrypted {
                payload_len,
                algorithm_id: algorithm.short_id(),
            }
        } else {
            CompressedHeader::Plain {
                payload_len,
                algorithm_id: algorithm.id(),
            }
        }
    }

    /// Header length for a variant, usable before the payload length is known
    pub const fn len_for(encrypted: bool) -> usize {
        if encrypted {
            COMPRESSED_ENCRYPTED_HEADER_LEN
        } else {
            COMPRESSED_HEADER_LEN
        }
    }

    /// Bytes occupied by the header, payload starts right after
    pub fn header_len(&self) -> usize {
        Self::len_for(self.is_encrypted())
    }

    /// Length of the compressed payload
    pub fn payload_len(&self) -> usize {
        match *self {
            CompressedHeader::Plain { payload_len, .. }
            | CompressedHeader::Encrypted { payload_len, .. } => usize::from(payload_len),
        }
    }

    /// Algorithm id widened to the on-disk id space
    pub fn algorithm_id(&self) -> u64 {
        match *self {
            CompressedHeader::Plain { algorithm_id, .. } => algorithm_id,
            CompressedHeader::Encrypted { algorithm_id, .. } => u64::from(algorithm_id),
        }
    }

    /// Whether this is the encrypted variant
    pub fn is_encrypted(&self) -> bool {
        matches!(self, CompressedHeader::Encrypted { .. })
    }

    /// Page type tag written for this variant
    pub fn page_type(&self) -> PageType {
        if self.is_encrypted() {
            PageType::PageCompressedEncrypted
        } else {
            PageType::PageCompressed
        }
    }

    /// Write the header fields into a page
    ///
    /// Bytes of the page frame that the header does not own are left alone.
    ///
    /// # Panics
    /// Panics if `page` is shorter than the header.
    pub fn write_to(&self, page: &mut [u8]) {
        assert!(
            page.len() >= self.header_len(),
            "buffer too small for compressed page header"
        );

        write_u32(page, FIL_PAGE_SPACE_OR_CHKSUM, BUF_NO_CHECKSUM_MAGIC);
        write_u16(page, FIL_PAGE_TYPE, self.page_type().as_u16());

        match *self {
            CompressedHeader::Plain {
                payload_len,
                algorithm_id,
            } => {
                write_u64(page, FIL_PAGE_FILE_FLUSH_LSN_OR_KEY_VERSION, algorithm_id);
                write_u16(page, FIL_PAGE_DATA, payload_len);
            }
            CompressedHeader::Encrypted {
                payload_len,
                algorithm_id,
            } => {
                write_u16(page, FIL_PAGE_DATA, payload_len);
                write_u16(page, OFFSET_SHORT_ALGORITHM, algorithm_id);
            }
        }
    }

    /// Read the header from a page
    ///
    /// Returns `None` when the page type is neither compressed variant: the page
    /// is not in this format and must be passed through untouched. The integrity
    /// marker is not checked here.
    pub fn read_from(page: &[u8]) -> Option<Self> {
        if page.len() < COMPRESSED_HEADER_LEN {
            return None;
        }

        match PageType::try_from(read_u16(page, FIL_PAGE_TYPE)) {
            Ok(PageType::PageCompressed) => Some(CompressedHeader::Plain {
                payload_len: read_u16(page, FIL_PAGE_DATA),
                algorithm_id: read_u64(page, FIL_PAGE_FILE_FLUSH_LSN_OR_KEY_VERSION),
            }),
            Ok(PageType::PageCompressedEncrypted)
                if page.len() >= COMPRESSED_ENCRYPTED_HEADER_LEN =>
            {
                Some(CompressedHeader::Encrypted {
                    payload_len: read_u16(page, FIL_PAGE_DATA),
                    algorithm_id: read_u16(page, OFFSET_SHORT_ALGORITHM),
                })
            }
            _ => None,
        }
    }
}

/// Check if a page carries the plain compressed header
pub fn is_page_compressed(page: &[u8]) -> bool {
    matches!(
        CompressedHeader::read_from(page),
        Some(CompressedHeader::Plain { .. })
    )
}

/// Check if a page carries the compressed+encrypted header
pub fn is_page_compressed_encrypted(page: &[u8]) -> bool {
    matches!(
        CompressedHeader::read_from(page),
        Some(CompressedHeader::Encrypted { .. })
    )
}

/// Value of the checksum slot
pub fn integrity_marker(page: &[u8]) -> u32 {
    read_u32(page, FIL_PAGE_SPACE_OR_CHKSUM)
}

/// Check if the checksum slot holds the compressed-page marker
pub fn has_integrity_marker(page: &[u8]) -> bool {
    integrity_marker(page) == BUF_NO_CHECKSUM_MAGIC
}

/// Tablespace id stored in the page frame
pub fn page_space_id(page: &[u8]) -> u32 {
    read_u32(page, FIL_PAGE_SPACE_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_byte_layout() {
        let header = CompressedHeader::new(0x0123, Algorithm::Lz4, false);
        let mut page = [0u8; 64];
        header.write_to(&mut page);

        assert_eq!(&page[0..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&page[24..26], &34354u16.to_be_bytes());
        assert_eq!(&page[26..34], &[0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(&page[38..40], &[0x01, 0x23]);
        // Nothing written past the plain header
        assert_eq!(&page[40..42], &[0, 0]);
    }

    #[test]
    fn test_encrypted_byte_layout() {
        let header = CompressedHeader::new(0x0456, Algorithm::Snappy, true);
        let mut page = [0xAAu8; 64];
        header.write_to(&mut page);

        assert_eq!(&page[0..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&page[24..26], &37401u16.to_be_bytes());
        // Key version slot belongs to the encryption layer
        assert_eq!(&page[26..34], &[0xAA; 8]);
        assert_eq!(&page[38..40], &[0x04, 0x56]);
        assert_eq!(&page[40..42], &[0x00, 0x06]);
    }

    #[test]
    fn test_header_roundtrip_both_variants() {
        for encrypted in [false, true] {
            let header = CompressedHeader::new(777, Algorithm::Zlib, encrypted);
            let mut page = [0u8; 128];
            header.write_to(&mut page);

            let read = CompressedHeader::read_from(&page).unwrap();
            assert_eq!(read, header);
            assert_eq!(read.header_len(), CompressedHeader::len_for(encrypted));
            assert_eq!(read.payload_len(), 777);
            assert_eq!(read.algorithm_id(), 1);
        }
    }

    #[test]
    fn test_read_not_our_format() {
        let mut page = [0u8; 64];
        assert_eq!(CompressedHeader::read_from(&page), None);

        write_u16(&mut page, FIL_PAGE_TYPE, PageType::Index.as_u16());
        assert_eq!(CompressedHeader::read_from(&page), None);

        // Unknown type tags are not ours either
        write_u16(&mut page, FIL_PAGE_TYPE, 4242);
        assert_eq!(CompressedHeader::read_from(&page), None);
    }

    #[test]
    fn test_page_predicates() {
        let mut page = [0u8; 64];
        assert!(!is_page_compressed(&page));
        assert!(!has_integrity_marker(&page));

        CompressedHeader::new(10, Algorithm::Zlib, false).write_to(&mut page);
        assert!(is_page_compressed(&page));
        assert!(!is_page_compressed_encrypted(&page));
        assert!(has_integrity_marker(&page));

        CompressedHeader::new(10, Algorithm::Zlib, true).write_to(&mut page);
        assert!(!is_page_compressed(&page));
        assert!(is_page_compressed_encrypted(&page));
    }

    #[test]
    fn test_page_space_id() {
        let mut page = [0u8; 64];
        write_u32(&mut page, FIL_PAGE_SPACE_ID, 0x0000_1234);
        assert_eq!(page_space_id(&page), 0x1234);
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_write_to_short_buffer() {
        let mut page = [0u8; 41];
        CompressedHeader::new(1, Algorithm::Zlib, true).write_to(&mut page);
    }
}
