//! Page type tags stored at `FIL_PAGE_TYPE`

use crate::common::error::Error;
use crate::storage::page_constants::{read_u16, FIL_PAGE_TYPE};

/// Page type enumeration - values are part of the on-disk format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PageType {
    /// Freshly allocated, never initialized
    Allocated = 0,
    /// Undo log page
    UndoLog = 2,
    /// Index node (segment inode) page
    Inode = 3,
    /// Insert buffer free list page
    IbufFreeList = 4,
    /// Insert buffer bitmap page
    IbufBitmap = 5,
    /// System page
    Sys = 6,
    /// Transaction system page
    TrxSys = 7,
    /// File space header
    FspHdr = 8,
    /// Extent descriptor page
    Xdes = 9,
    /// Uncompressed BLOB page
    Blob = 10,
    /// First compressed BLOB page
    ZBlob = 11,
    /// Subsequent compressed BLOB page
    ZBlob2 = 12,
    /// R-tree node
    RTree = 17854,
    /// B-tree node
    Index = 17855,
    /// Page compressed by this layer
    PageCompressed = 34354,
    /// Page compressed by this layer and then encrypted
    PageCompressedEncrypted = 37401,
}

impl TryFrom<u16> for PageType {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PageType::Allocated),
            2 => Ok(PageType::UndoLog),
            3 => Ok(PageType::Inode),
            4 => Ok(PageType::IbufFreeList),
            5 => Ok(PageType::IbufBitmap),
            6 => Ok(PageType::Sys),
            7 => Ok(PageType::TrxSys),
            8 => Ok(PageType::FspHdr),
            9 => Ok(PageType::Xdes),
            10 => Ok(PageType::Blob),
            11 => Ok(PageType::ZBlob),
            12 => Ok(PageType::ZBlob2),
            17854 => Ok(PageType::RTree),
            17855 => Ok(PageType::Index),
            34354 => Ok(PageType::PageCompressed),
            37401 => Ok(PageType::PageCompressedEncrypted),
            _ => Err(Error::InvalidPageType(value)),
        }
    }
}

impl PageType {
    /// Raw tag value
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if this page carries the compressed-page header
    pub fn is_page_compressed(self) -> bool {
        matches!(
            self,
            PageType::PageCompressed | PageType::PageCompressedEncrypted
        )
    }

    /// Check if the compression layer may compress a page of this type
    ///
    /// Space headers and extent descriptors are read before any codec state is
    /// known, and already compressed pages must not be wrapped twice.
    pub fn is_compression_eligible(self) -> bool {
        !matches!(self, PageType::Allocated | PageType::FspHdr | PageType::Xdes)
            && !self.is_page_compressed()
    }
}

/// Raw page type tag of a page buffer
pub fn page_type_raw(page: &[u8]) -> u16 {
    read_u16(page, FIL_PAGE_TYPE)
}

/// Check a raw tag for compression eligibility
///
/// Tags this layer does not know are eligible; the page type space belongs to
/// the engine, not to the codec layer.
pub fn is_compression_eligible_raw(tag: u16) -> bool {
    PageType::try_from(tag).map_or(true, PageType::is_compression_eligible)
}
