//! Page format pieces the compression layer reads and writes

pub mod checksum;
pub mod page_constants;
pub mod page_header;
pub mod page_type;
