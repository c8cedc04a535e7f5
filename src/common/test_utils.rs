//! Test utilities for page compression

use crate::storage::page_constants::{
    write_u16, write_u32, FIL_PAGE_DATA, FIL_PAGE_OFFSET, FIL_PAGE_SPACE_ID, FIL_PAGE_TYPE,
};
use crate::storage::page_type::PageType;
use std::sync::Once;

static TEST_LOGGER_INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_test_logging() {
    TEST_LOGGER_INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Zero-filled page with a type tag and tablespace id in its frame
pub fn make_page(page_size: usize, page_type: PageType, space_id: u32) -> Vec<u8> {
    make_page_raw(page_size, page_type.as_u16(), space_id)
}

/// Zero-filled page with an arbitrary type tag
pub fn make_page_raw(page_size: usize, page_type: u16, space_id: u32) -> Vec<u8> {
    let mut page = vec![0u8; page_size];
    write_u16(&mut page, FIL_PAGE_TYPE, page_type);
    write_u32(&mut page, FIL_PAGE_SPACE_ID, space_id);
    page
}

/// Index page whose body looks like rows: repeating records with counters
#[allow(clippy::cast_possible_truncation)]
pub fn make_index_page(page_size: usize, space_id: u32, page_no: u32) -> Vec<u8> {
    let mut page = make_page(page_size, PageType::Index, space_id);
    write_u32(&mut page, FIL_PAGE_OFFSET, page_no);

    let body = &mut page[FIL_PAGE_DATA..page_size - 8];
    for (i, record) in body.chunks_mut(32).enumerate() {
        let key = (i as u32).to_be_bytes();
        for (j, byte) in record.iter_mut().enumerate() {
            *byte = match j {
                0..=3 => key[j],
                4..=11 => b"customer"[j - 4],
                _ => (i % 7) as u8,
            };
        }
    }
    page
}

/// Generate test data
#[allow(clippy::cast_possible_truncation)]
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Generate random test data
pub fn generate_random_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut data = Vec::with_capacity(size);
    for i in 0..size {
        let mut hasher = DefaultHasher::new();
        i.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let byte = (hasher.finish() % 256) as u8;
        data.push(byte);
    }
    data
}

/// Assert that two byte slices are equal with better error messages
///
/// # Panics
///
/// Panics if the byte slices differ in length or content.
pub fn assert_bytes_equal(actual: &[u8], expected: &[u8], context: &str) {
    assert!(
        actual.len() == expected.len(),
        "{context}: Length mismatch - actual: {}, expected: {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a == e,
            "{context}: Byte mismatch at index {i}: actual 0x{a:02x}, expected 0x{e:02x}"
        );
    }
}
