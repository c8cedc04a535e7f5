//! Page decompressor - restores logical pages from compressed physical pages

use crate::common::config::CompressionConfig;
use crate::common::error::{CorruptionKind, Error, PageCorruption, Result};
use crate::common::logging::{page_prefix_dump, Timer};
use crate::compression::registry::CodecRegistry;
use crate::compression::stats::CompressionStats;
use crate::compression::tablespace::Tablespace;
use crate::storage::page_header::{integrity_marker, page_space_id, CompressedHeader};
use crate::storage::page_constants::BUF_NO_CHECKSUM_MAGIC;
use crate::{pagecomp_error, pagecomp_trace};
use std::sync::Arc;

/// Bytes of the page frame dumped to the log when a page is corrupt
const DUMP_PREFIX_LEN: usize = 128;

/// What to do with a compressed page that cannot be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Return `Error::Corruption` and leave the buffer untouched
    Report,
    /// Log the corruption and stop the process
    Fatal,
}

/// Result of a decompression call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The buffer does not hold a compressed page and was left as it is
    NotCompressed,
    /// The logical page was restored into the buffer
    Decompressed {
        /// Compressed payload length stored in the header
        payload_len: usize,
    },
}

/// Where decoding stopped, before the report is assembled
struct Failure {
    kind: CorruptionKind,
    claimed_size: usize,
    actual_size: usize,
    algorithm_id: u64,
}

/// Decompresses physical pages written by [`PageCompressor`]
///
/// [`PageCompressor`]: crate::compression::PageCompressor
#[derive(Debug, Clone)]
pub struct PageDecompressor {
    registry: Arc<CodecRegistry>,
    page_size: usize,
    stats: Arc<CompressionStats>,
}

impl PageDecompressor {
    /// Create a decompressor for the page size in `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for out of range settings
    pub fn new(
        registry: Arc<CodecRegistry>,
        config: &CompressionConfig,
        stats: Arc<CompressionStats>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            page_size: config.page_size,
            stats,
        })
    }

    /// Logical page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Shared counters
    pub fn stats(&self) -> &Arc<CompressionStats> {
        &self.stats
    }

    /// Restore the logical page held in `buf`
    ///
    /// Pages that do not carry a compressed header come back as
    /// [`DecodeOutcome::NotCompressed`]. Otherwise the first `expected_len`
    /// bytes of `buf` are replaced by the decoded page. A page that fails
    /// validation or decoding is handled according to `policy`; with
    /// [`CorruptionPolicy::Report`] the buffer is not modified.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `expected_len` is zero, larger than the
    /// page size or larger than `buf`, and `Error::Corruption` for corrupt
    /// pages under [`CorruptionPolicy::Report`].
    ///
    /// # Panics
    ///
    /// Panics on a corrupt page under [`CorruptionPolicy::Fatal`]
    pub fn decompress(
        &self,
        space: Option<&dyn Tablespace>,
        buf: &mut [u8],
        expected_len: usize,
        policy: CorruptionPolicy,
    ) -> Result<DecodeOutcome> {
        if expected_len == 0 || expected_len > self.page_size {
            return Err(Error::invalid_input(format!(
                "expected length {} outside 1..={}",
                expected_len, self.page_size
            )));
        }
        if buf.len() < expected_len {
            return Err(Error::invalid_input(format!(
                "page buffer of {} bytes is shorter than the expected length {}",
                buf.len(),
                expected_len
            )));
        }

        let Some(header) = CompressedHeader::read_from(buf) else {
            return Ok(DecodeOutcome::NotCompressed);
        };

        match self.decode(space, &header, buf, expected_len) {
            Ok(decoded) => {
                buf[..expected_len].copy_from_slice(&decoded[..expected_len]);
                self.stats.record_decompressed();
                pagecomp_trace!(
                    "decompressed page of space {} from {} payload bytes",
                    page_space_id(buf),
                    header.payload_len()
                );
                Ok(DecodeOutcome::Decompressed {
                    payload_len: header.payload_len(),
                })
            }
            Err(failure) => Err(Self::corrupted(space, buf, failure, policy)),
        }
    }

    /// Validate the header and run the codec into a scratch page
    fn decode(
        &self,
        space: Option<&dyn Tablespace>,
        header: &CompressedHeader,
        buf: &[u8],
        expected_len: usize,
    ) -> std::result::Result<Vec<u8>, Failure> {
        let header_len = header.header_len();
        let payload_len = header.payload_len();
        let fail = |kind, actual_size| Failure {
            kind,
            claimed_size: payload_len,
            actual_size,
            algorithm_id: header.algorithm_id(),
        };

        let marker = integrity_marker(buf);
        if marker != BUF_NO_CHECKSUM_MAGIC {
            return Err(fail(
                CorruptionKind::BadIntegrityMarker { found: marker },
                buf.len(),
            ));
        }

        if payload_len == 0
            || payload_len > self.page_size
            || header_len + payload_len > buf.len()
        {
            return Err(fail(CorruptionKind::PayloadLengthOutOfRange, buf.len()));
        }

        let codec = self
            .registry
            .lookup(header.algorithm_id())
            .map_err(|_| fail(CorruptionKind::UnknownAlgorithm, buf.len()))?;

        let mut decoded = vec![0u8; self.page_size];
        let timer = Timer::start("page decompression", space.map(Tablespace::id));
        let produced = codec
            .decompress(&buf[header_len..header_len + payload_len], &mut decoded)
            .map_err(|e| {
                fail(
                    CorruptionKind::DecodeFailed {
                        code: e.code,
                        message: e.message,
                    },
                    0,
                )
            })?;
        timer.stop();

        if produced != expected_len {
            return Err(fail(
                CorruptionKind::LengthMismatch {
                    expected: expected_len,
                },
                produced,
            ));
        }

        Ok(decoded)
    }

    /// Log a corrupt page and apply the policy
    fn corrupted(
        space: Option<&dyn Tablespace>,
        buf: &[u8],
        failure: Failure,
        policy: CorruptionPolicy,
    ) -> Error {
        let report = PageCorruption {
            space_id: page_space_id(buf),
            space_name: space.map(|s| s.name().to_string()),
            algorithm_id: failure.algorithm_id,
            claimed_size: failure.claimed_size,
            actual_size: failure.actual_size,
            kind: failure.kind,
        };

        pagecomp_error!("Corruption: page is marked as compressed but {}", report);
        pagecomp_error!(
            "page frame prefix:\n{}",
            page_prefix_dump(buf, DUMP_PREFIX_LEN)
        );

        match policy {
            CorruptionPolicy::Report => Error::corruption(report),
            CorruptionPolicy::Fatal => panic!("unrecoverable compressed page: {report}"),
        }
    }
}
