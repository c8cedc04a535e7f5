//! Page compressor - turns a logical page into a compressed physical page
//!
//! Compression is best effort. Whatever happens inside a codec, the caller gets
//! back a page it can write: either the compressed image or the original page.
//! Only a broken call contract is reported as an `Err`.

use crate::common::config::CompressionConfig;
use crate::common::error::{Error, Result};
use crate::common::logging::Timer;
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::{CodecError, PageCodec};
use crate::compression::registry::CodecRegistry;
use crate::compression::stats::CompressionStats;
use crate::compression::tablespace::Tablespace;
use crate::storage::page_constants::FIL_PAGE_DATA;
use crate::storage::page_header::CompressedHeader;
use crate::storage::page_type::{is_compression_eligible_raw, page_type_raw};
use crate::{pagecomp_debug, pagecomp_trace, pagecomp_warn};
use std::fmt;
use std::sync::Arc;

/// Per-call compression parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    /// Codec level, 0 selects the configured default
    pub level: u32,
    /// Alignment of the physical length, 0 selects the configured block size
    pub block_size: usize,
    /// Write the header variant reserved for pages encrypted afterwards
    pub encrypted: bool,
}

impl CompressOptions {
    /// Options with an explicit level
    pub fn with_level(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set the block size
    #[must_use]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Select the encrypted header variant
    #[must_use]
    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }
}

/// Why a page was passed through without running a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// Page type is never compressed
    PageType(u16),
    /// Configured algorithm is `Algorithm::None`
    NoAlgorithm,
    /// Tablespace already uses the compressed row format
    RowFormatCompressed,
}

/// Why an eligible page fell back to the uncompressed form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressFailure {
    /// The codec reported an error
    Codec(CodecError),
    /// The compressed image does not fit into one page
    Overflow {
        /// Payload length produced by the codec
        payload_len: usize,
        /// Header plus payload rounded up to the block size
        aligned_len: usize,
    },
}

impl fmt::Display for CompressFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressFailure::Codec(err) => write!(f, "{err}"),
            CompressFailure::Overflow {
                payload_len,
                aligned_len,
            } => write!(
                f,
                "payload of {payload_len} bytes needs {aligned_len} bytes after alignment"
            ),
        }
    }
}

/// Result of one compression attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The page was compressed
    Compressed {
        /// Length of the codec output
        payload_len: usize,
        /// Bytes to write, aligned or the full page when trimming is off
        physical_len: usize,
    },
    /// The page was passed through without running a codec
    Ineligible(IneligibleReason),
    /// The codec ran but the page is stored uncompressed
    Failed(CompressFailure),
}

/// Page to write together with how it came about
#[derive(Debug)]
pub struct Compressed<'a> {
    /// Bytes to write
    pub data: &'a [u8],
    /// What the compressor did
    pub outcome: CompressionOutcome,
}

impl Compressed<'_> {
    /// Physical length to write
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing would be written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if `data` is a compressed image
    pub fn is_compressed(&self) -> bool {
        matches!(self.outcome, CompressionOutcome::Compressed { .. })
    }
}

/// Lengths of a finished compressed image
struct Encoded {
    payload_len: usize,
    aligned_len: usize,
    physical_len: usize,
}

/// Compresses logical pages with the configured algorithm
#[derive(Debug, Clone)]
pub struct PageCompressor {
    registry: Arc<CodecRegistry>,
    config: CompressionConfig,
    stats: Arc<CompressionStats>,
}

impl PageCompressor {
    /// Create a compressor
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for out of range settings and
    /// `Error::CodecUnavailable` when the configured algorithm has no codec
    pub fn new(
        registry: Arc<CodecRegistry>,
        config: CompressionConfig,
        stats: Arc<CompressionStats>,
    ) -> Result<Self> {
        config.validate()?;
        if config.algorithm != Algorithm::None && !registry.contains(config.algorithm) {
            return Err(Error::CodecUnavailable(config.algorithm));
        }

        Ok(Self {
            registry,
            config,
            stats,
        })
    }

    /// Settings in use
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Shared counters
    pub fn stats(&self) -> &Arc<CompressionStats> {
        &self.stats
    }

    /// Compress one logical page
    ///
    /// `page` holds the logical page in its first `page_size` bytes. With a
    /// `target` the compressed image is built there and `page` is left alone.
    /// Without one it is built in a scratch buffer and copied over `page` on
    /// success. Either way `data` in the result is the buffer to write: the
    /// compressed image, or the untouched page when compression was skipped or
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `page` or `target` is shorter than the
    /// page size
    pub fn compress<'a>(
        &self,
        space: Option<&dyn Tablespace>,
        page: &'a mut [u8],
        mut target: Option<&'a mut [u8]>,
        options: &CompressOptions,
    ) -> Result<Compressed<'a>> {
        let page_size = self.config.page_size;
        if page.len() < page_size {
            return Err(Error::invalid_input(format!(
                "page buffer of {} bytes is shorter than the page size {}",
                page.len(),
                page_size
            )));
        }
        if let Some(target) = target.as_deref() {
            if target.len() < page_size {
                return Err(Error::invalid_input(format!(
                    "target buffer of {} bytes is shorter than the page size {}",
                    target.len(),
                    page_size
                )));
            }
        }

        if let Some(reason) = self.ineligible(space, page) {
            if let IneligibleReason::PageType(page_type) = reason {
                // Excluded page types share the failure path: counted, warned once
                self.stats.record_error();
                if self.stats.should_warn(space.map(Tablespace::id)) {
                    pagecomp_warn!(
                        "Compression failed for space {} name {} len {} compression method {}: \
                         page type {} is not compressed",
                        space_label(space),
                        space.map_or("(import)", Tablespace::name),
                        page_size,
                        self.config.algorithm.name(),
                        page_type
                    );
                }
            } else {
                pagecomp_debug!(
                    "page of space {} not compressed: {:?}",
                    space_label(space),
                    reason
                );
            }
            let page: &'a [u8] = page;
            return Ok(Compressed {
                data: &page[..page_size],
                outcome: CompressionOutcome::Ineligible(reason),
            });
        }

        let codec = self.registry.lookup(self.config.algorithm.id())?;
        let level = if options.level == 0 {
            self.config.default_level
        } else {
            options.level
        };
        let block_size = if options.block_size == 0 {
            self.config.effective_block_size()
        } else {
            options.block_size
        };

        pagecomp_trace!(
            "compressing page of space {} with {} level {} block {}",
            space_label(space),
            codec.name(),
            level,
            block_size
        );

        let result = match target.as_deref_mut() {
            Some(out) => self.encode(
                space,
                codec,
                &page[..page_size],
                out,
                level,
                block_size,
                options.encrypted,
            ),
            None => {
                let header_len = CompressedHeader::len_for(options.encrypted);
                let scratch_len = page_size.max(header_len + codec.max_compressed_len(page_size));
                let mut scratch = vec![0u8; scratch_len];
                let result = self.encode(
                    space,
                    codec,
                    &page[..page_size],
                    &mut scratch,
                    level,
                    block_size,
                    options.encrypted,
                );
                if result.is_ok() {
                    page[..page_size].copy_from_slice(&scratch[..page_size]);
                }
                result
            }
        };

        match result {
            Ok(encoded) => {
                let saved = page_size - encoded.aligned_len;
                self.stats.record_compressed(saved as u64);
                pagecomp_trace!(
                    "compressed page of space {}: payload {} aligned {} written {}",
                    space_label(space),
                    encoded.payload_len,
                    encoded.aligned_len,
                    encoded.physical_len
                );

                let image: &'a [u8] = match target {
                    Some(target) => target,
                    None => page,
                };
                Ok(Compressed {
                    data: &image[..encoded.physical_len],
                    outcome: CompressionOutcome::Compressed {
                        payload_len: encoded.payload_len,
                        physical_len: encoded.physical_len,
                    },
                })
            }
            Err(failure) => {
                self.stats.record_error();
                if self.stats.should_warn(space.map(Tablespace::id)) {
                    pagecomp_warn!(
                        "Compression failed for space {} name {} len {} compression method {}: {}",
                        space_label(space),
                        space.map_or("(import)", Tablespace::name),
                        page_size,
                        codec.name(),
                        failure
                    );
                }
                let page: &'a [u8] = page;
                Ok(Compressed {
                    data: &page[..page_size],
                    outcome: CompressionOutcome::Failed(failure),
                })
            }
        }
    }

    /// Reason to skip a page, checked before any codec runs
    fn ineligible(&self, space: Option<&dyn Tablespace>, page: &[u8]) -> Option<IneligibleReason> {
        let page_type = page_type_raw(page);
        if !is_compression_eligible_raw(page_type) {
            return Some(IneligibleReason::PageType(page_type));
        }
        if self.config.algorithm == Algorithm::None {
            return Some(IneligibleReason::NoAlgorithm);
        }
        if space.is_some_and(Tablespace::is_row_compressed) {
            return Some(IneligibleReason::RowFormatCompressed);
        }
        None
    }

    /// Build the compressed image of `page` in `out`
    ///
    /// `out` is at least one page long. On failure its contents are undefined.
    #[allow(clippy::too_many_arguments)]
    fn encode(
        &self,
        space: Option<&dyn Tablespace>,
        codec: &dyn PageCodec,
        page: &[u8],
        out: &mut [u8],
        level: u32,
        block_size: usize,
        encrypted: bool,
    ) -> std::result::Result<Encoded, CompressFailure> {
        let page_size = page.len();
        let header_len = CompressedHeader::len_for(encrypted);
        let capacity = page_size - header_len;

        let timer = Timer::start("page compression", space.map(Tablespace::id));
        let payload_len = codec
            .compress(page, &mut out[header_len..], level)
            .map_err(CompressFailure::Codec)?;
        timer.stop();

        if payload_len == 0 {
            return Err(CompressFailure::Codec(CodecError::internal(
                codec.algorithm(),
                "codec produced no output",
            )));
        }

        let aligned_len = (header_len + payload_len).div_ceil(block_size) * block_size;
        if payload_len > capacity || aligned_len > page_size {
            return Err(CompressFailure::Overflow {
                payload_len,
                aligned_len,
            });
        }
        let stored_len = u16::try_from(payload_len).map_err(|_| CompressFailure::Overflow {
            payload_len,
            aligned_len,
        })?;

        out[..FIL_PAGE_DATA].copy_from_slice(&page[..FIL_PAGE_DATA]);
        CompressedHeader::new(stored_len, codec.algorithm(), encrypted).write_to(out);
        out[header_len + payload_len..aligned_len].fill(0);

        #[cfg(debug_assertions)]
        verify_roundtrip(codec, page, &out[header_len..header_len + payload_len]);

        let physical_len = if self.config.use_trim {
            aligned_len
        } else {
            out[aligned_len..page_size].fill(0);
            page_size
        };

        Ok(Encoded {
            payload_len,
            aligned_len,
            physical_len,
        })
    }
}

/// Decode a fresh payload again and compare it with its source page
#[cfg(debug_assertions)]
fn verify_roundtrip(codec: &dyn PageCodec, page: &[u8], payload: &[u8]) {
    use crate::pagecomp_error;
    use crate::storage::checksum::compare_page_images;

    let mut decoded = vec![0u8; page.len()];
    let verdict = codec
        .decompress(payload, &mut decoded)
        .map_err(|e| e.to_string())
        .and_then(|len| {
            if len == page.len() {
                compare_page_images(page, &decoded)
                    .map_err(|(want, got)| format!("crc32 {want:08x} decoded as {got:08x}"))
            } else {
                Err(format!("decoded {len} of {} bytes", page.len()))
            }
        });

    if let Err(detail) = verdict {
        pagecomp_error!(
            "{} payload of {} bytes does not decode to its source page: {}",
            codec.name(),
            payload.len(),
            detail
        );
        panic!("compressed page failed verification: {detail}");
    }
}

fn space_label(space: Option<&dyn Tablespace>) -> String {
    space.map_or_else(|| "(import)".to_string(), |s| s.id().to_string())
}
