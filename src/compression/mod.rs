//! Page compression envelope
//!
//! [`PageCompressor`] and [`PageDecompressor`] wrap codec primitives from a
//! [`CodecRegistry`] into the self-describing compressed page format. Both
//! report into a shared [`CompressionStats`].

pub mod algorithm;
pub mod codec;
pub mod codecs;
pub mod compressor;
pub mod decompressor;
pub mod registry;
pub mod stats;
pub mod tablespace;

pub use algorithm::Algorithm;
pub use codec::{CodecError, PageCodec};
pub use compressor::{
    CompressFailure, CompressOptions, Compressed, CompressionOutcome, IneligibleReason,
    PageCompressor,
};
pub use decompressor::{CorruptionPolicy, DecodeOutcome, PageDecompressor};
pub use registry::{CodecRegistry, CodecRegistryBuilder};
pub use stats::{CompressionStats, StatsSnapshot};
pub use tablespace::{SpaceInfo, Tablespace};
