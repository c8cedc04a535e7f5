//! Algorithm registry - maps on-disk algorithm ids to codec implementations
//!
//! The registry is assembled once through [`CodecRegistryBuilder`] and is
//! read-only afterwards, so concurrent lookups need no locking. Dispatch is a
//! single slot lookup indexed by the algorithm id.

use crate::common::error::{Error, Result};
use crate::compression::algorithm::Algorithm;
use crate::compression::codec::PageCodec;
use crate::compression::codecs::builtin_codecs;
use crate::pagecomp_debug;
use std::fmt;

/// Number of slots, one per on-disk algorithm id
const SLOTS: usize = Algorithm::ALL.len();

/// Immutable table of codecs indexed by algorithm id
pub struct CodecRegistry {
    codecs: [Option<Box<dyn PageCodec>>; SLOTS],
}

impl CodecRegistry {
    /// Start an empty registry
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// Registry holding every codec compiled into this build
    pub fn builtin() -> Self {
        let mut builder = Self::builder();
        for codec in builtin_codecs() {
            // Built-in codecs are distinct and never `None`
            let _ = builder.register(codec);
        }
        builder.build()
    }

    /// Find the codec for an on-disk algorithm id
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAlgorithm` for ids outside the numbering and
    /// `Error::CodecUnavailable` for known ids without a registered codec
    pub fn lookup(&self, id: u64) -> Result<&dyn PageCodec> {
        let algorithm = Algorithm::from_id(id).ok_or(Error::UnknownAlgorithm(id))?;
        self.get(algorithm).ok_or(Error::CodecUnavailable(algorithm))
    }

    /// Codec registered for `algorithm`, if any
    pub fn get(&self, algorithm: Algorithm) -> Option<&dyn PageCodec> {
        self.codecs[usize::from(algorithm as u8)].as_deref()
    }

    /// Check if a codec is registered for `algorithm`
    pub fn contains(&self, algorithm: Algorithm) -> bool {
        self.get(algorithm).is_some()
    }

    /// Algorithms with a registered codec, in id order
    pub fn available(&self) -> Vec<Algorithm> {
        Algorithm::ALL
            .iter()
            .copied()
            .filter(|&algorithm| self.contains(algorithm))
            .collect()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("available", &self.available())
            .finish()
    }
}

/// Collects codecs before the registry is frozen
#[derive(Default)]
pub struct CodecRegistryBuilder {
    codecs: [Option<Box<dyn PageCodec>>; SLOTS],
}

impl CodecRegistryBuilder {
    /// Add a codec
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a codec claiming `Algorithm::None` and
    /// `Error::DuplicateCodec` when the algorithm already has a codec
    pub fn register(&mut self, codec: Box<dyn PageCodec>) -> Result<()> {
        let algorithm = codec.algorithm();
        if algorithm == Algorithm::None {
            return Err(Error::invalid_input(
                "a codec cannot be registered for the uncompressed id",
            ));
        }

        let slot = &mut self.codecs[usize::from(algorithm as u8)];
        if slot.is_some() {
            return Err(Error::DuplicateCodec(algorithm));
        }

        pagecomp_debug!("registered {} codec (id {})", codec.name(), algorithm.id());
        *slot = Some(codec);
        Ok(())
    }

    /// Chained form of [`register`](Self::register)
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register)
    pub fn with(mut self, codec: Box<dyn PageCodec>) -> Result<Self> {
        self.register(codec)?;
        Ok(self)
    }

    /// Add every compiled-in codec that is not registered yet
    pub fn with_builtin(mut self) -> Self {
        for codec in builtin_codecs() {
            let algorithm = codec.algorithm();
            if self.codecs[usize::from(algorithm as u8)].is_none() {
                let _ = self.register(codec);
            }
        }
        self
    }

    /// Freeze the registry
    pub fn build(self) -> CodecRegistry {
        CodecRegistry {
            codecs: self.codecs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::codec::CodecError;
    use crate::compression::codecs::ZlibCodec;

    struct FakeLzo;

    impl PageCodec for FakeLzo {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Lzo
        }

        fn compress(
            &self,
            _input: &[u8],
            _output: &mut [u8],
            _level: u32,
        ) -> std::result::Result<usize, CodecError> {
            Err(CodecError::internal(Algorithm::Lzo, "not implemented"))
        }

        fn decompress(
            &self,
            _input: &[u8],
            _output: &mut [u8],
        ) -> std::result::Result<usize, CodecError> {
            Err(CodecError::internal(Algorithm::Lzo, "not implemented"))
        }
    }

    struct Uncompressed;

    impl PageCodec for Uncompressed {
        fn algorithm(&self) -> Algorithm {
            Algorithm::None
        }

        fn compress(
            &self,
            _input: &[u8],
            _output: &mut [u8],
            _level: u32,
        ) -> std::result::Result<usize, CodecError> {
            Ok(0)
        }

        fn decompress(
            &self,
            _input: &[u8],
            _output: &mut [u8],
        ) -> std::result::Result<usize, CodecError> {
            Ok(0)
        }
    }

    #[test]
    fn test_builtin_has_zlib() {
        let registry = CodecRegistry::builtin();
        let codec = registry.lookup(Algorithm::Zlib.id()).unwrap();
        assert_eq!(codec.algorithm(), Algorithm::Zlib);
        assert!(registry.available().contains(&Algorithm::Zlib));
        assert!(!registry.contains(Algorithm::None));
    }

    #[cfg(all(feature = "lz4", feature = "snappy", feature = "lzma", feature = "bzip2"))]
    #[test]
    fn test_builtin_with_all_features() {
        let registry = CodecRegistry::builtin();
        assert_eq!(
            registry.available(),
            vec![
                Algorithm::Zlib,
                Algorithm::Lz4,
                Algorithm::Lzma,
                Algorithm::Bzip2,
                Algorithm::Snappy
            ]
        );
    }

    #[test]
    fn test_lookup_unknown_id() {
        let registry = CodecRegistry::builtin();
        assert_eq!(
            registry.lookup(0xFFFF_FFFF).err(),
            Some(Error::UnknownAlgorithm(0xFFFF_FFFF))
        );
    }

    #[test]
    fn test_lookup_known_but_unlinked() {
        let registry = CodecRegistry::builtin();
        assert_eq!(
            registry.lookup(Algorithm::Lzo.id()).err(),
            Some(Error::CodecUnavailable(Algorithm::Lzo))
        );
        assert_eq!(
            registry.lookup(Algorithm::None.id()).err(),
            Some(Error::CodecUnavailable(Algorithm::None))
        );
    }

    #[test]
    fn test_register_external_codec() {
        let registry = CodecRegistry::builder()
            .with(Box::new(FakeLzo))
            .unwrap()
            .with_builtin()
            .build();
        assert_eq!(registry.lookup(Algorithm::Lzo.id()).unwrap().name(), "LZO");
        assert!(registry.contains(Algorithm::Zlib));
    }

    #[test]
    fn test_register_rejects_duplicates_and_none() {
        let mut builder = CodecRegistry::builder();
        builder.register(Box::new(ZlibCodec)).unwrap();
        assert_eq!(
            builder.register(Box::new(ZlibCodec)).unwrap_err(),
            Error::DuplicateCodec(Algorithm::Zlib)
        );
        assert!(builder.register(Box::new(Uncompressed)).unwrap_err().is_invalid_input());

        let registry = builder.build();
        assert_eq!(registry.available(), vec![Algorithm::Zlib]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = CodecRegistry::builder().build();
        assert!(registry.available().is_empty());
        assert!(format!("{registry:?}").contains("available"));
    }
}
