//! Digest algorithm selection.

use strum::{Display, EnumString, IntoStaticStr};

/// Hash function used for every record of an inventory run.
///
/// Parsed from the lowercase command line tokens (`sha256`, `crc32`, `md5`,
/// `sha1`) and threaded explicitly to every digest computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Algorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// CRC-32 checksum (IEEE polynomial, as used by zlib).
    Crc32,
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
}

impl Algorithm {
    /// Number of hex characters in a digest produced by this algorithm.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Sha256 => 64,
            Algorithm::Sha1 => 40,
            Algorithm::Md5 => 32,
            Algorithm::Crc32 => 8,
        }
    }

    /// Lowercase name as shown in report headers.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether digests are rendered in uppercase hex.
    pub fn is_uppercase(self) -> bool {
        matches!(self, Algorithm::Crc32)
    }
}
