use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::{Serialize, Serializer};
use std::fmt;

pub const MD5: &str = "MD5";
pub const SHA1: &str = "SHA-1";
pub const SHA256: &str = "SHA-256";
pub const SHA384: &str = "SHA-384";
pub const SHA512: &str = "SHA-512";
pub const SHA3_256: &str = "SHA3-256";
pub const SHA3_384: &str = "SHA3-384";
pub const SHA3_512: &str = "SHA3-512";
pub const BLAKE2B_256: &str = "BLAKE2b-256";
pub const BLAKE2B_384: &str = "BLAKE2b-384";
pub const BLAKE2B_512: &str = "BLAKE2b-512";
pub const BLAKE3: &str = "BLAKE3";

/// Canonical algorithm names, in match order.
const CANONICAL_ALGORITHMS: [&str; 12] = [
    MD5,
    SHA1,
    SHA256,
    SHA384,
    SHA512,
    SHA3_256,
    SHA3_384,
    SHA3_512,
    BLAKE2B_256,
    BLAKE2B_384,
    BLAKE2B_512,
    BLAKE3,
];

/// A supported checksum algorithm
///
/// The only way to obtain a value is [`ChecksumAlgorithm::resolve`], so every
/// instance holds exactly one of the canonical names above, never the
/// caller's spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumAlgorithm {
    name: &'static str,
}

impl ChecksumAlgorithm {
    /// Resolves a loosely spelled algorithm name
    ///
    /// Matching ignores ASCII case, and hyphens of the canonical name may be
    /// left out: `SHA-256`, `sha-256` and `sha256` all resolve to `SHA-256`.
    /// Candidates are tried in declaration order and the first match wins.
    ///
    /// # Errors
    /// Returns [`SbomError::UnsupportedAlgorithm`] carrying the input when no
    /// candidate matches.
    pub fn resolve(input: &str) -> Result<Self> {
        CANONICAL_ALGORITHMS
            .iter()
            .copied()
            .find(|candidate| {
                candidate.eq_ignore_ascii_case(input)
                    || candidate.replace('-', "").eq_ignore_ascii_case(input)
            })
            .map(|name| Self { name })
            .ok_or_else(|| {
                SbomError::UnsupportedAlgorithm {
                    input: input.to_string(),
                }
                .into()
            })
    }

    pub fn as_str(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for ChecksumAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Checksum value object: a resolved algorithm plus the hex digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksum {
    algorithm: ChecksumAlgorithm,
    hash: String,
}

impl Checksum {
    pub fn new(algorithm: ChecksumAlgorithm, hash: impl Into<String>) -> Self {
        Self {
            algorithm,
            hash: hash.into(),
        }
    }

    /// Parses an `<algorithm>:<hash>` string such as `sha256:ca9ef23a...`
    ///
    /// # Errors
    /// Returns a validation error when the separator or either half is
    /// missing, and [`SbomError::UnsupportedAlgorithm`] for unknown algorithms.
    pub fn parse(value: &str) -> Result<Self> {
        let (algorithm, hash) = value
            .split_once(':')
            .filter(|(a, h)| !a.is_empty() && !h.is_empty())
            .ok_or_else(|| SbomError::Validation {
                message: format!(
                    "checksum '{}' must have the form <algorithm>:<hash>",
                    value
                ),
            })?;

        Ok(Self::new(ChecksumAlgorithm::resolve(algorithm)?, hash))
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
