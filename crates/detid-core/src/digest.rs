//! # Hash Primitives — Scoped Digest Computation
//!
//! Defines `DigestAlgorithm`, `ContentDigest`, and the `HashPrimitive`
//! seam consumed by name-based identifier derivation.
//!
//! ## Invariant
//!
//! A `HashPrimitive` holds no hasher state. Every call to
//! [`HashPrimitive::digest`] creates a fresh hasher, feeds it, and drops it,
//! so a single primitive can be shared across threads without locking.
//!
//! ## UUID Versions
//!
//! | Algorithm | Digest width | UUID version |
//! |-----------|--------------|--------------|
//! | MD5       | 16 bytes     | 3            |
//! | SHA-1     | 20 bytes     | 5            |
//! | SHA-256   | 32 bytes     | 8 (RFC 9562 Appendix B.2) |

use digest::Digest;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::IdentifierError;

/// The hash algorithm used to produce a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5: name-based UUID version 3.
    Md5,
    /// SHA-1: name-based UUID version 5.
    Sha1,
    /// SHA-256: name-based UUID version 8.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Width of the raw digest in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// The UUID version nibble stamped on identifiers derived with this algorithm.
    pub fn uuid_version(&self) -> u8 {
        match self {
            Self::Md5 => 3,
            Self::Sha1 => 5,
            Self::Sha256 => 8,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(IdentifierError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw digest, `algorithm.output_len()` bytes long.
    pub bytes: Vec<u8>,
}

impl ContentDigest {
    /// Create a new digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// The leading 16 bytes, zero-padded if the digest is shorter.
    pub fn leading_16(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        let n = self.bytes.len().min(16);
        out[..n].copy_from_slice(&self.bytes[..n]);
        out
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// A cryptographic hash usable for name-based identifier derivation.
pub trait HashPrimitive: Send + Sync {
    /// The algorithm this primitive computes.
    fn algorithm(&self) -> DigestAlgorithm;

    /// Hash the concatenation of `chunks` with a fresh hasher.
    fn digest(&self, chunks: &[&[u8]]) -> ContentDigest;
}

impl HashPrimitive for DigestAlgorithm {
    fn algorithm(&self) -> DigestAlgorithm {
        *self
    }

    fn digest(&self, chunks: &[&[u8]]) -> ContentDigest {
        let bytes = match self {
            Self::Md5 => hash_chunks::<Md5>(chunks),
            Self::Sha1 => hash_chunks::<Sha1>(chunks),
            Self::Sha256 => hash_chunks::<Sha256>(chunks),
        };
        ContentDigest::new(*self, bytes)
    }
}

fn hash_chunks<D: Digest>(chunks: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for &chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().to_vec()
}
