//! # Content Fingerprints
//!
//! A fingerprint is a name-based UUID whose "name" is the serialized form of
//! an arbitrary value. Two values with identical serializations share a
//! fingerprint, which makes fingerprints usable as content addresses for
//! cache hit/miss decisions.
//!
//! Equality is defined by the serializer output, not by `PartialEq` on the
//! value: with the default [`CanonicalJson`] serializer, a `HashMap` and a
//! `BTreeMap` holding the same entries fingerprint identically.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::{CanonicalJson, ValueSerializer};
use crate::digest::{DigestAlgorithm, HashPrimitive};
use crate::error::IdentifierError;
use crate::namespace::{Namespace, NamespaceHashGenerator};

/// The namespace fingerprints are derived in unless another is supplied.
pub const FINGERPRINT_NAMESPACE: Uuid = Uuid::from_u128(0x8f3c_1d2e_4b6a_4e57_9c1f_0a2d_3e4b_5c6d);

/// A content fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(Uuid);

impl Fingerprint {
    /// The sentinel fingerprint (all-zero).
    pub const NIL: Self = Self(Uuid::nil());

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether this is the sentinel.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Fingerprint> for Uuid {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Fingerprints values by hashing their serialization within a namespace.
#[derive(Debug, Clone)]
pub struct FingerprintGenerator<S = CanonicalJson, H = DigestAlgorithm> {
    serializer: S,
    hasher: NamespaceHashGenerator<H>,
}

impl FingerprintGenerator<CanonicalJson, DigestAlgorithm> {
    /// Canonical JSON, SHA-1 (version 5), in [`FINGERPRINT_NAMESPACE`].
    pub fn new() -> Self {
        Self::with_parts(
            CanonicalJson,
            NamespaceHashGenerator::v5(Namespace::Uuid(FINGERPRINT_NAMESPACE)),
        )
    }
}

impl Default for FingerprintGenerator<CanonicalJson, DigestAlgorithm> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ValueSerializer, H: HashPrimitive> FingerprintGenerator<S, H> {
    /// Combine a serializer with a namespace hash generator.
    pub fn with_parts(serializer: S, hasher: NamespaceHashGenerator<H>) -> Self {
        Self { serializer, hasher }
    }

    /// The namespace fingerprints are scoped to.
    pub fn namespace(&self) -> &Namespace {
        self.hasher.namespace()
    }

    /// Fingerprint a value.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Serialization` if the serializer rejects
    /// the value.
    pub fn fingerprint<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Fingerprint, IdentifierError> {
        let bytes = self.serializer.serialize(value)?;
        Ok(Fingerprint(self.hasher.derive_bytes(&bytes)))
    }

    /// The sentinel fingerprint.
    pub fn default_fingerprint(&self) -> Fingerprint {
        Fingerprint::NIL
    }
}
