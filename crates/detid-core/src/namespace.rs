//! # Namespace-Hash Identifiers — RFC 4122 / RFC 9562 Name-Based UUIDs
//!
//! Derives a UUID from a namespace and a name:
//!
//! 1. hash `namespace bytes ‖ name bytes` with the configured primitive,
//! 2. keep the leading 16 bytes (SHA-1 and SHA-256 digests are truncated),
//! 3. overwrite the version nibble (octet 6, high nibble) and the variant
//!    bits (octet 8, `10xx`).
//!
//! ## Determinism
//!
//! The output depends only on the namespace bytes, the name bytes, and the
//! algorithm. It is identical across processes, machines, and time. This
//! is what distinguishes these identifiers from [`crate::RandomGenerator`]
//! output.
//!
//! ## Empty Names
//!
//! [`NamespaceHashGenerator::derive`] rejects an empty textual name: an
//! empty name is a malformed request, not a degenerate valid one. Raw
//! content passed to [`NamespaceHashGenerator::derive_bytes`] may be empty.

use uuid::Uuid;

use crate::digest::{DigestAlgorithm, HashPrimitive};
use crate::error::IdentifierError;
use crate::generator::IdentifierGenerator;

/// The scope a name is derived within.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// A 128-bit namespace, hashed in its RFC byte order.
    Uuid(Uuid),
    /// A textual namespace, hashed as its UTF-8 bytes.
    Text(TextNamespace),
}

/// Non-empty namespace text. Built only through [`Namespace::text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextNamespace(String);

impl TextNamespace {
    /// The namespace text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TextNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Namespace {
    /// The RFC well-known namespace for fully-qualified domain names.
    pub const DNS: Self = Self::Uuid(Uuid::NAMESPACE_DNS);
    /// The RFC well-known namespace for URLs.
    pub const URL: Self = Self::Uuid(Uuid::NAMESPACE_URL);
    /// The RFC well-known namespace for ISO OIDs.
    pub const OID: Self = Self::Uuid(Uuid::NAMESPACE_OID);
    /// The RFC well-known namespace for X.500 distinguished names.
    pub const X500: Self = Self::Uuid(Uuid::NAMESPACE_X500);

    /// A textual namespace.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::EmptyNamespace` if `text` is empty.
    pub fn text(text: impl Into<String>) -> Result<Self, IdentifierError> {
        let text = text.into();
        if text.is_empty() {
            return Err(IdentifierError::EmptyNamespace);
        }
        Ok(Self::Text(TextNamespace(text)))
    }

    /// The bytes that prefix every name hashed in this namespace.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Uuid(id) => id.as_bytes(),
            Self::Text(text) => text.as_str().as_bytes(),
        }
    }
}

impl From<Uuid> for Namespace {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uuid(id) => write!(f, "{id}"),
            Self::Text(text) => write!(f, "text:{text}"),
        }
    }
}

impl std::str::FromStr for Namespace {
    type Err = IdentifierError;

    /// Accepts `dns`, `url`, `oid`, `x500`, a hyphenated UUID, or `text:<value>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(text) = s.strip_prefix("text:") {
            return Self::text(text);
        }
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(Self::DNS),
            "url" => Ok(Self::URL),
            "oid" => Ok(Self::OID),
            "x500" => Ok(Self::X500),
            other => Uuid::parse_str(other)
                .map(Self::Uuid)
                .map_err(|_| IdentifierError::InvalidNamespace(s.to_string())),
        }
    }
}

/// Stamp RFC version and variant bits onto 16 digest bytes.
pub fn stamp_version(mut bytes: [u8; 16], version: u8) -> Uuid {
    bytes[6] = (bytes[6] & 0x0f) | ((version & 0x0f) << 4);
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

/// Derives name-based UUIDs within one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceHashGenerator<H = DigestAlgorithm> {
    namespace: Namespace,
    hash: H,
}

impl NamespaceHashGenerator<DigestAlgorithm> {
    /// Version-3 (MD5) derivation.
    pub fn v3(namespace: Namespace) -> Self {
        Self::new(namespace, DigestAlgorithm::Md5)
    }

    /// Version-5 (SHA-1) derivation.
    pub fn v5(namespace: Namespace) -> Self {
        Self::new(namespace, DigestAlgorithm::Sha1)
    }

    /// Version-8 (SHA-256) derivation.
    pub fn v8(namespace: Namespace) -> Self {
        Self::new(namespace, DigestAlgorithm::Sha256)
    }
}

impl<H: HashPrimitive> NamespaceHashGenerator<H> {
    /// Bind a namespace and a hash primitive.
    pub fn new(namespace: Namespace, hash: H) -> Self {
        Self { namespace, hash }
    }

    /// The bound namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The algorithm identifiers are derived with.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.hash.algorithm()
    }

    /// Derive the identifier for a textual name.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::EmptyName` if `name` is empty.
    pub fn derive(&self, name: &str) -> Result<Uuid, IdentifierError> {
        if name.is_empty() {
            return Err(IdentifierError::EmptyName);
        }
        Ok(self.derive_bytes(name.as_bytes()))
    }

    /// Derive the identifier for arbitrary content bytes.
    pub fn derive_bytes(&self, content: &[u8]) -> Uuid {
        let digest = self.hash.digest(&[self.namespace.as_bytes(), content]);
        stamp_version(digest.leading_16(), digest.algorithm.uuid_version())
    }
}

/// A name-based generator bound to a single name.
///
/// Every call yields the same identifier.
#[derive(Debug, Clone)]
pub struct NamedGenerator<H = DigestAlgorithm> {
    id: Uuid,
    name: String,
    hasher: NamespaceHashGenerator<H>,
}

impl<H: HashPrimitive> NamedGenerator<H> {
    /// Bind `name` within the generator's namespace.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::EmptyName` if `name` is empty.
    pub fn new(
        hasher: NamespaceHashGenerator<H>,
        name: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let name = name.into();
        let id = hasher.derive(&name)?;
        Ok(Self { id, name, hasher })
    }

    /// The bound name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying namespace generator.
    pub fn hasher(&self) -> &NamespaceHashGenerator<H> {
        &self.hasher
    }
}

impl<H: HashPrimitive> IdentifierGenerator for NamedGenerator<H> {
    type Id = Uuid;

    fn next_id(&mut self) -> Result<Uuid, IdentifierError> {
        Ok(self.id)
    }

    fn default_id(&self) -> Uuid {
        Uuid::nil()
    }
}
