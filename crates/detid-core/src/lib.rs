//! # detid-core — Deterministic Identifiers
//!
//! Identifier generators and structured identifiers that produce stable,
//! reproducible values:
//!
//! - [`RandomGenerator`]: version-4 UUIDs from a cryptographic source.
//! - [`SequentialGenerator`]: monotonic counter with a FIFO reuse pool.
//! - [`NamespaceHashGenerator`]: RFC 4122/9562 name-based UUIDs
//!   (version 3 over MD5, version 5 over SHA-1, version 8 over SHA-256).
//! - [`FingerprintGenerator`]: name-based UUIDs over the canonical
//!   serialization of arbitrary values.
//! - [`Fpi`]: Formal Public Identifiers with a strict text grammar.
//!
//! ## Key Design Principles
//!
//! 1. **No I/O.** Every operation is synchronous and CPU bound.
//!
//! 2. **Scoped hashing.** [`HashPrimitive`] implementations create a fresh
//!    hasher per call; generators hold no hasher state and are `Send + Sync`.
//!
//! 3. **Fail at the boundary.** Empty names, empty namespaces, malformed
//!    FPI text, and unserializable values are rejected with typed errors.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod fpi;
pub mod generator;
pub mod namespace;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::{CanonicalBytes, CanonicalJson, ValueSerializer};
pub use digest::{ContentDigest, DigestAlgorithm, HashPrimitive};
pub use error::{CanonicalizationError, DetidError, FpiError, IdentifierError, KeyError};
pub use fingerprint::{Fingerprint, FingerprintGenerator, FINGERPRINT_NAMESPACE};
pub use fpi::{ApprovalStatus, Fpi};
pub use generator::{
    IdentifierGenerator, RandomGenerator, ReusableGenerator, SequenceValue, SequentialGenerator,
};
pub use namespace::{NamedGenerator, Namespace, NamespaceHashGenerator, TextNamespace};
pub use temporal::Ticks;
