//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout detid. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure is local and synchronous. Nothing in this workspace
//!   represents a transient condition, so nothing is retried.
//! - Construction errors surface at construction, never on first use.
//! - Key derivation errors name the attribute and the offending value kind.

use thiserror::Error;

/// Top-level error type for detid.
#[derive(Error, Debug)]
pub enum DetidError {
    /// Identifier generation failed.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// Formal Public Identifier construction or parsing failed.
    #[error("fpi error: {0}")]
    Fpi(#[from] FpiError),

    /// Cache key derivation failed.
    #[error("cache key error: {0}")]
    Key(#[from] KeyError),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in identifier generation.
#[derive(Error, Debug)]
pub enum IdentifierError {
    /// A name-based identifier was requested for an empty name.
    #[error("name must not be empty")]
    EmptyName,

    /// A text namespace was empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// A namespace string could not be interpreted.
    #[error("invalid namespace {0:?}: expected dns, url, oid, x500, a UUID, or text:<value>")]
    InvalidNamespace(String),

    /// The hash algorithm has no name-based UUID version.
    #[error("unknown hash algorithm {0:?}: expected md5, sha1, or sha256")]
    UnknownAlgorithm(String),

    /// A sequential generator ran past the maximum of its value type.
    #[error("sequence exhausted at {0}")]
    SequenceExhausted(String),

    /// The value to fingerprint could not be serialized.
    #[error("fingerprint serialization failed: {0}")]
    Serialization(#[from] CanonicalizationError),
}

/// Error in Formal Public Identifier handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FpiError {
    /// The text does not match `<prefix>//<author>//<product>[ <description>]//<language>`.
    #[error("malformed formal public identifier: {0:?}")]
    Malformed(String),

    /// A mandatory field was empty.
    #[error("formal public identifier field {0} must not be empty")]
    MissingField(&'static str),

    /// A standard identifier was constructed without a reference.
    #[error("standard formal public identifier requires a reference")]
    MissingReference,
}

/// Error in composite cache key derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A build was requested with an empty selector set.
    #[error("at least one attribute selector is required")]
    NoSelectors,

    /// A multi-instance build was requested with no instances.
    #[error("at least one value is required")]
    NoValues,

    /// An attribute resolved to a value kind that has no key derivation.
    #[error("attribute {attribute} holds a value of kind {kind}, which is not key-derivable")]
    NotKeyDerivable {
        /// Name of the selected attribute.
        attribute: String,
        /// Description of the offending value kind.
        kind: String,
    },
}
