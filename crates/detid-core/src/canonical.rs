//! # Canonical Serialization — Deterministic Byte Production
//!
//! Defines the `ValueSerializer` seam used by fingerprinting, and its
//! default implementation `CanonicalJson`, which produces `CanonicalBytes`.
//!
//! ## Invariant
//!
//! A fingerprint is only as stable as the bytes it is computed over. Two
//! structurally equal values must serialize to the same bytes regardless of
//! map insertion order or formatting choices. `CanonicalBytes` guarantees
//! this by routing every value through `serde_json::Value` and then RFC 8785
//! (JSON Canonicalization Scheme) output: sorted keys, compact separators,
//! canonical number rendering.
//!
//! Callers with their own deterministic encoding (a binary codec, a
//! hand-rolled layout) implement `ValueSerializer` directly.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Turns a value into the byte sequence that stands in for its identity.
///
/// Implementations must be deterministic: equal inputs yield equal bytes.
pub trait ValueSerializer {
    /// Serialize `value` to bytes.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError` if the value cannot be represented.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CanonicalizationError>;
}

/// RFC 8785 canonical JSON serializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalJson;

impl ValueSerializer for CanonicalJson {
    fn serialize<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        CanonicalBytes::new(value).map(CanonicalBytes::into_bytes)
    }
}

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted, separators are compact (RFC 8785).
/// - The bytes are valid UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (for example a map with non-string keys).
    pub fn new<T: Serialize + ?Sized>(obj: &T) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the owned byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_sorted_keys_compact_separators() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_bytes(), br#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_bytes(), br#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut first = HashMap::new();
        first.insert("zeta", 1);
        first.insert("alpha", 2);
        let mut second = BTreeMap::new();
        second.insert("alpha", 2);
        second.insert("zeta", 1);
        let a = CanonicalJson.serialize(&first).unwrap();
        let b = CanonicalJson.serialize(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_string_value() {
        let cb = CanonicalBytes::new("hello world").expect("string should work");
        assert_eq!(cb.as_bytes(), b"\"hello world\"");
        assert_eq!(cb.len(), 13);
        assert!(!cb.is_empty());
    }

    #[test]
    fn test_non_string_map_keys_rejected() {
        let mut data = HashMap::new();
        data.insert(vec![1u8], 1);
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"name": "\u{00e9}t\u{00e9}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{00e9}'));
    }
}
