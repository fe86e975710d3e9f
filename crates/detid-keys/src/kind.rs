//! # Key Kinds
//!
//! A [`KeyKind`] fixes the representation of a cache key and the rule that
//! folds partial keys into one. Two kinds are provided:
//!
//! | Kind | Key | Partial key of a scalar | Aggregation |
//! |------|-----|-------------------------|-------------|
//! | [`TextKey`] | `String` | canonical text | `{Type:{attr:value}}` concatenation |
//! | [`UuidKey`] | `Uuid` | v5 hash of the canonical text | XOR fold ([`crate::combine`]) |
//!
//! Text keys are readable and collision free for distinct attribute
//! values. Type and attribute names are escaped (`\`, `{`, `}` and `:` get
//! a leading backslash) so a name cannot forge the template around it.
//! UUID keys are fixed width but only as collision resistant as the
//! XOR fold.

use std::fmt::Debug;

use uuid::Uuid;

use detid_core::{Namespace, NamespaceHashGenerator, Ticks};

use crate::attribute::{Scalar, TypeToken};
use crate::combine;

/// Namespace in which [`UuidKey`] hashes scalar text.
pub const SCALAR_NAMESPACE: Uuid = Uuid::from_u128(0x3b9e_6c41_d27a_4f08_a5c3_71e0_94bd_2f16);

/// Namespace in which [`UuidKey`] hashes tick counts.
pub const TEMPORAL_NAMESPACE: Uuid = Uuid::from_u128(0x6d20_f7a8_1c5e_4b93_8e47_0fa2_c3d9_5b81);

/// Namespace in which [`UuidKey`] hashes sequence lengths.
pub const SEQUENCE_NAMESPACE: Uuid = Uuid::from_u128(0x9c41_52e0_7b3d_4a6f_b218_d5c7_0e94_a36b);

/// Marker rendered by [`TextKey`] for an absent value.
pub const TEXT_NULL: &str = "null";

/// Representation and combination rule of a cache key.
pub trait KeyKind {
    /// The key type.
    type Key: Clone + PartialEq + Debug;

    /// Contribution of an absent value.
    fn null_key() -> Self::Key;

    /// Partial key of a scalar.
    fn scalar_key(scalar: &Scalar) -> Self::Key;

    /// Partial key of a 128-bit identifier.
    fn identifier_key(id: Uuid) -> Self::Key;

    /// Partial key of an instant.
    fn ticks_key(ticks: Ticks) -> Self::Key;

    /// Partial key of a type identity.
    fn type_key(token: TypeToken) -> Self::Key;

    /// Wrap the key of one sequence element.
    fn element_key(key: Self::Key) -> Self::Key {
        key
    }

    /// Fold the element keys of a sequence.
    ///
    /// Must not yield [`KeyKind::null_key`], even for an empty sequence.
    fn sequence_key(elements: Vec<Self::Key>) -> Self::Key {
        Self::aggregate(elements)
    }

    /// Bind a partial key to the attribute it came from.
    fn attribute_key(type_name: &str, attribute: &str, key: Self::Key) -> Self::Key;

    /// Fold partial keys in order.
    fn aggregate<I: IntoIterator<Item = Self::Key>>(keys: I) -> Self::Key;
}

/// Human-readable string keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextKey;

impl KeyKind for TextKey {
    type Key = String;

    fn null_key() -> String {
        TEXT_NULL.to_string()
    }

    fn scalar_key(scalar: &Scalar) -> String {
        scalar.canonical_text()
    }

    fn identifier_key(id: Uuid) -> String {
        id.hyphenated().to_string()
    }

    fn ticks_key(ticks: Ticks) -> String {
        format!("@{ticks}")
    }

    fn type_key(token: TypeToken) -> String {
        format!("#{}", token.id().hyphenated())
    }

    fn element_key(key: String) -> String {
        format!("[{key}]")
    }

    fn attribute_key(type_name: &str, attribute: &str, key: String) -> String {
        let type_name = escape_name(type_name);
        let attribute = escape_name(attribute);
        format!("{{{type_name}:{{{attribute}:{key}}}}}")
    }

    fn aggregate<I: IntoIterator<Item = String>>(keys: I) -> String {
        keys.into_iter().collect()
    }
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '{' | '}' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Fixed-width 128-bit keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidKey;

impl KeyKind for UuidKey {
    type Key = Uuid;

    fn null_key() -> Uuid {
        Uuid::nil()
    }

    fn scalar_key(scalar: &Scalar) -> Uuid {
        NamespaceHashGenerator::v5(Namespace::Uuid(SCALAR_NAMESPACE))
            .derive_bytes(scalar.canonical_text().as_bytes())
    }

    fn identifier_key(id: Uuid) -> Uuid {
        id
    }

    fn ticks_key(ticks: Ticks) -> Uuid {
        NamespaceHashGenerator::v5(Namespace::Uuid(TEMPORAL_NAMESPACE))
            .derive_bytes(ticks.to_string().as_bytes())
    }

    fn type_key(token: TypeToken) -> Uuid {
        token.id()
    }

    /// Seeds the fold with a hash of the element count, so no sequence
    /// folds to nil.
    fn sequence_key(elements: Vec<Uuid>) -> Uuid {
        let seed = NamespaceHashGenerator::v5(Namespace::Uuid(SEQUENCE_NAMESPACE))
            .derive_bytes(elements.len().to_string().as_bytes());
        combine::fold(std::iter::once(seed).chain(elements))
    }

    fn attribute_key(_type_name: &str, _attribute: &str, key: Uuid) -> Uuid {
        key
    }

    fn aggregate<I: IntoIterator<Item = Uuid>>(keys: I) -> Uuid {
        combine::fold(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_template() {
        let key = TextKey::attribute_key("Order", "id", TextKey::scalar_key(&Scalar::Integer(7)));
        assert_eq!(key, "{Order:{id:7}}");
    }

    #[test]
    fn test_text_names_are_escaped() {
        let one = || TextKey::scalar_key(&Scalar::Integer(1));
        assert_eq!(TextKey::attribute_key("A", "b:{c", one()), r"{A:{b\:\{c:1}}");
        assert_ne!(
            TextKey::attribute_key("A", "b:{c", one()),
            TextKey::attribute_key("A:{b", "c", one())
        );
        assert_eq!(TextKey::attribute_key(r"a\", "}", one()), r"{a\\:{\}:1}}");
    }

    #[test]
    fn test_text_sequence_key_concatenates() {
        assert_eq!(TextKey::sequence_key(vec!["[1]".into(), "[2]".into()]), "[1][2]");
        assert_ne!(TextKey::sequence_key(Vec::new()), TextKey::null_key());
    }

    #[test]
    fn test_text_null_differs_from_quoted_zero() {
        assert_ne!(TextKey::null_key(), TextKey::scalar_key(&Scalar::Text("0".into())));
        assert_ne!(TextKey::null_key(), TextKey::scalar_key(&Scalar::Text("null".into())));
    }

    #[test]
    fn test_text_identifier_is_hyphenated_lowercase() {
        let id = Uuid::from_u128(0xABCD_EF00_0000_4000_8000_0000_0000_0001);
        assert_eq!(TextKey::identifier_key(id), "abcdef00-0000-4000-8000-000000000001");
    }

    #[test]
    fn test_text_ticks_and_type() {
        assert_eq!(TextKey::ticks_key(Ticks(42)), "@42");
        let token = TypeToken::new(Uuid::nil());
        assert_eq!(TextKey::type_key(token), "#00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_text_aggregate_concatenates_in_order() {
        let keys = vec!["a".to_string(), "b".to_string()];
        assert_eq!(TextKey::aggregate(keys), "ab");
        assert_eq!(TextKey::aggregate(Vec::new()), "");
    }

    #[test]
    fn test_uuid_scalar_key_is_v5_and_not_null() {
        let key = UuidKey::scalar_key(&Scalar::Text("0".into()));
        assert_eq!(key.get_version_num(), 5);
        assert_ne!(key, UuidKey::null_key());
        assert_eq!(key, UuidKey::scalar_key(&Scalar::Text("0".into())));
        assert_ne!(key, UuidKey::scalar_key(&Scalar::Integer(0)));
    }

    #[test]
    fn test_uuid_ticks_key_depends_on_ticks() {
        assert_ne!(UuidKey::ticks_key(Ticks(1)), UuidKey::ticks_key(Ticks(2)));
        assert_ne!(UuidKey::ticks_key(Ticks(1)), UuidKey::scalar_key(&Scalar::Integer(1)));
    }

    #[test]
    fn test_uuid_sequence_key_never_null() {
        let null = UuidKey::null_key();
        let empty = UuidKey::sequence_key(Vec::new());
        let one_null = UuidKey::sequence_key(vec![null]);
        let two_nulls = UuidKey::sequence_key(vec![null, null]);
        assert_ne!(empty, null);
        assert_ne!(one_null, null);
        assert_ne!(two_nulls, null);
        assert_ne!(empty, one_null);
        assert_ne!(one_null, two_nulls);
        let a = UuidKey::scalar_key(&Scalar::Integer(1));
        let b = UuidKey::scalar_key(&Scalar::Integer(2));
        assert_ne!(UuidKey::sequence_key(vec![a, b]), UuidKey::sequence_key(vec![b, a]));
    }

    #[test]
    fn test_uuid_passthroughs() {
        let id = Uuid::from_u128(99);
        assert_eq!(UuidKey::identifier_key(id), id);
        assert_eq!(UuidKey::type_key(TypeToken::new(id)), id);
        assert_eq!(UuidKey::attribute_key("T", "a", id), id);
        assert_eq!(UuidKey::element_key(id), id);
    }
}
