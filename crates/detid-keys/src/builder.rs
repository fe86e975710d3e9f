//! # Cache Key Builder
//!
//! Derives one composite key from the selected attributes of a value, or
//! of several values.
//!
//! ## Derivation
//!
//! Each selected attribute is converted to an [`AttributeValue`] and given
//! a partial key by the builder's [`KeyKind`]. Nested values recurse
//! through their own attributes. Sequences key each element and fold the
//! element keys with [`KeyKind::sequence_key`], so an empty sequence is not
//! the null key. Partial keys are then bound to their attribute name and
//! folded in selector order.
//!
//! ## Deduplication
//!
//! Selectors sharing a name contribute once (the first one wins). In a
//! multi-instance build, `None` entries are skipped and equal instances
//! contribute once, in order of first occurrence.
//!
//! ## Errors
//!
//! A build without selectors fails with [`KeyError::NoSelectors`], as does
//! a nested value whose own schema selects nothing. A
//! multi-instance build over an empty list with [`KeyError::NoValues`],
//! and an attribute of a kind with no key derivation with
//! [`KeyError::NotKeyDerivable`]. A multi-instance build whose entries are
//! all `None` yields the null key.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::marker::PhantomData;

use detid_core::{KeyError, Ticks};

use crate::attribute::{Attribute, AttributeValue, NestedValue};
use crate::kind::{KeyKind, TextKey, UuidKey};
use crate::schema::{KeySchema, Keyed};

/// Builds composite keys of kind `K`.
#[derive(Debug, Clone, Copy)]
pub struct CacheKeyBuilder<K> {
    kind: PhantomData<K>,
}

/// Builder of readable string keys.
pub type TextKeyBuilder = CacheKeyBuilder<TextKey>;

/// Builder of 128-bit keys.
pub type UuidKeyBuilder = CacheKeyBuilder<UuidKey>;

impl<K: KeyKind> Default for CacheKeyBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeyKind> CacheKeyBuilder<K> {
    /// A builder.
    pub fn new() -> Self {
        Self { kind: PhantomData }
    }

    /// The key of an absent value.
    pub fn null_key(&self) -> K::Key {
        K::null_key()
    }

    /// Key of one value over the schema's selectors.
    ///
    /// # Errors
    ///
    /// `KeyError::NoSelectors` for an empty schema;
    /// `KeyError::NotKeyDerivable` if a selected attribute has no key
    /// derivation.
    pub fn build<T>(&self, value: &T, schema: &KeySchema<T>) -> Result<K::Key, KeyError> {
        if schema.is_empty() {
            return Err(KeyError::NoSelectors);
        }
        let attributes = schema
            .selectors()
            .iter()
            .map(|selector| (selector.name(), selector.select(value)));
        self.attributes_key(schema.type_name(), "", attributes)
    }

    /// Key of a value through its own default schema.
    ///
    /// # Errors
    ///
    /// As [`CacheKeyBuilder::build`].
    pub fn build_default<T: Keyed>(&self, value: &T) -> Result<K::Key, KeyError> {
        self.build(value, &T::key_schema())
    }

    /// Key of several values over the same selectors.
    ///
    /// # Errors
    ///
    /// `KeyError::NoSelectors` for an empty schema; `KeyError::NoValues`
    /// for an empty list; and any error of a per-instance build.
    pub fn build_many<'a, T, I>(&self, values: I, schema: &KeySchema<T>) -> Result<K::Key, KeyError>
    where
        T: PartialEq + 'a,
        I: IntoIterator<Item = Option<&'a T>>,
    {
        if schema.is_empty() {
            return Err(KeyError::NoSelectors);
        }
        let mut any = false;
        let mut survivors: Vec<&T> = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            any = true;
            match value {
                None => tracing::trace!(index, "skipping absent instance"),
                Some(v) if survivors.contains(&v) => {
                    tracing::debug!(index, "skipping duplicate instance");
                }
                Some(v) => survivors.push(v),
            }
        }
        if !any {
            return Err(KeyError::NoValues);
        }
        if survivors.is_empty() {
            return Ok(K::null_key());
        }
        let keys = survivors
            .into_iter()
            .map(|value| self.build(value, schema))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(K::aggregate(keys))
    }

    fn attributes_key<'n, V: Borrow<AttributeValue>>(
        &self,
        type_name: &str,
        path: &str,
        attributes: impl Iterator<Item = (&'n str, V)>,
    ) -> Result<K::Key, KeyError> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for (name, value) in attributes {
            if !seen.insert(name) {
                tracing::debug!(type_name, attribute = name, "ignoring duplicate selector");
                continue;
            }
            let attr_path = if path.is_empty() {
                name.to_string()
            } else {
                format!("{path}.{name}")
            };
            let key = self.value_key(&attr_path, value.borrow())?;
            keys.push(K::attribute_key(type_name, name, key));
        }
        Ok(K::aggregate(keys))
    }

    fn nested_key(&self, path: &str, nested: &NestedValue) -> Result<K::Key, KeyError> {
        if nested.attributes.is_empty() {
            return Err(KeyError::NoSelectors);
        }
        let attributes = nested
            .attributes
            .iter()
            .map(|Attribute { name, value }| (&**name, value));
        self.attributes_key(&nested.type_name, path, attributes)
    }

    fn value_key(&self, path: &str, value: &AttributeValue) -> Result<K::Key, KeyError> {
        let key = match value {
            AttributeValue::Null => K::null_key(),
            AttributeValue::Scalar(scalar) => K::scalar_key(scalar),
            AttributeValue::Identifier(id) => K::identifier_key(*id),
            AttributeValue::DateTime(dt) => K::ticks_key(Ticks::from_datetime(dt)),
            AttributeValue::Nested(nested) => self.nested_key(path, nested)?,
            AttributeValue::Sequence(items) => {
                let keys = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.value_key(&format!("{path}[{i}]"), item)
                            .map(K::element_key)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                K::sequence_key(keys)
            }
            AttributeValue::TypeToken(token) => K::type_key(*token),
            AttributeValue::Unsupported(kind) => {
                return Err(KeyError::NotKeyDerivable {
                    attribute: path.to_string(),
                    kind: kind.clone(),
                })
            }
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{ToAttribute, TypeToken};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        sku: String,
        qty: u32,
    }

    impl Keyed for Line {
        const TYPE_ID: Uuid = Uuid::from_u128(0x11);

        fn key_schema() -> KeySchema<Self> {
            KeySchema::new("Line").field("sku", |l: &Line| &l.sku).field("qty", |l: &Line| &l.qty)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: u64,
        note: Option<String>,
        lines: Vec<Line>,
    }

    fn order() -> Order {
        Order {
            id: 7,
            note: None,
            lines: vec![
                Line { sku: "A".into(), qty: 1 },
                Line { sku: "B".into(), qty: 2 },
            ],
        }
    }

    fn id_note() -> KeySchema<Order> {
        KeySchema::new("Order").field("id", |o: &Order| &o.id).field("note", |o: &Order| &o.note)
    }

    #[test]
    fn test_text_key_template() {
        let key = TextKeyBuilder::new().build(&order(), &id_note()).unwrap();
        assert_eq!(key, "{Order:{id:7}}{Order:{note:null}}");
    }

    #[test]
    fn test_build_is_stable() {
        let a = UuidKeyBuilder::new().build(&order(), &id_note()).unwrap();
        let b = UuidKeyBuilder::new().build(&order(), &id_note()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_selector_order_matters() {
        let reversed = KeySchema::new("Order")
            .field("note", |o: &Order| &o.note)
            .field("id", |o: &Order| &o.id);
        let text = TextKeyBuilder::new();
        assert_ne!(
            text.build(&order(), &id_note()).unwrap(),
            text.build(&order(), &reversed).unwrap()
        );

        let with_sku = |first: &'static str| {
            let schema = KeySchema::<Line>::new("Line");
            if first == "sku" {
                schema.field("sku", |l: &Line| &l.sku).field("qty", |l: &Line| &l.qty)
            } else {
                schema.field("qty", |l: &Line| &l.qty).field("sku", |l: &Line| &l.sku)
            }
        };
        let line = Line { sku: "X".into(), qty: 3 };
        let binary = UuidKeyBuilder::new();
        assert_ne!(
            binary.build(&line, &with_sku("sku")).unwrap(),
            binary.build(&line, &with_sku("qty")).unwrap()
        );
    }

    #[test]
    fn test_null_differs_from_string_zero() {
        let schema = KeySchema::new("Order").field("note", |o: &Order| &o.note);
        let mut with_zero = order();
        with_zero.note = Some("0".into());

        let text = TextKeyBuilder::new();
        assert_ne!(
            text.build(&order(), &schema).unwrap(),
            text.build(&with_zero, &schema).unwrap()
        );

        let binary = UuidKeyBuilder::new();
        let null = binary.build(&order(), &schema).unwrap();
        assert_eq!(null, binary.null_key());
        assert_ne!(null, binary.build(&with_zero, &schema).unwrap());
    }

    #[test]
    fn test_no_selectors_rejected() {
        let empty = KeySchema::<Order>::new("Order");
        assert_eq!(TextKeyBuilder::new().build(&order(), &empty), Err(KeyError::NoSelectors));
        assert_eq!(
            UuidKeyBuilder::new().build_many([Some(&order())], &empty),
            Err(KeyError::NoSelectors)
        );
    }

    #[test]
    fn test_duplicate_selectors_contribute_once() {
        let doubled = KeySchema::new("Order")
            .field("id", |o: &Order| &o.id)
            .field("id", |o: &Order| &o.note)
            .field("note", |o: &Order| &o.note);
        let text = TextKeyBuilder::new();
        assert_eq!(
            text.build(&order(), &doubled).unwrap(),
            text.build(&order(), &id_note()).unwrap()
        );
    }

    #[test]
    fn test_nested_sequence_text() {
        let schema = KeySchema::new("Order").select("lines", |o: &Order| {
            AttributeValue::Sequence(o.lines.iter().map(AttributeValue::nested).collect())
        });
        let key = TextKeyBuilder::new().build(&order(), &schema).unwrap();
        assert_eq!(
            key,
            "{Order:{lines:[{Line:{sku:\"A\"}}{Line:{qty:1}}][{Line:{sku:\"B\"}}{Line:{qty:2}}]}}"
        );
    }

    #[test]
    fn test_sequence_order_matters_in_binary_keys() {
        let schema = KeySchema::new("Order").select("lines", |o: &Order| {
            AttributeValue::Sequence(o.lines.iter().map(AttributeValue::nested).collect())
        });
        let mut swapped = order();
        swapped.lines.reverse();
        let binary = UuidKeyBuilder::new();
        assert_ne!(
            binary.build(&order(), &schema).unwrap(),
            binary.build(&swapped, &schema).unwrap()
        );
    }

    #[test]
    fn test_build_default_uses_own_schema() {
        let line = Line { sku: "A".into(), qty: 1 };
        let text = TextKeyBuilder::new();
        assert_eq!(
            text.build_default(&line).unwrap(),
            text.build(&line, &Line::key_schema()).unwrap()
        );
    }

    #[derive(Debug)]
    struct Bare;

    impl Keyed for Bare {
        const TYPE_ID: Uuid = Uuid::from_u128(0x12);

        fn key_schema() -> KeySchema<Self> {
            KeySchema::new("Bare")
        }
    }

    #[derive(Debug)]
    struct Outer {
        inner: Bare,
    }

    #[test]
    fn test_nested_value_without_selectors_rejected() {
        let outer = Outer { inner: Bare };
        let schema =
            KeySchema::<Outer>::new("Outer").select("inner", |o| AttributeValue::nested(&o.inner));
        let text = TextKeyBuilder::new();
        let binary = UuidKeyBuilder::new();
        assert_eq!(text.build_default(&Bare).unwrap_err(), KeyError::NoSelectors);
        assert_eq!(text.build(&outer, &schema).unwrap_err(), KeyError::NoSelectors);
        assert_eq!(binary.build(&outer, &schema).unwrap_err(), KeyError::NoSelectors);
    }

    #[derive(Debug)]
    struct Tagged {
        tags: Option<Vec<Option<u32>>>,
    }

    fn tags_schema() -> KeySchema<Tagged> {
        KeySchema::new("Tagged").field("tags", |t: &Tagged| &t.tags)
    }

    #[test]
    fn test_empty_sequence_is_not_null_in_binary_keys() {
        let builder = UuidKeyBuilder::new();
        let build = |tags| builder.build(&Tagged { tags }, &tags_schema()).unwrap();
        let null = build(None);
        let empty = build(Some(vec![]));
        let one_null = build(Some(vec![None]));
        let two_nulls = build(Some(vec![None, None]));
        assert_eq!(null, UuidKey::null_key());
        assert_ne!(empty, UuidKey::null_key());
        assert_ne!(one_null, UuidKey::null_key());
        assert_ne!(empty, one_null);
        assert_ne!(one_null, two_nulls);
        assert_ne!(build(Some(vec![Some(0)])), null);
    }

    #[test]
    fn test_empty_sequence_is_not_null_in_text_keys() {
        let builder = TextKeyBuilder::new();
        let build = |tags| builder.build(&Tagged { tags }, &tags_schema()).unwrap();
        assert_eq!(build(None), "{Tagged:{tags:null}}");
        assert_eq!(build(Some(vec![])), "{Tagged:{tags:}}");
        assert_eq!(build(Some(vec![None])), "{Tagged:{tags:[null]}}");
    }

    #[test]
    fn test_type_token_and_datetime() {
        let at = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let schema = KeySchema::<Order>::new("Order")
            .select("kind", |_| TypeToken::of::<Line>().to_attribute())
            .select("at", move |_| at.to_attribute());
        let key = TextKeyBuilder::new().build(&order(), &schema).unwrap();
        assert_eq!(
            key,
            "{Order:{kind:#00000000-0000-0000-0000-000000000011}}{Order:{at:@621355968000000000}}"
        );
    }

    #[test]
    fn test_unsupported_names_attribute_path() {
        let schema = KeySchema::<Order>::new("Order").select("meta", |_| {
            AttributeValue::Sequence(vec![AttributeValue::Unsupported("JSON object".into())])
        });
        let err = TextKeyBuilder::new().build(&order(), &schema).unwrap_err();
        assert_eq!(
            err,
            KeyError::NotKeyDerivable {
                attribute: "meta[0]".into(),
                kind: "JSON object".into(),
            }
        );
    }

    #[test]
    fn test_build_many_dedupes_and_skips_none() {
        let a = Line { sku: "A".into(), qty: 1 };
        let b = Line { sku: "B".into(), qty: 2 };
        let schema = Line::key_schema();
        let text = TextKeyBuilder::new();

        let many = text.build_many([Some(&a), None, Some(&b), Some(&a)], &schema).unwrap();
        let expected = format!(
            "{}{}",
            text.build(&a, &schema).unwrap(),
            text.build(&b, &schema).unwrap()
        );
        assert_eq!(many, expected);
    }

    #[test]
    fn test_build_many_single_instance_equals_build() {
        let a = Line { sku: "A".into(), qty: 1 };
        let schema = Line::key_schema();
        let binary = UuidKeyBuilder::new();
        assert_eq!(
            binary.build_many([Some(&a)], &schema).unwrap(),
            binary.build(&a, &schema).unwrap()
        );
    }

    #[test]
    fn test_build_many_edge_cases() {
        let schema = Line::key_schema();
        let binary = UuidKeyBuilder::new();
        let none: [Option<&Line>; 0] = [];
        assert_eq!(binary.build_many(none, &schema), Err(KeyError::NoValues));
        assert_eq!(binary.build_many([None, None], &schema), Ok(Uuid::nil()));
        assert_eq!(
            TextKeyBuilder::new().build_many([None::<&Line>], &schema),
            Ok("null".to_string())
        );
    }
}
