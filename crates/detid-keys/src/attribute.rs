//! # Attribute Values — The Key-Derivable Kinds
//!
//! Every selected attribute is converted into an [`AttributeValue`] before
//! key derivation. The enum is closed: key derivation matches on it
//! exhaustively, so adding a kind forces every key kind to handle it.
//!
//! Conversion happens through [`ToAttribute`], implemented for the
//! primitive scalars, strings, UUIDs, UTC date/times, options, ordered
//! collections, and `serde_json::Value`. Values that no conversion can
//! represent become [`AttributeValue::Unsupported`], which key derivation
//! rejects with a descriptive error.
//!
//! `HashSet` and `HashMap` have no conversion: their iteration order is not
//! stable, so a key derived from them would not be either.

use std::borrow::Cow;
use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use detid_core::{Fingerprint, Fpi};

use crate::schema::Keyed;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean.
    Bool(bool),
    /// A signed integer of any width.
    Integer(i128),
    /// An unsigned integer of any width.
    Unsigned(u128),
    /// A floating-point number.
    Float(f64),
    /// A single character.
    Char(char),
    /// A string.
    Text(String),
}

impl Scalar {
    /// Locale-independent canonical text.
    ///
    /// Strings are double-quoted and characters single-quoted, with `\`
    /// and the quote character escaped, so no string renders the same as a
    /// number, a boolean, or the null marker.
    pub fn canonical_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Char(c) => quote('\'', c.encode_utf8(&mut [0; 4])),
            Self::Text(s) => quote('"', s),
        }
    }
}

fn quote(mark: char, s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(mark);
    for c in s.chars() {
        if c == mark || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(mark);
    out
}

/// The identity of a type, independent of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken(Uuid);

impl TypeToken {
    /// The token of a key-buildable type.
    pub fn of<T: Keyed>() -> Self {
        Self(T::TYPE_ID)
    }

    /// A token for an explicit type identity.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// The type identity.
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// A named attribute of a nested value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Selector name.
    pub name: Cow<'static, str>,
    /// Extracted value.
    pub value: AttributeValue,
}

/// A key-buildable value captured with its own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedValue {
    /// Name of the nested value's type, used by text keys.
    pub type_name: Cow<'static, str>,
    /// The nested value's attributes in selector order.
    pub attributes: Vec<Attribute>,
}

/// A selected attribute value, classified by key-derivable kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// An absent value.
    Null,
    /// Numbers, booleans, characters, strings.
    Scalar(Scalar),
    /// A 128-bit identifier.
    Identifier(Uuid),
    /// A UTC instant, keyed by its tick count.
    DateTime(DateTime<Utc>),
    /// A value that is itself key-buildable.
    Nested(NestedValue),
    /// An ordered sequence of values.
    Sequence(Vec<AttributeValue>),
    /// A type identity.
    TypeToken(TypeToken),
    /// A value of a kind with no key derivation, described for diagnostics.
    Unsupported(String),
}

impl AttributeValue {
    /// Capture a key-buildable value through its default schema.
    pub fn nested<T: Keyed>(value: &T) -> Self {
        let schema = T::key_schema();
        Self::Nested(NestedValue {
            type_name: schema.type_name_owned(),
            attributes: schema
                .selectors()
                .iter()
                .map(|selector| Attribute {
                    name: selector.name_owned(),
                    value: selector.select(value),
                })
                .collect(),
        })
    }

    /// Short description of the value's kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Identifier(_) => "identifier",
            Self::DateTime(_) => "date-time",
            Self::Nested(_) => "nested",
            Self::Sequence(_) => "sequence",
            Self::TypeToken(_) => "type token",
            Self::Unsupported(kind) => kind,
        }
    }
}

/// Conversion into an [`AttributeValue`].
pub trait ToAttribute {
    /// Classify and capture `self`.
    fn to_attribute(&self) -> AttributeValue;
}

macro_rules! impl_scalar {
    ($variant:ident, $wide:ty: $($ty:ty),*) => {
        $(
            impl ToAttribute for $ty {
                fn to_attribute(&self) -> AttributeValue {
                    AttributeValue::Scalar(Scalar::$variant(<$wide>::from(*self)))
                }
            }
        )*
    };
}

impl_scalar!(Integer, i128: i8, i16, i32, i64, i128);
impl_scalar!(Unsigned, u128: u8, u16, u32, u64, u128);
impl_scalar!(Float, f64: f32, f64);
impl_scalar!(Bool, bool: bool);
impl_scalar!(Char, char: char);

impl ToAttribute for isize {
    fn to_attribute(&self) -> AttributeValue {
        // isize is at most 64 bits on every supported target.
        AttributeValue::Scalar(Scalar::Integer(*self as i128))
    }
}

impl ToAttribute for usize {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Scalar(Scalar::Unsigned(*self as u128))
    }
}

impl ToAttribute for str {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Scalar(Scalar::Text(self.to_string()))
    }
}

impl ToAttribute for String {
    fn to_attribute(&self) -> AttributeValue {
        self.as_str().to_attribute()
    }
}

impl ToAttribute for Cow<'_, str> {
    fn to_attribute(&self) -> AttributeValue {
        self.as_ref().to_attribute()
    }
}

impl ToAttribute for Uuid {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Identifier(*self)
    }
}

impl ToAttribute for Fingerprint {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Identifier(*self.as_uuid())
    }
}

impl ToAttribute for Fpi {
    /// FPIs compare case-insensitively, so they key by their lower-cased text.
    fn to_attribute(&self) -> AttributeValue {
        if self.is_empty() {
            return AttributeValue::Null;
        }
        AttributeValue::Scalar(Scalar::Text(self.to_string().to_lowercase()))
    }
}

impl ToAttribute for DateTime<Utc> {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::DateTime(*self)
    }
}

impl ToAttribute for TypeToken {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::TypeToken(*self)
    }
}

impl ToAttribute for AttributeValue {
    fn to_attribute(&self) -> AttributeValue {
        self.clone()
    }
}

impl<T: ToAttribute + ?Sized> ToAttribute for &T {
    fn to_attribute(&self) -> AttributeValue {
        (**self).to_attribute()
    }
}

impl<T: ToAttribute + ?Sized> ToAttribute for Box<T> {
    fn to_attribute(&self) -> AttributeValue {
        (**self).to_attribute()
    }
}

impl<T: ToAttribute> ToAttribute for Option<T> {
    fn to_attribute(&self) -> AttributeValue {
        self.as_ref().map_or(AttributeValue::Null, ToAttribute::to_attribute)
    }
}

impl<T: ToAttribute> ToAttribute for [T] {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Sequence(self.iter().map(ToAttribute::to_attribute).collect())
    }
}

impl<T: ToAttribute, const N: usize> ToAttribute for [T; N] {
    fn to_attribute(&self) -> AttributeValue {
        self.as_slice().to_attribute()
    }
}

impl<T: ToAttribute> ToAttribute for Vec<T> {
    fn to_attribute(&self) -> AttributeValue {
        self.as_slice().to_attribute()
    }
}

impl<T: ToAttribute> ToAttribute for VecDeque<T> {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Sequence(self.iter().map(ToAttribute::to_attribute).collect())
    }
}

impl<T: ToAttribute> ToAttribute for BTreeSet<T> {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Sequence(self.iter().map(ToAttribute::to_attribute).collect())
    }
}

impl ToAttribute for serde_json::Value {
    /// JSON objects have no key derivation of their own; select their
    /// fields individually instead.
    fn to_attribute(&self) -> AttributeValue {
        use serde_json::Value;
        match self {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => b.to_attribute(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_attribute()
                } else if let Some(u) = n.as_u64() {
                    u.to_attribute()
                } else {
                    n.as_f64()
                        .map_or_else(
                            || AttributeValue::Unsupported("JSON number".into()),
                            |f| f.to_attribute(),
                        )
                }
            }
            Value::String(s) => s.to_attribute(),
            Value::Array(items) => items.to_attribute(),
            Value::Object(_) => AttributeValue::Unsupported("JSON object".into()),
        }
    }
}
