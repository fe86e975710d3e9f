//! # Selectors and Key Schemas
//!
//! A [`Selector`] pairs an explicit attribute name with an extraction
//! function. The name is supplied by the caller; nothing is recovered by
//! reflection, so renaming a struct field does not silently change keys.
//!
//! A [`KeySchema`] is the ordered selector list of one type together with
//! the type name that text keys embed. Selector order is part of a key's
//! identity.

use std::borrow::Cow;
use std::sync::Arc;

use uuid::Uuid;

use crate::attribute::{AttributeValue, ToAttribute};

type Extract<T> = Arc<dyn Fn(&T) -> AttributeValue + Send + Sync>;

/// A named attribute extractor.
pub struct Selector<T> {
    name: Cow<'static, str>,
    extract: Extract<T>,
}

impl<T> Selector<T> {
    /// A selector from a name and an extraction function.
    ///
    /// Any name is accepted; text keys escape `\`, `{`, `}` and `:` in it.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, extract: F) -> Self
    where
        F: Fn(&T) -> AttributeValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }

    /// A selector that borrows a field and converts it with [`ToAttribute`].
    pub fn field<V, F>(name: impl Into<Cow<'static, str>>, field: F) -> Self
    where
        V: ToAttribute + ?Sized,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        Self::new(name, move |value: &T| field(value).to_attribute())
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_owned(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    /// Extract the attribute from `value`.
    pub fn select(&self, value: &T) -> AttributeValue {
        (self.extract)(value)
    }
}

impl<T> Clone for Selector<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<T> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The selectors of one type, in order, with the type's name.
pub struct KeySchema<T> {
    type_name: Cow<'static, str>,
    selectors: Vec<Selector<T>>,
}

impl<T> KeySchema<T> {
    /// An empty schema for the named type.
    ///
    /// Text keys escape `\`, `{`, `}` and `:` in `type_name`.
    pub fn new(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_name: type_name.into(),
            selectors: Vec::new(),
        }
    }

    /// Append a selector.
    pub fn with(mut self, selector: Selector<T>) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Append a selector built from a name and an extraction function.
    pub fn select<F>(self, name: impl Into<Cow<'static, str>>, extract: F) -> Self
    where
        F: Fn(&T) -> AttributeValue + Send + Sync + 'static,
    {
        self.with(Selector::new(name, extract))
    }

    /// Append a selector over a borrowed field.
    pub fn field<V, F>(self, name: impl Into<Cow<'static, str>>, field: F) -> Self
    where
        V: ToAttribute + ?Sized,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.with(Selector::field(name, field))
    }

    /// The name text keys embed.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn type_name_owned(&self) -> Cow<'static, str> {
        self.type_name.clone()
    }

    /// The selectors, in order.
    pub fn selectors(&self) -> &[Selector<T>] {
        &self.selectors
    }

    /// Whether the schema has no selectors.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl<T> Clone for KeySchema<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            selectors: self.selectors.clone(),
        }
    }
}

impl<T> std::fmt::Debug for KeySchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchema")
            .field("type_name", &self.type_name)
            .field("selectors", &self.selectors)
            .finish()
    }
}

/// A type whose instances know how to derive their own default key.
pub trait Keyed: Sized {
    /// A fixed identity for the type, stable across renames.
    const TYPE_ID: Uuid;

    /// The selectors of the type's default key.
    fn key_schema() -> KeySchema<Self>;
}
