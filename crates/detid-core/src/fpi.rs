//! # Formal Public Identifiers
//!
//! A Formal Public Identifier (FPI) is a structured, human-readable
//! identifier:
//!
//! ```text
//! <prefix>//<author>//<product>[ <description>]//<language>
//! -//W3C//DTD XHTML 1.0 Strict//EN
//! ```
//!
//! The prefix encodes the approval status: `+` is informal (registered),
//! `-` is none (unregistered), and any other token marks a standard whose
//! reference is that token (for example `ISO/IEC 9070`).
//!
//! ## Grammar
//!
//! Parsing uses one strict grammar in which every segment is captured,
//! `author` included. Segments may not contain `//`, may not begin or end
//! with `/`, and may not contain control characters. The product is a
//! single token without whitespace or `/`, the language a single token
//! without whitespace or `/`. These restrictions make [`Fpi`]'s `Display`
//! and `FromStr` exact inverses.
//!
//! ## Equality
//!
//! Equality and hashing compare every textual field case-insensitively.

use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FpiError;

const GRAMMAR: &str = concat!(
    r"^(?P<prefix>.+?)//(?P<author>.+?)//",
    r"(?P<product>[^\s/]+)(?:\s+(?P<description>.+?))?",
    r"//(?P<language>[^\s/]+)$",
);

fn grammar() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(GRAMMAR) {
        Ok(re) => Some(re),
        Err(error) => {
            tracing::error!(%error, "FPI grammar failed to compile");
            None
        }
    })
    .as_ref()
}

/// Approval status of an FPI, carried by its prefix.
#[derive(Debug, Clone, Eq)]
pub enum ApprovalStatus {
    /// Unregistered (`-`).
    None,
    /// Registered but not a standard (`+`).
    Informal,
    /// A standard, identified by its reference (e.g. `ISO 8879:1986`).
    Standard(String),
}

impl ApprovalStatus {
    /// The prefix token rendered for this status.
    pub fn prefix(&self) -> &str {
        match self {
            Self::None => "-",
            Self::Informal => "+",
            Self::Standard(reference) => reference,
        }
    }

    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "-" => Self::None,
            "+" => Self::Informal,
            reference => Self::Standard(reference.to_string()),
        }
    }
}

impl PartialEq for ApprovalStatus {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) | (Self::Informal, Self::Informal) => true,
            (Self::Standard(a), Self::Standard(b)) => fold(a) == fold(b),
            _ => false,
        }
    }
}

impl Hash for ApprovalStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Self::Standard(reference) = self {
            fold(reference).hash(state);
        }
    }
}

/// A Formal Public Identifier.
#[derive(Debug, Clone, Eq)]
pub struct Fpi {
    status: ApprovalStatus,
    author: String,
    product: String,
    description: String,
    language: String,
}

impl Fpi {
    /// Build an FPI field by field.
    ///
    /// The description is trimmed and may be empty.
    ///
    /// # Errors
    ///
    /// - `FpiError::MissingField` if author, product, or language is empty.
    /// - `FpiError::MissingReference` if a standard has an empty reference.
    /// - `FpiError::Malformed` if a field cannot be rendered unambiguously.
    pub fn new(
        status: ApprovalStatus,
        author: impl Into<String>,
        product: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, FpiError> {
        let fpi = Self {
            status,
            author: author.into(),
            product: product.into(),
            description: description.into().trim().to_string(),
            language: language.into(),
        };
        fpi.validate()?;
        Ok(fpi)
    }

    /// The null FPI. Renders as the empty string.
    pub fn empty() -> Self {
        Self {
            status: ApprovalStatus::None,
            author: String::new(),
            product: String::new(),
            description: String::new(),
            language: String::new(),
        }
    }

    /// Whether this is the null FPI.
    pub fn is_empty(&self) -> bool {
        self.author.is_empty() && self.product.is_empty() && self.language.is_empty()
    }

    /// Parse the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns `FpiError::Malformed` if `text` does not match the grammar,
    /// or any error of [`Fpi::new`] for the captured fields.
    pub fn parse(text: &str) -> Result<Self, FpiError> {
        let caps = grammar()
            .and_then(|re| re.captures(text))
            .ok_or_else(|| FpiError::Malformed(text.to_string()))?;
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        Self::new(
            ApprovalStatus::from_prefix(group("prefix")),
            group("author"),
            group("product"),
            group("description"),
            group("language"),
        )
    }

    /// Approval status.
    pub fn status(&self) -> &ApprovalStatus {
        &self.status
    }

    /// The standard reference, for standards.
    pub fn reference(&self) -> Option<&str> {
        match &self.status {
            ApprovalStatus::Standard(reference) => Some(reference),
            _ => None,
        }
    }

    /// Owner of the identified text.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Class of the identified text (e.g. `DTD`).
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Free-form description; empty when absent.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    fn validate(&self) -> Result<(), FpiError> {
        if let ApprovalStatus::Standard(reference) = &self.status {
            if reference.is_empty() {
                return Err(FpiError::MissingReference);
            }
            if reference == "+" || reference == "-" {
                return Err(FpiError::Malformed(reference.clone()));
            }
            check_segment(reference)?;
        }
        for (name, value) in [
            ("author", &self.author),
            ("product", &self.product),
            ("language", &self.language),
        ] {
            if value.is_empty() {
                return Err(FpiError::MissingField(name));
            }
        }
        check_segment(&self.author)?;
        check_segment(&self.description)?;
        check_token(&self.product)?;
        check_token(&self.language)
    }
}

fn check_segment(value: &str) -> Result<(), FpiError> {
    if value.contains("//")
        || value.starts_with('/')
        || value.ends_with('/')
        || value.chars().any(char::is_control)
    {
        return Err(FpiError::Malformed(value.to_string()));
    }
    Ok(())
}

fn check_token(value: &str) -> Result<(), FpiError> {
    if value.chars().any(|c| c == '/' || c.is_whitespace() || c.is_control()) {
        return Err(FpiError::Malformed(value.to_string()));
    }
    Ok(())
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

impl Default for Fpi {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Fpi {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && fold(&self.author) == fold(&other.author)
            && fold(&self.product) == fold(&other.product)
            && fold(&self.description) == fold(&other.description)
            && fold(&self.language) == fold(&other.language)
    }
}

impl Hash for Fpi {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.status.hash(state);
        fold(&self.author).hash(state);
        fold(&self.product).hash(state);
        fold(&self.description).hash(state);
        fold(&self.language).hash(state);
    }
}

impl std::fmt::Display for Fpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{}//{}//{}", self.status.prefix(), self.author, self.product)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        write!(f, "//{}", self.language)
    }
}

impl std::str::FromStr for Fpi {
    type Err = FpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Fpi {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fpi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self::empty());
        }
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
