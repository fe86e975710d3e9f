//! # detid-keys — Composite Cache Keys
//!
//! Folds the selected attributes of one or many values into a single
//! deterministic key:
//!
//! - [`KeySchema`] / [`Selector`]: explicitly named attribute extractors.
//! - [`AttributeValue`] / [`ToAttribute`]: the closed set of key-derivable
//!   value kinds.
//! - [`CacheKeyBuilder`]: recursive derivation and aggregation, as
//!   readable text ([`TextKeyBuilder`]) or 128-bit values
//!   ([`UuidKeyBuilder`]).
//!
//! ```
//! use detid_keys::{KeySchema, TextKeyBuilder};
//!
//! struct User { id: u64, email: String }
//!
//! let schema = KeySchema::new("User")
//!     .field("id", |u: &User| &u.id)
//!     .field("email", |u: &User| &u.email);
//! let user = User { id: 1, email: "a@example.com".into() };
//! let key = TextKeyBuilder::new().build(&user, &schema).unwrap();
//! assert_eq!(key, r#"{User:{id:1}}{User:{email:"a@example.com"}}"#);
//! ```

pub mod attribute;
pub mod builder;
pub mod combine;
pub mod kind;
pub mod schema;

pub use attribute::{Attribute, AttributeValue, NestedValue, Scalar, ToAttribute, TypeToken};
pub use builder::{CacheKeyBuilder, TextKeyBuilder, UuidKeyBuilder};
pub use kind::{KeyKind, TextKey, UuidKey};
pub use schema::{KeySchema, Keyed, Selector};
