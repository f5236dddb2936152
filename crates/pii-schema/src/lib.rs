//! Schema identifiers for self-describing JSON.
//!
//! A self-describing JSON document carries the identifier of the schema it
//! conforms to. Identifiers look like
//! `iglu:com.acme/user_agent/jsonschema/1-0-2`: a vendor, a name, a format and
//! a three-part version (`model-revision-addition`).
//!
//! This crate provides:
//! - [`SchemaKey`]: a concrete schema identifier
//! - [`SchemaCriterion`]: a pattern over a family of schema keys, where each
//!   version part may be the `*` wildcard
//!
//! # Example
//!
//! ```
//! use pii_schema::{SchemaCriterion, SchemaKey};
//!
//! let key: SchemaKey = "iglu:com.acme/ua/jsonschema/1-0-3".parse().unwrap();
//! let criterion: SchemaCriterion = "iglu:com.acme/ua/jsonschema/1-*-*".parse().unwrap();
//! assert!(criterion.matches(&key));
//! ```

pub mod criterion;
pub mod error;
pub mod key;

pub use criterion::SchemaCriterion;
pub use error::SchemaParseError;
pub use key::{SchemaKey, SchemaVer};

/// Protocol prefix carried by schema identifiers.
pub const IGLU_PREFIX: &str = "iglu:";
