//! Field redaction engine for event records.
//!
//! Events carry flat scalar fields and JSON fields holding arrays of
//! schema-tagged contexts. This crate replaces configured fields, or
//! configured paths inside matching contexts, with a deterministic one-way
//! digest before the event leaves the pipeline.
//!
//! # Key Features
//!
//! - **Rule compilation**: configuration compiles into a [`RedactionRuleSet`],
//!   reporting every problem in one pass.
//! - **Pseudonymization**: fixed-width hex digests (SHA-2 family, BLAKE3),
//!   optionally salted.
//! - **Schema-scoped JSON paths**: nested rules only touch contexts whose
//!   schema matches, and only the values their path selects.
//! - **Pipeline composition**: redaction wraps existing per-field
//!   conversions, so a failed conversion is never redacted and a failed
//!   redaction never emits the original value.
//!
//! # Example
//!
//! ```
//! use pii_redact::{augment, compile, TransformMap};
//! use pii_schema::SchemaKey;
//! use serde_json::json;
//!
//! let schema = SchemaKey::parse(
//!     "iglu:com.snowplowanalytics.snowplow.enrichments/pii_enrichment_config/jsonschema/2-0-0",
//! )
//! .unwrap();
//! let config = json!({
//!     "pii": [{"pojo": {"field": "user_ipaddress"}}],
//!     "strategy": {"pseudonymize": {"hashFunction": "SHA-256"}}
//! });
//! let rules = compile(&config, &schema).unwrap();
//!
//! let pipeline = augment(&TransformMap::identity(["user_ipaddress"]), &rules);
//! let out = pipeline.get("user_ipaddress").unwrap().apply("1.2.3.4").unwrap();
//! assert_eq!(out.len(), 64);
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod hash;
pub mod json_path;
pub mod nested;
pub mod pipeline;
pub mod rule;
pub mod strategy;

pub use compose::{augment, CompositionStep, TransformComposer};
pub use config::{compile, compile_self_describing, compile_str, SUPPORTED_CONFIG_SCHEMA};
pub use error::{ConfigError, ConfigErrors, JsonPathError, RedactionError, Result, TransformError};
pub use hash::HashFunction;
pub use json_path::JsonPath;
pub use nested::redact_nested;
pub use pipeline::{Converter, FieldTransform, TransformMap};
pub use rule::{FieldRule, NestedRule, RedactionRuleSet, ScalarRule};
pub use strategy::RedactionStrategy;
