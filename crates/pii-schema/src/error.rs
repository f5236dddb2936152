//! Error types for schema identifier parsing.

use thiserror::Error;

/// Errors that can occur while parsing schema keys and criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaParseError {
    /// The string does not have the `vendor/name/format/version` shape.
    #[error("invalid schema key '{0}': expected iglu:vendor/name/format/model-revision-addition")]
    InvalidKey(String),

    /// The string does not have the criterion shape.
    #[error(
        "invalid schema criterion '{0}': expected iglu:vendor/name/format/model-revision-addition with optional * wildcards"
    )]
    InvalidCriterion(String),

    /// A version component does not fit in 32 bits.
    #[error("version component '{component}' out of range in '{input}'")]
    VersionOutOfRange { input: String, component: String },
}
