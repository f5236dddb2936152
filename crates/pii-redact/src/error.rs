//! Error types for the redaction engine.
//!
//! Configuration problems ([`ConfigError`]) are collected exhaustively and
//! surfaced together as [`ConfigErrors`]. Runtime problems
//! ([`RedactionError`]) are per event and never carry the event's content.

use thiserror::Error;

/// Result type for per-event redaction.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// A single configuration problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document claims a schema this engine cannot read.
    #[error("unsupported configuration schema '{actual}', expected one matching {expected}")]
    UnsupportedConfigSchema { expected: String, actual: String },

    /// The configured hash function is not recognized.
    #[error("unsupported hash function '{name}', supported: {supported}")]
    UnsupportedAlgorithm { name: String, supported: String },

    /// A rule entry carries a schema criterion that does not parse.
    #[error("pii[{index}]: invalid schema criterion '{criterion}': {reason}")]
    InvalidSchemaCriterion {
        index: usize,
        criterion: String,
        reason: String,
    },

    /// A rule entry carries a JSON path that does not parse.
    #[error("pii[{index}]: invalid JSON path '{path}': {reason}")]
    InvalidJsonPath {
        index: usize,
        path: String,
        reason: String,
    },

    /// A rule entry names an empty field.
    #[error("pii[{index}]: field name must not be empty")]
    EmptyFieldName { index: usize },

    /// A rule entry is neither a `pojo` nor a `json` target.
    #[error("pii[{index}]: {reason}")]
    InvalidRuleEntry { index: usize, reason: String },

    /// The document is structurally unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Every configuration problem found in one compile pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", format_config_errors(.0))]
pub struct ConfigErrors(pub Vec<ConfigError>);

fn format_config_errors(errors: &[ConfigError]) -> String {
    let mut text = format!("{} configuration error(s)", errors.len());
    for err in errors {
        text.push_str("\n  - ");
        text.push_str(&err.to_string());
    }
    text
}

impl ConfigErrors {
    /// The individual errors, in discovery order.
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(err: ConfigError) -> Self {
        ConfigErrors(vec![err])
    }
}

/// Failure to redact a single event field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedactionError {
    /// The field content is not JSON, or lacks the `{"data": [...]}` shape.
    /// The reason never quotes the content.
    #[error("malformed event JSON: {reason}")]
    MalformedEventJson { reason: String },
}

impl RedactionError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RedactionError::MalformedEventJson {
            reason: reason.into(),
        }
    }

    /// Describe a parse failure by category and position only.
    pub(crate) fn from_parse(err: &serde_json::Error) -> Self {
        Self::malformed(format!(
            "{:?} error at line {} column {}",
            err.classify(),
            err.line(),
            err.column()
        ))
    }
}

/// Failure of one pipeline conversion step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The underlying conversion rejected the raw value.
    #[error("cannot convert field '{field}': {message}")]
    Conversion { field: String, message: String },

    /// The conversion succeeded but redacting its output failed.
    #[error("cannot redact field '{field}': {source}")]
    Redaction {
        field: String,
        #[source]
        source: RedactionError,
    },
}

impl TransformError {
    /// Name of the field whose conversion failed.
    pub fn field(&self) -> &str {
        match self {
            TransformError::Conversion { field, .. } | TransformError::Redaction { field, .. } => {
                field
            }
        }
    }
}

/// A JSON path expression that cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct JsonPathError {
    /// Character offset where parsing stopped.
    pub position: usize,
    pub message: String,
}
