//! Error types for the CLI host.

use crate::exit_codes::ExitCode;
use pii_redact::{ConfigError, ConfigErrors};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// No configuration path was given or discovered.
    #[error("no redaction configuration found (pass --config or set PII_REDACT_CONFIG)")]
    NoConfig,

    /// A file could not be read or written.
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading stdin or writing stdout failed.
    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigErrors),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.into())
    }
}

impl CliError {
    /// Exit code reported for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::NoConfig | CliError::Config(_) => ExitCode::ConfigError,
            CliError::Io { .. } | CliError::Stream(_) => ExitCode::ArgsError,
        }
    }
}
