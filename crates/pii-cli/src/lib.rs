//! Command-line host for the PII field redaction engine.
//!
//! Loads a redaction configuration, compiles it, and applies it to a stream
//! of JSON-lines event records. The binary is a thin driver: everything here
//! is also usable from tests and other hosts.

pub mod apply;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod resolve;

pub use apply::{redact_stream, ApplyStats};
pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use resolve::{load_rules, resolve_and_load, resolve_config, ConfigSource};
