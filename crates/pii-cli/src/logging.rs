//! Structured logging for the CLI.
//!
//! - stdout is reserved for command payloads (redacted records, summaries)
//! - stderr receives all log output, human-readable or JSON lines
//! - `PII_LOG` sets the level, `PII_LOG_FORMAT` the format; CLI flags win
//! - `RUST_LOG` applies only when neither `PII_LOG` nor a CLI flag set the level

use clap::ValueEnum;
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "PII_LOG";

/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "PII_LOG_FORMAT";

/// Crates whose events pass the default filter.
const LOG_TARGETS: &[&str] = &["pii_cli", "pii_redact", "pii_schema"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    #[value(alias = "json")]
    Jsonl,
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
    /// Level came from `PII_LOG` or the command line rather than the default.
    pub level_explicit: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
            level_explicit: false,
        }
    }
}

impl LogConfig {
    /// Create config from the environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(cli_level, cli_format, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL).and_then(|v| LogLevel::from_str(&v, true).ok()) {
            config.level = level;
            config.level_explicit = true;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| LogFormat::from_str(&v, true).ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.level_explicit = true;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Filter directive covering this workspace's crates at the configured level.
    pub fn filter_directive(&self) -> String {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level.as_directive()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = if config.level_explicit {
        EnvFilter::new(config.filter_directive())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
    };

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // First 12 hex chars are enough to correlate one run's log lines
    format!("run-{}", &uuid.simple().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_lookup(None, None, lookup(&[]));
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Human);
        assert!(!config.level_explicit);
    }

    #[test]
    fn test_env_then_cli_precedence() {
        let env = [(ENV_LOG_LEVEL, "debug"), (ENV_LOG_FORMAT, "json")];
        let config = LogConfig::from_lookup(None, None, lookup(&env));
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert!(config.level_explicit);

        let config = LogConfig::from_lookup(
            Some(LogLevel::Error),
            Some(LogFormat::Human),
            lookup(&env),
        );
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let env = [(ENV_LOG_LEVEL, "loud"), (ENV_LOG_FORMAT, "xml")];
        let config = LogConfig::from_lookup(None, None, lookup(&env));
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.level_explicit);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn test_env_values_ignore_case() {
        let env = [(ENV_LOG_LEVEL, "WARN"), (ENV_LOG_FORMAT, "Jsonl")];
        let config = LogConfig::from_lookup(None, None, lookup(&env));
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Jsonl);

        let config = LogConfig::from_lookup(None, None, lookup(&[(ENV_LOG_LEVEL, "off")]));
        assert!(!config.level_explicit);
    }

    #[test]
    fn test_filter_directive() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        assert_eq!(
            config.filter_directive(),
            "pii_cli=debug,pii_redact=debug,pii_schema=debug"
        );
    }

    #[test]
    fn test_run_id_shape() {
        let id = generate_run_id();
        assert!(id.starts_with("run-"));
        assert_eq!(id.len(), 16);
    }
}
