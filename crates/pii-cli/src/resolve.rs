//! Configuration path discovery and loading.
//!
//! Resolution order: CLI argument → `PII_REDACT_CONFIG` → XDG config directory.

use crate::error::{CliError, Result};
use pii_redact::{compile_str, RedactionRuleSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the configuration path.
pub const ENV_CONFIG_PATH: &str = "PII_REDACT_CONFIG";

/// Standard configuration file name.
pub const CONFIG_FILENAME: &str = "pii_enrichment_config.json";

/// Application name for XDG directories.
const APP_NAME: &str = "pii-redact";

/// Where the configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
        }
    }
}

/// Resolve the configuration path.
///
/// An explicit CLI path is returned even if it does not exist, so that the
/// caller reports the missing file instead of silently falling through.
/// Environment and XDG candidates are only used when the file exists.
pub fn resolve_config(cli_path: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
    resolve_with(
        cli_path,
        std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
        dirs::config_dir(),
    )
}

fn resolve_with(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Option<(PathBuf, ConfigSource)> {
    if let Some(path) = cli_path {
        return Some((path.to_path_buf(), ConfigSource::CliArgument));
    }

    if let Some(path) = env_path.filter(|p| p.exists()) {
        return Some((path, ConfigSource::Environment));
    }

    config_dir
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME))
        .filter(|p| p.exists())
        .map(|path| (path, ConfigSource::XdgConfig))
}

/// Read and compile the self-describing configuration at `path`.
pub fn load_rules(path: &Path) -> Result<RedactionRuleSet> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read redaction configuration");

    let rules = compile_str(&text)?;
    info!(
        path = %path.display(),
        rules = rules.len(),
        "compiled redaction configuration"
    );
    Ok(rules)
}

/// Resolve then load, failing with [`CliError::NoConfig`] when nothing is found.
pub fn resolve_and_load(cli_path: Option<&Path>) -> Result<(RedactionRuleSet, PathBuf)> {
    let (path, source) = resolve_config(cli_path).ok_or(CliError::NoConfig)?;
    debug!(path = %path.display(), source = %source, "resolved redaction configuration");
    let rules = load_rules(&path)?;
    Ok((rules, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"{
        "schema": "iglu:com.snowplowanalytics.snowplow.enrichments/pii_enrichment_config/jsonschema/2-0-0",
        "data": {
            "enabled": true,
            "parameters": {
                "pii": [{"pojo": {"field": "user_id"}}],
                "strategy": {"pseudonymize": {"hashFunction": "SHA-256"}}
            }
        }
    }"#;

    #[test]
    fn test_cli_path_wins_even_if_missing() {
        let missing = Path::new("/definitely/not/here.json");
        let resolved = resolve_with(Some(missing), None, None).unwrap();
        assert_eq!(resolved, (missing.to_path_buf(), ConfigSource::CliArgument));
    }

    #[test]
    fn test_env_then_xdg() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join("env.json");
        fs::write(&env_file, CONFIG).unwrap();

        let xdg_root = dir.path().join("xdg");
        let xdg_file = xdg_root.join(APP_NAME).join(CONFIG_FILENAME);
        fs::create_dir_all(xdg_file.parent().unwrap()).unwrap();
        fs::write(&xdg_file, CONFIG).unwrap();

        let resolved = resolve_with(None, Some(env_file.clone()), Some(xdg_root.clone())).unwrap();
        assert_eq!(resolved, (env_file, ConfigSource::Environment));

        // A dangling env path falls through to XDG
        let resolved =
            resolve_with(None, Some(dir.path().join("gone.json")), Some(xdg_root)).unwrap();
        assert_eq!(resolved, (xdg_file, ConfigSource::XdgConfig));
    }

    #[test]
    fn test_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_with(None, None, Some(dir.path().to_path_buf())).is_none());
    }

    #[test]
    fn test_load_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, CONFIG).unwrap();
        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 1);

        let err = load_rules(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));

        fs::write(&path, "{").unwrap();
        let err = load_rules(&path).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
