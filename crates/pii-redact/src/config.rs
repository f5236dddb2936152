//! Compiling redaction configuration into rules.
//!
//! The configuration document looks like:
//!
//! ```json
//! {
//!   "parameters": {
//!     "pii": [
//!       {"pojo": {"field": "user_ipaddress"}},
//!       {"json": {"field": "contexts",
//!                 "schemaCriterion": "iglu:com.acme/ua/jsonschema/1-*-*",
//!                 "jsonPath": "$.useragent"}}
//!     ],
//!     "strategy": {"pseudonymize": {"hashFunction": "SHA-256"}}
//!   }
//! }
//! ```
//!
//! The `parameters` wrapper is optional. Compilation never stops at the first
//! problem: every broken entry is reported in one [`ConfigErrors`].

use crate::error::{ConfigError, ConfigErrors};
use crate::json_path::JsonPath;
use crate::rule::{FieldRule, RedactionRuleSet};
use crate::strategy::RedactionStrategy;
use once_cell::sync::Lazy;
use pii_schema::{SchemaCriterion, SchemaKey};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Configuration schemas this compiler understands.
pub static SUPPORTED_CONFIG_SCHEMA: Lazy<SchemaCriterion> = Lazy::new(|| {
    SchemaCriterion::new(
        "com.snowplowanalytics.snowplow.enrichments",
        "pii_enrichment_config",
        "jsonschema",
        2,
    )
    .with_revision(0)
});

#[derive(Debug, Deserialize)]
struct StrategyConfig {
    pseudonymize: PseudonymizeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PseudonymizeConfig {
    hash_function: String,
    #[serde(default)]
    salt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RuleEntry {
    Pojo {
        field: String,
    },
    Json {
        field: String,
        #[serde(rename = "schemaCriterion")]
        schema_criterion: String,
        #[serde(rename = "jsonPath")]
        json_path: String,
    },
}

/// A validated target awaiting its strategy.
enum Target {
    Scalar {
        field_name: String,
    },
    Nested {
        field_name: String,
        schema_criterion: SchemaCriterion,
        json_path: JsonPath,
    },
}

impl Target {
    fn into_rule(self, strategy: &RedactionStrategy) -> FieldRule {
        match self {
            Target::Scalar { field_name } => FieldRule::scalar(field_name, strategy.clone()),
            Target::Nested {
                field_name,
                schema_criterion,
                json_path,
            } => FieldRule::nested(field_name, schema_criterion, json_path, strategy.clone()),
        }
    }
}

/// Check that `schema` is a configuration schema this compiler reads.
pub fn check_config_schema(schema: &SchemaKey) -> Result<(), ConfigError> {
    if SUPPORTED_CONFIG_SCHEMA.matches(schema) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedConfigSchema {
            expected: SUPPORTED_CONFIG_SCHEMA.to_string(),
            actual: schema.to_string(),
        })
    }
}

/// Compile `config`, which claims to conform to `schema`, into rules.
pub fn compile(config: &Value, schema: &SchemaKey) -> Result<RedactionRuleSet, ConfigErrors> {
    check_config_schema(schema)?;

    let params = match config.get("parameters") {
        Some(inner) if inner.is_object() => inner,
        _ => config,
    };
    if !params.is_object() {
        return Err(ConfigError::InvalidConfig("expected a JSON object".to_string()).into());
    }

    let mut errors = Vec::new();

    let strategy = match compile_strategy(params.get("strategy")) {
        Ok(strategy) => Some(strategy),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    let entries: &[Value] = match params.get("pii") {
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            errors.push(ConfigError::InvalidConfig("`pii` must be an array".to_string()));
            &[]
        }
        None => {
            errors.push(ConfigError::InvalidConfig("missing `pii` array".to_string()));
            &[]
        }
    };

    let mut targets = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match compile_entry(index, entry) {
            Ok(target) => targets.push(target),
            Err(entry_errors) => errors.extend(entry_errors),
        }
    }

    match strategy {
        Some(strategy) if errors.is_empty() => {
            let rules: RedactionRuleSet = targets
                .into_iter()
                .map(|target| target.into_rule(&strategy))
                .collect();
            debug!(rules = rules.len(), strategy = %strategy, "compiled redaction rules");
            Ok(rules)
        }
        _ => {
            debug!(errors = errors.len(), "redaction configuration rejected");
            Err(ConfigErrors(errors))
        }
    }
}

/// Compile a self-describing configuration: `{"schema": "...", "data": {...}}`.
///
/// A document whose `data.enabled` is `false` compiles to an empty rule set.
pub fn compile_self_describing(document: &Value) -> Result<RedactionRuleSet, ConfigErrors> {
    let schema = document
        .get("schema")
        .and_then(Value::as_str)
        .ok_or_else(|| ConfigError::InvalidConfig("missing string `schema`".to_string()))?;
    let key = SchemaKey::parse(schema).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
    check_config_schema(&key)?;

    let data = document
        .get("data")
        .ok_or_else(|| ConfigError::InvalidConfig("missing `data`".to_string()))?;

    if data.get("enabled").and_then(Value::as_bool) == Some(false) {
        info!(schema = %key, "redaction disabled by configuration");
        return Ok(RedactionRuleSet::default());
    }

    compile(data, &key)
}

/// Parse and compile a self-describing configuration from text.
pub fn compile_str(text: &str) -> Result<RedactionRuleSet, ConfigErrors> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| ConfigError::InvalidConfig(format!("not valid JSON: {}", e)))?;
    compile_self_describing(&document)
}

fn compile_strategy(section: Option<&Value>) -> Result<RedactionStrategy, ConfigError> {
    let section = section
        .ok_or_else(|| ConfigError::InvalidConfig("missing `strategy`".to_string()))?;
    let config: StrategyConfig = serde_json::from_value(section.clone())
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid `strategy`: {}", e)))?;

    let strategy = RedactionStrategy::pseudonymize(&config.pseudonymize.hash_function)?;
    Ok(match config.pseudonymize.salt {
        Some(salt) => strategy.with_salt(salt),
        None => strategy,
    })
}

/// Validate one `pii` entry, reporting every problem it has.
fn compile_entry(index: usize, entry: &Value) -> Result<Target, Vec<ConfigError>> {
    let entry: RuleEntry = serde_json::from_value(entry.clone()).map_err(|e| {
        vec![ConfigError::InvalidRuleEntry {
            index,
            reason: format!("expected {{\"pojo\": {{...}}}} or {{\"json\": {{...}}}}: {}", e),
        }]
    })?;

    match entry {
        RuleEntry::Pojo { field } => {
            if field.is_empty() {
                Err(vec![ConfigError::EmptyFieldName { index }])
            } else {
                Ok(Target::Scalar { field_name: field })
            }
        }
        RuleEntry::Json {
            field,
            schema_criterion,
            json_path,
        } => {
            let mut errors = Vec::new();
            if field.is_empty() {
                errors.push(ConfigError::EmptyFieldName { index });
            }
            let criterion = SchemaCriterion::parse(&schema_criterion)
                .map_err(|e| {
                    errors.push(ConfigError::InvalidSchemaCriterion {
                        index,
                        criterion: schema_criterion.clone(),
                        reason: e.to_string(),
                    })
                })
                .ok();
            let path = JsonPath::parse(&json_path)
                .map_err(|e| {
                    errors.push(ConfigError::InvalidJsonPath {
                        index,
                        path: json_path.clone(),
                        reason: e.to_string(),
                    })
                })
                .ok();

            match (criterion, path) {
                (Some(schema_criterion), Some(json_path)) if errors.is_empty() => {
                    Ok(Target::Nested {
                        field_name: field,
                        schema_criterion,
                        json_path,
                    })
                }
                _ => Err(errors),
            }
        }
    }
}
