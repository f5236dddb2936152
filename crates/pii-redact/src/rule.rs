//! Redaction targets.

use crate::error::RedactionError;
use crate::json_path::JsonPath;
use crate::nested::redact_nested;
use crate::strategy::RedactionStrategy;
use pii_schema::SchemaCriterion;

/// Redact a whole scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRule {
    pub strategy: RedactionStrategy,
    /// Output field whose converted value is replaced.
    pub field_name: String,
}

/// Redact values inside the schema-tagged contexts of a JSON field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedRule {
    pub strategy: RedactionStrategy,
    /// Output field holding the `{"data": [...]}` document.
    pub field_name: String,
    /// Only contexts whose `schema` matches are rewritten.
    pub schema_criterion: SchemaCriterion,
    /// Evaluated against each matching context's `data`.
    pub json_path: JsonPath,
}

/// One configured redaction target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    Scalar(ScalarRule),
    Nested(NestedRule),
}

impl FieldRule {
    /// Rule replacing the whole value of `field_name`.
    pub fn scalar(field_name: impl Into<String>, strategy: RedactionStrategy) -> Self {
        FieldRule::Scalar(ScalarRule {
            strategy,
            field_name: field_name.into(),
        })
    }

    /// Rule rewriting `json_path` inside contexts of `field_name` that match
    /// `schema_criterion`.
    pub fn nested(
        field_name: impl Into<String>,
        schema_criterion: SchemaCriterion,
        json_path: JsonPath,
        strategy: RedactionStrategy,
    ) -> Self {
        FieldRule::Nested(NestedRule {
            strategy,
            field_name: field_name.into(),
            schema_criterion,
            json_path,
        })
    }

    pub fn field_name(&self) -> &str {
        match self {
            FieldRule::Scalar(rule) => &rule.field_name,
            FieldRule::Nested(rule) => &rule.field_name,
        }
    }

    pub fn strategy(&self) -> &RedactionStrategy {
        match self {
            FieldRule::Scalar(rule) => &rule.strategy,
            FieldRule::Nested(rule) => &rule.strategy,
        }
    }

    /// Configuration tag of the rule kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldRule::Scalar(_) => "pojo",
            FieldRule::Nested(_) => "json",
        }
    }

    /// Redact a converted field value.
    ///
    /// Scalar rules never fail. Nested rules fail when the value is not a
    /// `{"data": [...]}` document.
    pub fn apply(&self, value: &str) -> Result<String, RedactionError> {
        match self {
            FieldRule::Scalar(rule) => Ok(rule.strategy.scramble(value)),
            FieldRule::Nested(rule) => redact_nested(rule, value),
        }
    }
}

impl std::fmt::Display for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRule::Scalar(rule) => write!(f, "pojo {} via {}", rule.field_name, rule.strategy),
            FieldRule::Nested(rule) => write!(
                f,
                "json {} [{} {}] via {}",
                rule.field_name, rule.schema_criterion, rule.json_path, rule.strategy
            ),
        }
    }
}

/// Ordered redaction rules. Several rules may target the same field; they
/// apply in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionRuleSet {
    rules: Vec<FieldRule>,
}

impl RedactionRuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules targeting `field_name`, in application order.
    pub fn rules_for<'a>(&'a self, field_name: &'a str) -> impl Iterator<Item = &'a FieldRule> + 'a {
        self.rules.iter().filter(move |r| r.field_name() == field_name)
    }
}

impl<'a> IntoIterator for &'a RedactionRuleSet {
    type Item = &'a FieldRule;
    type IntoIter = std::slice::Iter<'a, FieldRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<FieldRule> for RedactionRuleSet {
    fn from_iter<I: IntoIterator<Item = FieldRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
