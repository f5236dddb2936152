//! Layering redaction onto an existing conversion pipeline.
//!
//! Each rule becomes a composition step: a predicate on the entry's output
//! field and a wrapper around the entry's conversion. Steps apply in rule
//! order, so several rules on one field chain, each redacting the previous
//! one's output.

use crate::error::TransformError;
use crate::pipeline::{Converter, FieldTransform, TransformMap};
use crate::rule::{FieldRule, RedactionRuleSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// A single (predicate, wrapper) pair derived from one rule.
#[derive(Debug, Clone)]
pub struct CompositionStep {
    rule: Arc<FieldRule>,
}

impl CompositionStep {
    pub fn new(rule: FieldRule) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }

    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Whether this step wraps `transform`.
    pub fn matches(&self, transform: &FieldTransform) -> bool {
        transform.output_field == self.rule.field_name()
    }

    /// Wrap `inner` so its successful output is redacted. Failures of
    /// `inner` are returned untouched and skip redaction.
    pub fn wrap(&self, inner: Converter) -> Converter {
        let rule = Arc::clone(&self.rule);
        Arc::new(move |raw: &str| {
            let converted = inner(raw)?;
            rule.apply(&converted)
                .map_err(|source| TransformError::Redaction {
                    field: rule.field_name().to_string(),
                    source,
                })
        })
    }
}

/// Ordered composition steps for a rule set.
#[derive(Debug, Clone, Default)]
pub struct TransformComposer {
    steps: Vec<CompositionStep>,
}

impl TransformComposer {
    pub fn new(rules: &RedactionRuleSet) -> Self {
        Self {
            steps: rules.iter().cloned().map(CompositionStep::new).collect(),
        }
    }

    pub fn steps(&self) -> &[CompositionStep] {
        &self.steps
    }

    /// Return a copy of `pipeline` with every matching conversion wrapped.
    ///
    /// The input is left untouched. Entries no rule matches keep their
    /// original conversion and output field.
    pub fn augment(&self, pipeline: &TransformMap) -> TransformMap {
        let mut augmented = pipeline.clone();

        for step in &self.steps {
            let mut matched = 0usize;
            for (input_field, transform) in augmented.iter_mut() {
                if !step.matches(transform) {
                    continue;
                }
                transform.convert = step.wrap(Arc::clone(&transform.convert));
                matched += 1;
                debug!(
                    input_field = %input_field,
                    output_field = %transform.output_field,
                    kind = step.rule().kind(),
                    "wrapped conversion with redaction"
                );
            }
            if matched == 0 {
                warn!(
                    field = step.rule().field_name(),
                    "redaction rule matches no pipeline entry"
                );
            }
        }

        augmented
    }
}

/// Wrap the conversions of `pipeline` targeted by `rules`.
pub fn augment(pipeline: &TransformMap, rules: &RedactionRuleSet) -> TransformMap {
    TransformComposer::new(rules).augment(pipeline)
}
