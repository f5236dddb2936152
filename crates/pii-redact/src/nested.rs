//! Path-scoped redaction inside schema-tagged JSON contexts.
//!
//! A context field holds `{"data": [{"schema": "...", "data": {...}}, ...]}`.
//! Only elements whose schema matches the rule's criterion are touched, and
//! within those only the values the rule's path selects.

use crate::error::{RedactionError, Result};
use crate::json_path::{resolve_mut, JsonPath, Location, Step};
use crate::rule::NestedRule;
use crate::strategy::RedactionStrategy;
use serde_json::Value;
use std::collections::HashSet;
use tracing::trace;

/// Redact the contexts of `json_text` selected by `rule`.
///
/// Returns the whole document re-serialized. Fails without output when the
/// text is not JSON or has no `data` array.
pub fn redact_nested(rule: &NestedRule, json_text: &str) -> Result<String> {
    let mut document: Value =
        serde_json::from_str(json_text).map_err(|e| RedactionError::from_parse(&e))?;

    let contexts = document
        .get_mut("data")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| RedactionError::malformed("expected an object with a `data` array"))?;

    for (index, context) in contexts.iter_mut().enumerate() {
        redact_context(rule, index, context);
    }

    Ok(document.to_string())
}

fn redact_context(rule: &NestedRule, index: usize, context: &mut Value) {
    let Some(object) = context.as_object_mut() else {
        trace!(index, "skipping non-object context");
        return;
    };

    let matched = object
        .get("schema")
        .and_then(Value::as_str)
        .map(|schema| rule.schema_criterion.matches_str(schema))
        .unwrap_or(false);
    if !matched {
        trace!(index, criterion = %rule.schema_criterion, "context schema does not match");
        return;
    }

    if let Some(data) = object.get_mut("data") {
        let count = rewrite_paths(&rule.json_path, &rule.strategy, data);
        trace!(index, path = %rule.json_path, count, "redacted context values");
    }
}

/// Scramble every string the path selects in `data`, in place.
///
/// A selected string is replaced; a selected array has its string elements
/// replaced; anything else is left as is. Each location is scrambled at most
/// once. Returns the number of strings replaced.
pub fn rewrite_paths(path: &JsonPath, strategy: &RedactionStrategy, data: &mut Value) -> usize {
    let mut done: HashSet<Location> = HashSet::new();
    let mut count = 0;

    for location in path.select(data) {
        if done.contains(&location) {
            continue;
        }
        let Some(target) = resolve_mut(data, &location) else {
            continue;
        };

        match target {
            Value::String(s) => {
                *s = strategy.scramble(s);
                count += 1;
                done.insert(location);
            }
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    let mut item_location = location.clone();
                    item_location.push(Step::Index(i));
                    if done.contains(&item_location) {
                        continue;
                    }
                    if let Value::String(s) = item {
                        *s = strategy.scramble(s);
                        count += 1;
                        done.insert(item_location);
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => {}
        }
    }

    count
}
