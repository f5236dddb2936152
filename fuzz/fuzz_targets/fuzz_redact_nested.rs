//! Fuzz target for nested (JSON) field redaction.
//!
//! Arbitrary field text must either redact to valid JSON or fail closed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use pii_redact::{FieldRule, JsonPath, RedactionStrategy};
use pii_schema::SchemaCriterion;

static RULE: Lazy<FieldRule> = Lazy::new(|| {
    FieldRule::nested(
        "contexts",
        SchemaCriterion::parse("iglu:com.acme/ua/jsonschema/1-*-*").expect("criterion must parse"),
        JsonPath::parse("$..*").expect("path must parse"),
        RedactionStrategy::pseudonymize("SHA-256").expect("SHA-256 is supported"),
    )
});

fuzz_target!(|data: &str| {
    if let Ok(redacted) = RULE.apply(data) {
        assert!(serde_json::from_str::<serde_json::Value>(&redacted).is_ok());
    }
});
