//! Fuzz target for schema key and criterion parsing.
//!
//! Parsed keys must print back to a string that parses to the same key.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pii_schema::{SchemaCriterion, SchemaKey};

fuzz_target!(|data: &str| {
    if let Ok(key) = SchemaKey::parse(data) {
        let reparsed = SchemaKey::parse(&key.to_string()).expect("printed key must parse");
        assert_eq!(key, reparsed);
    }

    if let Ok(criterion) = SchemaCriterion::parse(data) {
        let _ = criterion.matches_str(data);
        let _ = criterion.to_string();
    }
});
