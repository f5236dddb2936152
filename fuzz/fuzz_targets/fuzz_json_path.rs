//! Fuzz target for JSONPath compilation and selection.
//!
//! Compiling arbitrary expressions must never panic, and every location a
//! compiled path selects must resolve in the document it was selected from.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pii_redact::json_path::resolve_mut;
use pii_redact::JsonPath;
use serde_json::json;

fuzz_target!(|data: &str| {
    let Ok(path) = JsonPath::parse(data) else {
        return;
    };

    let mut document = json!({
        "a": [1, "two", {"b": "c", "d": [null, true]}],
        "e": {"f": {"g": "h"}},
        "": "empty key"
    });
    for location in path.select(&document.clone()) {
        assert!(resolve_mut(&mut document, &location).is_some());
    }
});
