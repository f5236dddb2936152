//! Fuzz target for redaction configuration compilation.
//!
//! Tests that arbitrary configuration documents are either compiled or
//! rejected with errors, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Err(errors) = pii_redact::compile_str(text) {
        assert!(!errors.is_empty());
    }
});
