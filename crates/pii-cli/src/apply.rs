//! Redaction of a JSON-lines record stream.
//!
//! Each non-blank input line must be a JSON object mapping field names to
//! values. Fields named by a rule go through the augmented pipeline; all
//! other fields are copied through. Records with any failing field are
//! withheld from the output and counted.

use crate::error::Result;
use pii_redact::{augment, RedactionRuleSet, TransformMap};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Counters for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    /// Non-blank lines read.
    pub records: u64,
    /// Records withheld because parsing or redaction failed.
    pub failed: u64,
}

impl ApplyStats {
    pub fn written(&self) -> u64 {
        self.records - self.failed
    }
}

/// Redact every record read from `input`, writing survivors to `output`.
///
/// Failed records are logged by line number only; their content never
/// reaches the log or the output.
pub fn redact_stream<R: BufRead, W: Write>(
    rules: &RedactionRuleSet,
    mut input: R,
    mut output: W,
) -> Result<ApplyStats> {
    let pipeline = augment(
        &TransformMap::identity(rules.iter().map(|rule| rule.field_name().to_string())),
        rules,
    );
    let mut stats = ApplyStats::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            stats.records += 1;
            stats.failed += 1;
            warn!(line = line_no, "record is not valid UTF-8; withheld");
            continue;
        };
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        if line.trim().is_empty() {
            continue;
        }
        stats.records += 1;

        match redact_record(&pipeline, line, line_no) {
            Some(record) => {
                serde_json::to_writer(&mut output, &record).map_err(std::io::Error::from)?;
                output.write_all(b"\n")?;
            }
            None => stats.failed += 1,
        }
    }

    output.flush()?;
    info!(
        records = stats.records,
        written = stats.written(),
        failed = stats.failed,
        "redaction stream finished"
    );
    Ok(stats)
}

fn redact_record(pipeline: &TransformMap, line: &str, line_no: usize) -> Option<Map<String, Value>> {
    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!(line = line_no, "record is not a JSON object; withheld");
            return None;
        }
        Err(err) => {
            warn!(
                line = line_no,
                category = ?err.classify(),
                column = err.column(),
                "record is not valid JSON; withheld"
            );
            return None;
        }
    };

    // Only fields the pipeline converts need a textual form.
    let mut raw = BTreeMap::new();
    for (field, value) in &object {
        if pipeline.get(field).is_none() {
            continue;
        }
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        raw.insert(field.clone(), text);
    }

    let converted = match pipeline.run(&raw) {
        Ok(converted) => converted,
        Err(errors) => {
            for err in &errors {
                warn!(line = line_no, field = err.field(), error = %err, "field redaction failed");
            }
            return None;
        }
    };

    let mut record = object;
    for (field, text) in converted {
        let structured = matches!(record.get(&field), Some(Value::Array(_) | Value::Object(_)));
        let value = if structured {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };
        record.insert(field, value);
    }
    debug!(line = line_no, "record redacted");
    Some(record)
}
