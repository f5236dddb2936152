//! End-to-end tests for the pii-redact binary.
//!
//! These tests verify:
//! - `check` reports compiled rules and every configuration error
//! - `apply` redacts JSON-lines records and withholds failures
//! - `digest` prints deterministic digests
//! - Exit codes follow the documented contract

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// SHA-256 of "alice".
const ALICE_SHA256: &str = "2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90";

/// SHA-256 of "alice" followed by the salt "pepper".
const ALICE_PEPPER_SHA256: &str =
    "ce463bda1f16f7677143cb3f780c961ffd9d5c1546de788e0047e17e4d6adc45";

const VALID_CONFIG: &str = r#"{
    "schema": "iglu:com.snowplowanalytics.snowplow.enrichments/pii_enrichment_config/jsonschema/2-0-0",
    "data": {
        "vendor": "com.snowplowanalytics.snowplow.enrichments",
        "name": "pii_enrichment_config",
        "enabled": true,
        "parameters": {
            "pii": [
                {"pojo": {"field": "user_id"}},
                {"json": {"field": "contexts", "schemaCriterion": "iglu:com.acme/ua/jsonschema/1-*-*", "jsonPath": "$.useragent"}}
            ],
            "strategy": {"pseudonymize": {"hashFunction": "SHA-256"}}
        }
    }
}"#;

const BROKEN_CONFIG: &str = r#"{
    "schema": "iglu:com.snowplowanalytics.snowplow.enrichments/pii_enrichment_config/jsonschema/2-0-0",
    "data": {
        "enabled": true,
        "parameters": {
            "pii": [
                {"json": {"field": "contexts", "schemaCriterion": "iglu:bad", "jsonPath": "$.a"}},
                {"json": {"field": "contexts", "schemaCriterion": "iglu:com.acme/ua/jsonschema/1-0-0", "jsonPath": "$[?(@.a)]"}}
            ],
            "strategy": {"pseudonymize": {"hashFunction": "MD4"}}
        }
    }
}"#;

/// Get a Command for the pii-redact binary, isolated from the host config.
fn pii_redact(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pii-redact").expect("pii-redact binary should exist");
    cmd.env_remove("PII_REDACT_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home)
        .env("PII_LOG", "warn");
    cmd
}

fn write_config(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("pii.json");
    fs::write(&path, text).unwrap();
    path
}

fn output_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_valid_config_lists_rules() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, VALID_CONFIG);

    let output = pii_redact(dir.path())
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["status"], "ok");
    assert_eq!(summary["rules"].as_array().unwrap().len(), 2);
    assert_eq!(summary["rules"][0]["kind"], "pojo");
    assert_eq!(summary["rules"][1]["field"], "contexts");
}

#[test]
fn check_broken_config_reports_every_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, BROKEN_CONFIG);

    let output = pii_redact(dir.path())
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .code(11)
        .get_output()
        .stdout
        .clone();

    let summary: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["status"], "error");
    assert_eq!(summary["errors"].as_array().unwrap().len(), 3);
}

#[test]
fn check_without_config_fails() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .arg("check")
        .assert()
        .code(11)
        .stderr(predicate::str::contains("no redaction configuration"));
}

#[test]
fn check_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .args(["check", "--config"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(10);
}

#[test]
fn config_discovered_from_env_and_xdg() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, VALID_CONFIG);

    pii_redact(dir.path())
        .env("PII_REDACT_CONFIG", &config)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("environment variable"));

    let xdg = dir.path().join("pii-redact");
    fs::create_dir_all(&xdg).unwrap();
    fs::write(xdg.join("pii_enrichment_config.json"), VALID_CONFIG).unwrap();

    pii_redact(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("XDG config"));
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn apply_redacts_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, VALID_CONFIG);
    let contexts = json!({"data": [
        {"schema": "iglu:com.acme/ua/jsonschema/1-0-0", "data": {"useragent": "secret-agent", "os": "linux"}}
    ]});
    let input = format!(
        "{}\n",
        json!({"user_id": "alice", "app_id": "shop", "contexts": contexts})
    );

    let output = pii_redact(dir.path())
        .args(["apply", "--config"])
        .arg(&config)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("secret-agent").not())
        .get_output()
        .stdout
        .clone();

    let records = output_lines(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user_id"], ALICE_SHA256);
    assert_eq!(records[0]["app_id"], "shop");
    assert_eq!(records[0]["contexts"]["data"][0]["data"]["os"], "linux");
}

#[test]
fn apply_file_to_file_withholds_failures() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, VALID_CONFIG);
    let input = dir.path().join("events.jsonl");
    let output = dir.path().join("redacted.jsonl");
    fs::write(
        &input,
        "{\"user_id\":\"alice\"}\n\n{\"contexts\":\"{not json\"}\n{\"user_id\":\"bob\"}\n",
    )
    .unwrap();

    pii_redact(dir.path())
        .args(["apply", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .code(12)
        .stderr(predicate::str::contains("not json").not());

    let records = output_lines(&fs::read(&output).unwrap());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["user_id"], ALICE_SHA256);
}

#[test]
fn apply_continues_past_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, VALID_CONFIG);
    let mut input = b"{\"user_id\":\"alice\"}\n{\"user_id\":\"\xff\"}\n".to_vec();
    input.extend_from_slice(b"{\"user_id\":\"alice\"}\n");

    let output = pii_redact(dir.path())
        .args(["apply", "--config"])
        .arg(&config)
        .write_stdin(input)
        .assert()
        .code(12)
        .get_output()
        .stdout
        .clone();

    let records = output_lines(&output);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["user_id"] == ALICE_SHA256));
}

#[test]
fn apply_disabled_config_is_passthrough() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &VALID_CONFIG.replace("\"enabled\": true", "\"enabled\": false"),
    );

    pii_redact(dir.path())
        .args(["apply", "--config"])
        .arg(&config)
        .write_stdin("{\"user_id\":\"alice\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"alice\""));
}

// ============================================================================
// digest
// ============================================================================

#[test]
fn digest_prints_one_line_per_value() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .args(["digest", "alice", "alice"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", ALICE_SHA256, ALICE_SHA256));
}

#[test]
fn digest_with_salt() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .args(["digest", "--salt", "pepper", "alice"])
        .assert()
        .success()
        .stdout(format!("{}\n", ALICE_PEPPER_SHA256));
}

#[test]
fn digest_unknown_algorithm_fails() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .args(["digest", "--hash-function", "MD4", "alice"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("MD4"));
}

#[test]
fn unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    pii_redact(dir.path())
        .arg("nonexistent-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
