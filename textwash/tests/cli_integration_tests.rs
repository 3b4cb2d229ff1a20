// textwash/tests/cli_integration_tests.rs
//! Command-line integration tests for the `textwash` binary.
//!
//! These tests execute the real binary with `assert_cmd`, feed content via
//! stdin or flags, and assert on the printed JSON envelope and the exit
//! code. `tempfile` provides throwaway input and configuration files so the
//! tests stay isolated.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

/// Helper to run `textwash` with stdin input and arguments.
fn run_textwash(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("textwash").unwrap();
    cmd.env("RUST_LOG", "debug");
    cmd.args(args);
    cmd.write_stdin(input.as_bytes());
    cmd.assert()
}

fn envelope_from(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    serde_json::from_str(stdout.trim()).expect("stdout is a JSON envelope")
}

#[test]
fn escape_html_via_stdin() {
    let assert = run_textwash("<b>x</b>", &["-q", "run", "escape_html"]).success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["operation"], "escape_html");
    assert_eq!(envelope["result"]["output"], "&lt;b&gt;x&lt;/b&gt;");
}

#[test]
fn content_flag_bypasses_stdin() {
    let assert = run_textwash("", &["-q", "run", "clean_whitespace", "--content", "  a   b  "]).success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["result"]["output"], "a b");
}

#[test]
fn unknown_operation_exits_nonzero_with_an_error_envelope() {
    let assert = run_textwash("x", &["-q", "run", "transmogrify"]).failure().code(1);
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["status"], "error");
    assert!(envelope["error"].as_str().unwrap().contains("transmogrify"));
}

#[test]
fn params_json_reaches_the_handler() {
    let assert = run_textwash(
        "call 555-123-4567 now",
        &[
            "-q",
            "run",
            "mask_custom",
            "--params",
            r#"{"pattern": "[0-9]{3}-[0-9]{3}-[0-9]{4}", "replacement": "[number]"}"#,
        ],
    )
    .success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["result"]["output"], "call [number] now");
}

#[test]
fn input_file_is_read_as_content() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "damn fine coffee").unwrap();

    let assert = run_textwash(
        "",
        &[
            "-q",
            "run",
            "filter_profanity",
            "--input-file",
            file.path().to_str().unwrap(),
        ],
    )
    .success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["result"]["output"], "*** fine coffee");
}

#[test]
fn custom_config_file_changes_engine_behavior() {
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        "profanity:\n  replacement: \"[removed]\"\n  words:\n    - voldemort\n"
    )
    .unwrap();

    let assert = run_textwash(
        "he said voldemort twice",
        &[
            "-q",
            "run",
            "filter_profanity",
            "--config",
            config.path().to_str().unwrap(),
        ],
    )
    .success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["result"]["output"], "he said [removed] twice");
}

#[test]
fn missing_config_file_is_reported() {
    run_textwash("x", &["-q", "run", "escape_html", "--config", "/nonexistent/config.yaml"])
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn batch_runs_from_params_without_stdin() {
    let assert = run_textwash(
        "",
        &[
            "-q",
            "run",
            "batch_sanitize",
            "--params",
            r#"{"items": ["  a ", "b  "], "operation": "clean_whitespace"}"#,
        ],
    )
    .success();
    let envelope = envelope_from(&assert);
    assert_eq!(envelope["result"]["total"], 2);
    assert_eq!(envelope["result"]["failed"], 0);
}

#[test]
fn operations_subcommand_lists_the_catalogue() {
    let mut cmd = Command::cargo_bin("textwash").unwrap();
    cmd.args(["operations"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("validate_email"))
        .stdout(predicate::str::contains("policy_enforce"))
        .stdout(predicate::str::contains("batch_sanitize"));
}

#[test]
fn pretty_flag_formats_the_envelope() {
    let assert = run_textwash("x", &["-q", "run", "escape_html", "--pretty"]).success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("\n  \"status\""));
}
