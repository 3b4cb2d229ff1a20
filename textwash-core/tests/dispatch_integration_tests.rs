// textwash-core/tests/dispatch_integration_tests.rs
//! Engine-level tests exercising the full dispatch path: catalogue
//! coverage, envelope contract, batch isolation, and configuration
//! loading.

use serde_json::json;
use textwash_core::{execute, EngineConfig, OperationKind, Processor, Status};

/// Every catalogue operation must be reachable through the dispatcher with
/// its minimal parameter set and produce a success envelope.
#[test_log::test]
fn every_operation_dispatches_successfully() {
    let processor = Processor::new().unwrap();

    for kind in OperationKind::ALL {
        let params = match kind {
            OperationKind::BatchSanitize => {
                json!({"items": ["a", "b"], "operation": "clean_whitespace"})
            }
            OperationKind::PolicyEnforce => json!({"content": "hello", "policy": {}}),
            OperationKind::ValidateFileType => {
                json!({"content": "a.txt", "allowed_types": ["txt"]})
            }
            OperationKind::ValidateCsrfToken => {
                json!({"content": "abcdef0123456789", "expected": "abcdef0123456789"})
            }
            OperationKind::WhitelistChars => json!({"content": "abc", "allowed_chars": "ab"}),
            OperationKind::BlacklistChars => json!({"content": "abc", "forbidden_chars": "c"}),
            OperationKind::MaskCustom => {
                json!({"content": "abc", "pattern": "b", "replacement": "_"})
            }
            _ => json!({"content": "hello"}),
        };

        let envelope = processor.execute(kind.as_str(), &params);
        assert_eq!(
            envelope.status,
            Status::Success,
            "{} failed: {:?}",
            kind,
            envelope.error
        );
        assert_eq!(envelope.operation, kind.as_str());
        assert!(envelope.result.is_some());
        assert!(envelope.error.is_none());
    }
}

#[test]
fn envelope_reports_unknown_operations_without_partial_execution() {
    let envelope = execute("frobnicate", &json!({"content": "x"}));
    assert_eq!(envelope.status, Status::Error);
    assert!(envelope.result.is_none());
    assert!(envelope.error.unwrap().contains("frobnicate"));
}

#[test]
fn round_trip_properties_hold_through_the_dispatcher() {
    let samples = ["hello world", "<a href=\"x\">& 'stuff'</a>", "naïve café ☕"];

    for sample in samples {
        let escaped = execute("escape_html", &json!({"content": sample})).result.unwrap();
        let unescaped = execute("unescape_html", &json!({"content": escaped["output"]}))
            .result
            .unwrap();
        assert_eq!(unescaped["output"], sample);

        let encoded = execute("url_encode", &json!({"content": sample})).result.unwrap();
        let decoded = execute("url_decode", &json!({"content": encoded["output"]}))
            .result
            .unwrap();
        assert_eq!(decoded["output"], sample);

        let encoded = execute("base64_encode", &json!({"content": sample})).result.unwrap();
        let decoded = execute("base64_decode", &json!({"content": encoded["output"]}))
            .result
            .unwrap();
        assert_eq!(decoded["output"], sample);
    }
}

#[test]
fn masking_preserves_shape_through_the_dispatcher() {
    let envelope = execute("mask_email", &json!({"content": "john.doe@example.com"}));
    let output = envelope.result.unwrap()["output"].as_str().unwrap().to_string();
    assert!(output.starts_with('j'));
    assert!(output.ends_with("@example.com"));
    assert_eq!(
        output.split('@').next().unwrap().len(),
        "john.doe".len(),
    );
}

#[test]
fn batch_of_mixed_items_is_index_stable() {
    let envelope = execute(
        "batch_sanitize",
        &json!({
            "items": ["  ok  ", null, "ok2"],
            "operation": "clean_whitespace",
        }),
    );
    assert_eq!(envelope.status, Status::Success);

    let result = envelope.result.unwrap();
    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(result["total"], 3);
    assert_eq!(result["successful"], 2);
    assert_eq!(result["failed"], 1);

    assert_eq!(results[0]["index"], 0);
    assert_eq!(results[0]["result"]["output"], "ok");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[2]["index"], 2);
    assert_eq!(results[2]["result"]["output"], "ok2");
}

#[test]
fn batch_forwards_shared_params_to_every_item() {
    let envelope = execute(
        "batch_sanitize",
        &json!({
            "items": ["damn", "fine"],
            "operation": "filter_profanity",
            "params": {"replacement": "[beep]"},
        }),
    );
    let result = envelope.result.unwrap();
    assert_eq!(result["results"][0]["result"]["output"], "[beep]");
    assert_eq!(result["results"][1]["result"]["output"], "fine");
}

#[test]
fn policy_enforcement_truncates_and_reports() {
    let envelope = execute(
        "policy_enforce",
        &json!({"content": "abcdefgh", "policy": {"max_length": 5}}),
    );
    let result = envelope.result.unwrap();
    assert_eq!(result["sanitized_content"].as_str().unwrap().len(), 5);
    assert_eq!(result["compliant"], false);
    let violations = result["violations"].as_array().unwrap();
    assert!(violations[0].as_str().unwrap().contains('5'));
}

#[test]
fn validator_negative_cases_are_success_shaped() {
    for (operation, content) in [
        ("validate_email", "not-an-email"),
        ("validate_url", "definitely not a url"),
        ("validate_ip", "999.1.1.1"),
        ("validate_domain", "no"),
        ("validate_json", "{broken"),
        ("validate_xml", "<a><b></a></b>"),
    ] {
        let envelope = execute(operation, &json!({"content": content}));
        assert_eq!(envelope.status, Status::Success, "{operation}");
        assert_eq!(envelope.result.unwrap()["valid"], false, "{operation}");
    }
}

#[test_log::test]
fn user_configuration_file_overrides_defaults() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "limits:\n  max_content_length: 16\nprofanity:\n  replacement: \"[x]\"\n  words:\n    - gosh"
    )
    .unwrap();

    let user = EngineConfig::load_from_file(file.path()).unwrap();
    let merged = textwash_core::merge_config(EngineConfig::load_default().unwrap(), Some(user));
    let processor = Processor::with_config(merged);

    let envelope = processor.execute("filter_profanity", &json!({"content": "gosh darn"}));
    assert_eq!(envelope.result.unwrap()["output"], "[x] darn");

    let envelope = processor.execute(
        "clean_whitespace",
        &json!({"content": "this content is longer than sixteen bytes"}),
    );
    assert_eq!(envelope.status, Status::Error);
}

#[test]
fn processing_concurrently_needs_no_coordination() {
    let processor = std::sync::Arc::new(Processor::new().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let processor = std::sync::Arc::clone(&processor);
            std::thread::spawn(move || {
                let content = format!("<script>x</script>thread-{i}");
                let envelope = processor.execute("prevent_xss", &json!({"content": content}));
                let output = envelope.result.unwrap()["output"].as_str().unwrap().to_string();
                assert!(output.contains(&format!("thread-{i}")));
                assert!(!output.contains("<script"));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
