//! processor.rs - The stateless processor and its dispatcher.
//!
//! [`Processor::execute`] is the single entry point of the engine: it looks
//! the operation up in the closed catalogue, checks required parameters and
//! the content-length ceiling, invokes exactly one handler, and wraps the
//! outcome in an [`Envelope`]. Request errors (unknown operation, missing
//! parameter, oversized content) are rejected before any handler runs;
//! handler errors are converted at this boundary, and nothing propagates to
//! the caller as a panic.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Instant;

use crate::batch::{BatchItemResult, BatchResult};
use crate::config::EngineConfig;
use crate::encoders;
use crate::envelope::Envelope;
use crate::errors::EngineError;
use crate::filters;
use crate::maskers;
use crate::operation::OperationKind;
use crate::policy::{self, Policy};
use crate::transformers;
use crate::validators;

/// The stateless operation processor.
///
/// Holds only configuration; every call builds its result from scratch, so
/// a single `Processor` may be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Processor {
    config: EngineConfig,
}

impl Processor {
    /// Builds a processor over the embedded default configuration.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_config(EngineConfig::load_default()?))
    }

    /// Builds a processor over an explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Executes one operation and always returns an envelope.
    pub fn execute(&self, operation: &str, parameters: &Value) -> Envelope {
        let started = Instant::now();
        debug!("Dispatching operation '{operation}'.");

        match self.try_execute(operation, parameters) {
            Ok(result) => Envelope::success(operation, result, started.elapsed()),
            Err(e) => {
                warn!("Operation '{operation}' rejected: {e}");
                Envelope::failure(operation, e.to_string(), started.elapsed())
            }
        }
    }

    fn try_execute(&self, operation: &str, parameters: &Value) -> Result<Value, EngineError> {
        let kind: OperationKind = operation.parse()?;
        let params = parameters
            .as_object()
            .ok_or_else(|| EngineError::InvalidParameter {
                parameter: "parameters",
                reason: "expected a JSON object".to_string(),
            })?;
        self.dispatch(kind, params)
    }

    /// Invokes the handler for `kind` after the request-level checks.
    ///
    /// The match is exhaustive over [`OperationKind`]: an operation without
    /// a handler cannot compile.
    fn dispatch(&self, kind: OperationKind, params: &Map<String, Value>) -> Result<Value, EngineError> {
        for &required in kind.required_params() {
            if matches!(params.get(required), None | Some(Value::Null)) {
                return Err(EngineError::MissingParameter {
                    operation: kind.as_str(),
                    parameter: required,
                });
            }
        }

        if let Some(content) = params.get("content").and_then(Value::as_str) {
            let max = self.config.limits.max_content_length;
            if content.len() > max {
                return Err(EngineError::ContentLengthExceeded(content.len(), max));
            }
        }

        match kind {
            OperationKind::ValidateEmail => {
                value_of(validators::validate_email(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateUrl => {
                value_of(validators::validate_url(require_str(params, kind, "content")?))
            }
            OperationKind::ValidatePhone => {
                value_of(validators::validate_phone(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateIp => {
                value_of(validators::validate_ip(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateDomain => {
                value_of(validators::validate_domain(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateFileType => {
                let filename = require_str(params, kind, "content")?;
                let allowed = require_string_list(params, kind, "allowed_types")?;
                value_of(validators::validate_file_type(filename, &allowed))
            }
            OperationKind::ValidateJson => {
                value_of(validators::validate_json(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateXml => {
                value_of(validators::validate_xml(require_str(params, kind, "content")?))
            }
            OperationKind::ValidateCsrfToken => {
                let token = require_str(params, kind, "content")?;
                let expected = require_str(params, kind, "expected")?;
                value_of(validators::validate_csrf_token(token, expected))
            }
            OperationKind::SanitizeHtml => {
                let content = require_str(params, kind, "content")?;
                let allowed = optional_string_list(params, "allowed_tags")?;
                value_of(transformers::sanitize_html(content, allowed.as_deref()))
            }
            OperationKind::StripHtml => {
                value_of(transformers::strip_html(require_str(params, kind, "content")?))
            }
            OperationKind::EscapeHtml => {
                value_of(transformers::escape_html(require_str(params, kind, "content")?))
            }
            OperationKind::UnescapeHtml => {
                value_of(transformers::unescape_html(require_str(params, kind, "content")?))
            }
            OperationKind::SanitizeXml => {
                value_of(transformers::sanitize_xml(require_str(params, kind, "content")?))
            }
            OperationKind::PreventXss => {
                value_of(transformers::prevent_xss(require_str(params, kind, "content")?))
            }
            OperationKind::PreventSqlInjection => {
                value_of(transformers::prevent_sql_injection(require_str(params, kind, "content")?))
            }
            OperationKind::PreventPathTraversal => {
                value_of(transformers::prevent_path_traversal(require_str(params, kind, "content")?))
            }
            OperationKind::SanitizeFilename => {
                value_of(transformers::sanitize_filename(require_str(params, kind, "content")?))
            }
            OperationKind::FilterProfanity => {
                let content = require_str(params, kind, "content")?;
                let words = optional_string_list(params, "words")?
                    .unwrap_or_else(|| self.config.profanity.words.clone());
                let replacement = optional_str(params, "replacement")?
                    .unwrap_or(&self.config.profanity.replacement);
                value_of(filters::filter_profanity(content, &words, replacement)?)
            }
            OperationKind::FilterSensitiveData => {
                value_of(filters::filter_sensitive_data(require_str(params, kind, "content")?))
            }
            OperationKind::RemoveMetadata => {
                value_of(filters::remove_metadata(require_str(params, kind, "content")?))
            }
            OperationKind::WhitelistChars => {
                let content = require_str(params, kind, "content")?;
                let allowed = require_str(params, kind, "allowed_chars")?;
                value_of(filters::whitelist_chars(content, allowed))
            }
            OperationKind::BlacklistChars => {
                let content = require_str(params, kind, "content")?;
                let forbidden = require_str(params, kind, "forbidden_chars")?;
                value_of(filters::blacklist_chars(content, forbidden))
            }
            OperationKind::MaskEmail => {
                let content = require_str(params, kind, "content")?;
                value_of(maskers::mask_email(content, optional_mask_char(params)?))
            }
            OperationKind::MaskPhone => {
                let content = require_str(params, kind, "content")?;
                value_of(maskers::mask_phone(content, optional_mask_char(params)?))
            }
            OperationKind::MaskCreditCard => {
                let content = require_str(params, kind, "content")?;
                value_of(maskers::mask_credit_card(content, optional_mask_char(params)?))
            }
            OperationKind::MaskSsn => {
                let content = require_str(params, kind, "content")?;
                value_of(maskers::mask_ssn(content, optional_mask_char(params)?))
            }
            OperationKind::MaskCustom => {
                let content = require_str(params, kind, "content")?;
                let pattern = require_str(params, kind, "pattern")?;
                let replacement = require_str(params, kind, "replacement")?;
                value_of(maskers::mask_custom(
                    content,
                    pattern,
                    replacement,
                    self.config.limits.max_pattern_length,
                )?)
            }
            OperationKind::UrlEncode => {
                value_of(encoders::url_encode(require_str(params, kind, "content")?))
            }
            OperationKind::UrlDecode => {
                value_of(encoders::url_decode(require_str(params, kind, "content")?))
            }
            OperationKind::Base64Encode => {
                value_of(encoders::base64_encode(require_str(params, kind, "content")?))
            }
            OperationKind::Base64Decode => {
                value_of(encoders::base64_decode(require_str(params, kind, "content")?))
            }
            OperationKind::NormalizeUnicode => {
                let content = require_str(params, kind, "content")?;
                let form = optional_str(params, "form")?.unwrap_or("NFC");
                value_of(encoders::normalize_unicode(content, form)?)
            }
            OperationKind::CleanWhitespace => {
                value_of(encoders::clean_whitespace(require_str(params, kind, "content")?))
            }
            OperationKind::ExtractSafeText => {
                value_of(encoders::extract_safe_text(require_str(params, kind, "content")?))
            }
            OperationKind::PolicyEnforce => {
                let content = require_str(params, kind, "content")?;
                let policy_value = params.get("policy").cloned().unwrap_or(Value::Null);
                let policy: Policy = serde_json::from_value(policy_value)
                    .map_err(|e| EngineError::MalformedPolicy(e.to_string()))?;
                value_of(policy::enforce(
                    content,
                    &policy,
                    self.config.limits.max_pattern_length,
                )?)
            }
            OperationKind::BatchSanitize => self.run_batch(params),
        }
    }

    /// Applies one single-item operation to every item, isolating failures
    /// per index. The result list always has one entry per input item, in
    /// input order.
    fn run_batch(&self, params: &Map<String, Value>) -> Result<Value, EngineError> {
        let items = match params.get("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EngineError::InvalidParameter {
                    parameter: "items",
                    reason: "expected an array".to_string(),
                })
            }
        };
        let max_items = self.config.limits.max_batch_items;
        if items.len() > max_items {
            return Err(EngineError::BatchSizeExceeded(items.len(), max_items));
        }

        let operation = require_str(params, OperationKind::BatchSanitize, "operation")?;
        let kind: OperationKind = operation.parse()?;
        if kind == OperationKind::BatchSanitize {
            return Err(EngineError::InvalidParameter {
                parameter: "operation",
                reason: "batch_sanitize cannot be nested".to_string(),
            });
        }

        let base_params = match params.get("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(EngineError::InvalidParameter {
                    parameter: "params",
                    reason: "expected an object".to_string(),
                })
            }
        };

        debug!("Running batch of {} item(s) through '{kind}'.", items.len());
        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let record = match item {
                Value::String(content) => {
                    let mut item_params = base_params.clone();
                    item_params.insert("content".to_string(), Value::String(content.clone()));
                    match self.dispatch(kind, &item_params) {
                        Ok(result) => BatchItemResult::success(index, content.clone(), result),
                        Err(e) => BatchItemResult::failure(index, content.clone(), e.to_string()),
                    }
                }
                other => BatchItemResult::failure(
                    index,
                    other.to_string(),
                    "item is not a string".to_string(),
                ),
            };
            results.push(record);
        }

        value_of(BatchResult::from_items(results))
    }
}

static DEFAULT_PROCESSOR: Lazy<Processor> = Lazy::new(|| {
    let config = EngineConfig::load_default().unwrap_or_else(|e| {
        warn!("Falling back to built-in configuration defaults: {e}");
        EngineConfig::default()
    });
    Processor::with_config(config)
});

/// One-shot convenience entry point over the default configuration.
///
/// Equivalent to building a [`Processor`] with the embedded defaults and
/// calling [`Processor::execute`].
pub fn execute(operation: &str, parameters: &Value) -> Envelope {
    DEFAULT_PROCESSOR.execute(operation, parameters)
}

fn value_of<T: Serialize>(value: T) -> Result<Value, EngineError> {
    serde_json::to_value(value).map_err(|e| EngineError::Fatal(e.to_string()))
}

fn require_str<'a>(
    params: &'a Map<String, Value>,
    kind: OperationKind,
    name: &'static str,
) -> Result<&'a str, EngineError> {
    match params.get(name) {
        Some(Value::String(s)) => Ok(s),
        None | Some(Value::Null) => Err(EngineError::MissingParameter {
            operation: kind.as_str(),
            parameter: name,
        }),
        Some(_) => Err(EngineError::InvalidParameter {
            parameter: name,
            reason: "expected a string".to_string(),
        }),
    }
}

fn optional_str<'a>(
    params: &'a Map<String, Value>,
    name: &'static str,
) -> Result<Option<&'a str>, EngineError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(EngineError::InvalidParameter {
            parameter: name,
            reason: "expected a string".to_string(),
        }),
    }
}

fn string_list(value: &Value, name: &'static str) -> Result<Vec<String>, EngineError> {
    let Value::Array(entries) = value else {
        return Err(EngineError::InvalidParameter {
            parameter: name,
            reason: "expected an array of strings".to_string(),
        });
    };
    entries
        .iter()
        .map(|entry| match entry {
            Value::String(s) => Ok(s.clone()),
            _ => Err(EngineError::InvalidParameter {
                parameter: name,
                reason: "expected an array of strings".to_string(),
            }),
        })
        .collect()
}

fn require_string_list(
    params: &Map<String, Value>,
    kind: OperationKind,
    name: &'static str,
) -> Result<Vec<String>, EngineError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(EngineError::MissingParameter {
            operation: kind.as_str(),
            parameter: name,
        }),
        Some(value) => string_list(value, name),
    }
}

fn optional_string_list(
    params: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<Vec<String>>, EngineError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => string_list(value, name).map(Some),
    }
}

fn optional_mask_char(params: &Map<String, Value>) -> Result<char, EngineError> {
    match optional_str(params, "mask_char")? {
        None => Ok(maskers::DEFAULT_MASK_CHAR),
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(EngineError::InvalidParameter {
                    parameter: "mask_char",
                    reason: "expected a single character".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processor() -> Processor {
        Processor::new().unwrap()
    }

    #[test]
    fn unknown_operation_returns_an_error_envelope() {
        let envelope = processor().execute("transmogrify", &json!({"content": "x"}));
        assert!(!envelope.is_success());
        assert!(envelope.error.as_deref().unwrap().contains("transmogrify"));
        assert!(envelope.result.is_none());
    }

    #[test]
    fn missing_parameter_is_rejected_before_the_handler_runs() {
        let envelope = processor().execute("mask_custom", &json!({"content": "x"}));
        assert!(!envelope.is_success());
        assert!(envelope.error.as_deref().unwrap().contains("pattern"));
    }

    #[test]
    fn oversized_content_is_rejected() {
        let mut config = EngineConfig::load_default().unwrap();
        config.limits.max_content_length = 8;
        let processor = Processor::with_config(config);

        let envelope = processor.execute("clean_whitespace", &json!({"content": "far too long"}));
        assert!(!envelope.is_success());
        assert!(envelope.error.as_deref().unwrap().contains("maximum"));
    }

    #[test]
    fn successful_dispatch_carries_timing_and_timestamp() {
        let envelope = processor().execute("escape_html", &json!({"content": "<x>"}));
        assert!(envelope.is_success());
        assert!(envelope.processing_time_seconds >= 0.0);
        assert!(!envelope.timestamp.is_empty());
        let result = envelope.result.unwrap();
        assert_eq!(result["output"], "&lt;x&gt;");
    }

    #[test]
    fn profanity_filter_uses_configured_defaults() {
        let envelope = processor().execute("filter_profanity", &json!({"content": "damn right"}));
        let result = envelope.result.unwrap();
        assert_eq!(result["output"], "*** right");
    }

    #[test]
    fn profanity_filter_accepts_per_call_overrides() {
        let envelope = processor().execute(
            "filter_profanity",
            &json!({"content": "frak this", "words": ["frak"], "replacement": "[beep]"}),
        );
        assert_eq!(envelope.result.unwrap()["output"], "[beep] this");
    }

    #[test]
    fn batch_isolates_failures_per_item() {
        let envelope = processor().execute(
            "batch_sanitize",
            &json!({"items": ["ok", 42, "ok2"], "operation": "clean_whitespace"}),
        );
        assert!(envelope.is_success());

        let result = envelope.result.unwrap();
        assert_eq!(result["total"], 3);
        assert_eq!(result["successful"], 2);
        assert_eq!(result["failed"], 1);
        let results = result["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1]["status"], "error");
        assert_eq!(results[0]["status"], "success");
        assert_eq!(results[2]["status"], "success");
    }

    #[test]
    fn nested_batch_is_rejected() {
        let envelope = processor().execute(
            "batch_sanitize",
            &json!({"items": ["x"], "operation": "batch_sanitize"}),
        );
        assert!(!envelope.is_success());
        assert!(envelope.error.as_deref().unwrap().contains("nested"));
    }

    #[test]
    fn malformed_policy_is_a_request_error() {
        let envelope = processor().execute(
            "policy_enforce",
            &json!({"content": "x", "policy": {"max_length": "not a number"}}),
        );
        assert!(!envelope.is_success());
        assert!(envelope.error.as_deref().unwrap().contains("policy"));
    }

    #[test]
    fn policy_enforce_reports_violations_as_data() {
        let envelope = processor().execute(
            "policy_enforce",
            &json!({"content": "abcdefgh", "policy": {"max_length": 5}}),
        );
        assert!(envelope.is_success());
        let result = envelope.result.unwrap();
        assert_eq!(result["sanitized_content"], "abcde");
        assert_eq!(result["compliant"], false);
    }

    #[test]
    fn one_shot_execute_uses_the_default_configuration() {
        let envelope = execute("validate_email", &json!({"content": "a@example.com"}));
        assert!(envelope.is_success());
        assert_eq!(envelope.result.unwrap()["valid"], true);
    }
}
