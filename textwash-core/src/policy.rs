//! policy.rs - Declarative content policy enforcement.
//!
//! A [`Policy`] declares length and pattern constraints; [`enforce`]
//! evaluates them in a fixed order and reports violations as data. Policy
//! enforcement never fails the call for non-compliant content; a malformed
//! policy object is the only error path, and it is rejected before any
//! content is touched.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::compiler::compile_caller_pattern;
use crate::encoders::clean_whitespace;
use crate::errors::EngineError;
use crate::transformers::prevent_xss;

/// Declarative constraints evaluated against content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Content longer than this many characters is truncated, with a
    /// violation recorded.
    pub max_length: Option<usize>,
    /// Every match of each pattern is removed; one violation is recorded
    /// per pattern that matched.
    pub forbidden_patterns: Vec<String>,
    /// Each pattern must be present in the already truncated/filtered
    /// content; a violation is recorded per absent pattern.
    pub required_patterns: Vec<String>,
    /// When set, `prevent_xss` and `clean_whitespace` run as a final step.
    pub auto_sanitize: bool,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    pub sanitized_content: String,
    pub violations: Vec<String>,
    pub compliant: bool,
    pub original_length: usize,
    pub final_length: usize,
}

/// Evaluates a policy against content.
///
/// Processing order: truncate, remove forbidden matches, check required
/// patterns, then (optionally) auto-sanitize. All patterns are compiled up
/// front so a malformed policy is rejected before any step runs.
pub fn enforce(
    content: &str,
    policy: &Policy,
    max_pattern_len: usize,
) -> Result<PolicyResult, EngineError> {
    let forbidden = compile_all(&policy.forbidden_patterns, max_pattern_len)?;
    let required = compile_all(&policy.required_patterns, max_pattern_len)?;

    let original_length = content.chars().count();
    let mut current = content.to_string();
    let mut violations = Vec::new();

    if let Some(max_length) = policy.max_length {
        if original_length > max_length {
            current = current.chars().take(max_length).collect();
            violations.push(format!(
                "content length {original_length} exceeds maximum length {max_length}; truncated"
            ));
        }
    }

    for (source, re) in policy.forbidden_patterns.iter().zip(&forbidden) {
        if re.is_match(&current) {
            current = re.replace_all(&current, "").into_owned();
            violations.push(format!("forbidden pattern '{source}' matched; occurrences removed"));
        }
    }

    for (source, re) in policy.required_patterns.iter().zip(&required) {
        if !re.is_match(&current) {
            violations.push(format!("required pattern '{source}' not found"));
        }
    }

    if policy.auto_sanitize {
        current = prevent_xss(&current).output;
        current = clean_whitespace(&current).output;
    }

    debug!("policy_enforce recorded {} violation(s).", violations.len());
    let final_length = current.chars().count();
    Ok(PolicyResult {
        compliant: violations.is_empty(),
        sanitized_content: current,
        violations,
        original_length,
        final_length,
    })
}

fn compile_all(
    sources: &[String],
    max_pattern_len: usize,
) -> Result<Vec<Arc<regex::Regex>>, EngineError> {
    sources
        .iter()
        .map(|source| compile_caller_pattern(source, max_pattern_len))
        .collect()
}
