//! filters.rs - Content filters: profanity, sensitive data, metadata, and
//! character-set filtering.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::NoExpand;
use serde_json::json;
use std::collections::HashSet;

use crate::compiler::compile_cached;
use crate::errors::EngineError;
use crate::patterns::PatternLibrary;
use crate::transformers::TransformResult;

/// Fixed-width placeholders used by [`filter_sensitive_data`].
const SSN_PLACEHOLDER: &str = "XXX-XX-XXXX";
const CREDIT_CARD_PLACEHOLDER: &str = "XXXX-XXXX-XXXX-XXXX";
const PHONE_PLACEHOLDER: &str = "XXX-XXX-XXXX";

/// Replaces whole-word, case-insensitive occurrences of the given words.
///
/// An empty word list leaves the content untouched. The combined word
/// pattern is compiled through the shared cache, so repeated calls with the
/// same list are cheap.
pub fn filter_profanity(
    content: &str,
    words: &[String],
    replacement: &str,
) -> Result<TransformResult, EngineError> {
    if words.is_empty() {
        return Ok(TransformResult::new(content, content.to_string())
            .with_meta("matches_replaced", json!(0)));
    }

    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)\b(?:{alternation})\b");
    let re = compile_cached(&pattern)?;

    let matches = re.find_iter(content).count();
    let output = re.replace_all(content, NoExpand(replacement)).into_owned();
    debug!("filter_profanity replaced {matches} match(es).");

    Ok(TransformResult::new(content, output).with_meta("matches_replaced", json!(matches)))
}

/// Replaces SSN, credit-card, and 10-digit phone matches with fixed-width
/// placeholder masks.
pub fn filter_sensitive_data(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();

    // Credit cards first: a 16-digit grouped number must not be consumed
    // piecemeal by the narrower phone detector.
    let cards = patterns.credit_card.find_iter(content).count();
    let output = patterns
        .credit_card
        .replace_all(content, CREDIT_CARD_PLACEHOLDER);

    let ssns = patterns.ssn.find_iter(&output).count();
    let output = patterns.ssn.replace_all(&output, SSN_PLACEHOLDER);

    let phones = patterns.us_phone.find_iter(&output).count();
    let output = patterns
        .us_phone
        .replace_all(&output, PHONE_PLACEHOLDER)
        .into_owned();

    TransformResult::new(content, output)
        .with_meta("credit_cards_masked", json!(cards))
        .with_meta("ssns_masked", json!(ssns))
        .with_meta("phones_masked", json!(phones))
}

/// Strips HTML/XML-style comments.
pub fn remove_metadata(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let removed = patterns.html_comment.find_iter(content).count();
    let output = patterns.html_comment.replace_all(content, "").into_owned();
    TransformResult::new(content, output).with_meta("comments_removed", json!(removed))
}

/// Keeps only the characters present in `allowed_chars`; surviving
/// characters retain their order.
pub fn whitelist_chars(content: &str, allowed_chars: &str) -> TransformResult {
    let allowed: HashSet<char> = allowed_chars.chars().collect();
    let output: String = content.chars().filter(|c| allowed.contains(c)).collect();
    TransformResult::new(content, output)
}

/// Removes every character present in `forbidden_chars`; surviving
/// characters retain their order.
pub fn blacklist_chars(content: &str, forbidden_chars: &str) -> TransformResult {
    let forbidden: HashSet<char> = forbidden_chars.chars().collect();
    let output: String = content.chars().filter(|c| !forbidden.contains(c)).collect();
    TransformResult::new(content, output)
}
