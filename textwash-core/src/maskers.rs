//! maskers.rs - Shape-preserving masking of sensitive values.
//!
//! Maskers keep the overall length and separators of the input and a small
//! number of visible characters, replacing the interior with a mask
//! character. Each masker has a minimum-length guard below which the input
//! is returned unchanged: masking a three-digit "phone number" would only
//! produce confusing output.
//!
//! License: MIT OR Apache-2.0

use serde_json::json;

use crate::compiler::compile_caller_pattern;
use crate::errors::EngineError;
use crate::transformers::TransformResult;
use crate::validators::{is_valid_credit_card_digits, is_valid_ssn_structure};

pub const DEFAULT_MASK_CHAR: char = '*';

/// Minimum local-part length for [`mask_email`] to act.
const EMAIL_MIN_LOCAL_CHARS: usize = 2;
/// Minimum digit counts for the numeric maskers to act.
const PHONE_MIN_DIGITS: usize = 8;
const CREDIT_CARD_MIN_DIGITS: usize = 13;
const SSN_DIGITS: usize = 9;
/// How many trailing digits stay visible.
const VISIBLE_SUFFIX_DIGITS: usize = 4;

/// Masks the local part of an email address, keeping its first character
/// and the full domain: `john.doe@example.com` becomes
/// `j*******@example.com`.
///
/// Inputs without an `@`, or with a local part shorter than two characters,
/// are returned unchanged.
pub fn mask_email(content: &str, mask_char: char) -> TransformResult {
    let Some((local, domain)) = content.split_once('@') else {
        return unmasked(content);
    };
    let local_chars = local.chars().count();
    if local_chars < EMAIL_MIN_LOCAL_CHARS || domain.is_empty() {
        return unmasked(content);
    }

    let mut output = String::with_capacity(content.len());
    let mut chars = local.chars();
    if let Some(first) = chars.next() {
        output.push(first);
    }
    output.extend(std::iter::repeat(mask_char).take(local_chars - 1));
    output.push('@');
    output.push_str(domain);

    TransformResult::new(content, output).with_meta("masked", json!(true))
}

/// Masks every digit but the last four, preserving separators. Inputs with
/// fewer than eight digits are returned unchanged.
pub fn mask_phone(content: &str, mask_char: char) -> TransformResult {
    mask_digits_keep_suffix(content, mask_char, PHONE_MIN_DIGITS, serde_json::Map::new())
}

/// Masks every digit but the last four, preserving separators. Inputs with
/// fewer than thirteen digits are returned unchanged. The Luhn check result
/// is attached as diagnostic metadata; it does not gate masking.
pub fn mask_credit_card(content: &str, mask_char: char) -> TransformResult {
    let mut extra = serde_json::Map::new();
    extra.insert(
        "luhn_valid".to_string(),
        json!(is_valid_credit_card_digits(content)),
    );
    mask_digits_keep_suffix(content, mask_char, CREDIT_CARD_MIN_DIGITS, extra)
}

/// Masks the first five digits of a Social Security number, keeping the
/// last four. Inputs with fewer than nine digits are returned unchanged.
/// Structural validity is attached as diagnostic metadata.
pub fn mask_ssn(content: &str, mask_char: char) -> TransformResult {
    let mut extra = serde_json::Map::new();
    extra.insert(
        "well_formed".to_string(),
        json!(is_valid_ssn_structure(content)),
    );
    mask_digits_keep_suffix(content, mask_char, SSN_DIGITS, extra)
}

/// Applies a caller-supplied pattern -> replacement rule.
pub fn mask_custom(
    content: &str,
    pattern: &str,
    replacement: &str,
    max_pattern_len: usize,
) -> Result<TransformResult, EngineError> {
    let re = compile_caller_pattern(pattern, max_pattern_len)?;
    let matches = re.find_iter(content).count();
    let output = re
        .replace_all(content, regex::NoExpand(replacement))
        .into_owned();
    Ok(TransformResult::new(content, output).with_meta("matches_replaced", json!(matches)))
}

fn unmasked(content: &str) -> TransformResult {
    TransformResult::new(content, content.to_string()).with_meta("masked", json!(false))
}

/// Shared digit masker: non-digits pass through, digits are masked except
/// the trailing four. Below `min_digits` the input is returned unchanged.
fn mask_digits_keep_suffix(
    content: &str,
    mask_char: char,
    min_digits: usize,
    extra: serde_json::Map<String, serde_json::Value>,
) -> TransformResult {
    let total_digits = content.chars().filter(|c| c.is_ascii_digit()).count();
    if total_digits < min_digits {
        let mut result = unmasked(content);
        result.metadata.extend(extra);
        return result;
    }

    let visible_from = total_digits.saturating_sub(VISIBLE_SUFFIX_DIGITS);
    let mut seen = 0usize;
    let output: String = content
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= visible_from {
                    mask_char
                } else {
                    c
                }
            } else {
                c
            }
        })
        .collect();

    let mut result = TransformResult::new(content, output).with_meta("masked", json!(true));
    result.metadata.extend(extra);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_mask_preserves_first_char_domain_and_length() {
        let result = mask_email("john.doe@example.com", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "j*******@example.com");
        assert_eq!(result.output.len(), "john.doe@example.com".len());
    }

    #[test]
    fn short_local_part_is_left_unchanged() {
        let result = mask_email("a@example.com", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "a@example.com");
        assert_eq!(result.metadata["masked"], false);
    }

    #[test]
    fn non_email_is_left_unchanged() {
        assert_eq!(mask_email("not an email", DEFAULT_MASK_CHAR).output, "not an email");
    }

    #[test]
    fn phone_mask_keeps_separators_and_last_four() {
        let result = mask_phone("(555) 123-4567", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "(***) ***-4567");
    }

    #[test]
    fn short_phone_is_left_unchanged() {
        let result = mask_phone("555-1234", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "555-1234");
        assert_eq!(result.metadata["masked"], false);
    }

    #[test]
    fn credit_card_mask_reports_luhn_diagnostics() {
        let result = mask_credit_card("4111-1111-1111-1111", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "****-****-****-1111");
        assert_eq!(result.metadata["luhn_valid"], true);

        let invalid = mask_credit_card("1234-5678-9012-3456", DEFAULT_MASK_CHAR);
        assert_eq!(invalid.output, "****-****-****-3456");
        assert_eq!(invalid.metadata["luhn_valid"], false);
    }

    #[test]
    fn ssn_mask_keeps_shape() {
        let result = mask_ssn("123-45-6789", DEFAULT_MASK_CHAR);
        assert_eq!(result.output, "***-**-6789");
        assert_eq!(result.metadata["well_formed"], true);
    }

    #[test]
    fn custom_mask_applies_caller_rule_literally() {
        let result = mask_custom("id-1234 id-5678", r"id-\d+", "id-[hidden]", 500).unwrap();
        assert_eq!(result.output, "id-[hidden] id-[hidden]");
        assert_eq!(result.metadata["matches_replaced"], 2);
    }

    #[test]
    fn custom_mask_rejects_invalid_pattern() {
        let err = mask_custom("x", "(oops", "y", 500).unwrap_err();
        assert!(matches!(err, EngineError::PatternCompilationError(_, _)));
    }

    #[test]
    fn alternate_mask_char_is_honored() {
        let result = mask_phone("555-123-4567", '#');
        assert_eq!(result.output, "###-###-4567");
    }
}
