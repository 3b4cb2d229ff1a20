//! encoders.rs - Encoding, normalization, and whitespace utilities.
//!
//! License: MIT OR Apache-2.0

use base64::Engine as _;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::json;
use unicode_normalization::UnicodeNormalization;

use crate::errors::EngineError;
use crate::transformers::TransformResult;

/// Percent-encodes every non-alphanumeric byte.
pub fn url_encode(content: &str) -> TransformResult {
    let output = utf8_percent_encode(content, NON_ALPHANUMERIC).to_string();
    TransformResult::new(content, output)
}

/// Decodes percent-encoded sequences. Malformed sequences pass through
/// unchanged; invalid UTF-8 is replaced rather than raised.
pub fn url_decode(content: &str) -> TransformResult {
    let output = percent_decode_str(content).decode_utf8_lossy().into_owned();
    TransformResult::new(content, output)
}

/// Encodes the content as standard Base64.
pub fn base64_encode(content: &str) -> TransformResult {
    let output = base64::engine::general_purpose::STANDARD.encode(content.as_bytes());
    TransformResult::new(content, output)
}

/// Decodes standard Base64.
///
/// Malformed input (or decoded bytes that are not valid UTF-8) returns the
/// original input unchanged; callers detect failure by comparing output to
/// input. The `decoded` metadata flag carries the same signal explicitly.
pub fn base64_decode(content: &str) -> TransformResult {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(content.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match decoded {
        Some(output) => TransformResult::new(content, output).with_meta("decoded", json!(true)),
        None => {
            TransformResult::new(content, content.to_string()).with_meta("decoded", json!(false))
        }
    }
}

/// Applies the requested Unicode normalization form (NFC, NFD, NFKC, NFKD).
pub fn normalize_unicode(content: &str, form: &str) -> Result<TransformResult, EngineError> {
    let output = match form.to_uppercase().as_str() {
        "NFC" => content.nfc().collect::<String>(),
        "NFD" => content.nfd().collect::<String>(),
        "NFKC" => content.nfkc().collect::<String>(),
        "NFKD" => content.nfkd().collect::<String>(),
        other => {
            return Err(EngineError::InvalidParameter {
                parameter: "form",
                reason: format!("unsupported normalization form '{other}'"),
            })
        }
    };
    Ok(TransformResult::new(content, output).with_meta("form", json!(form.to_uppercase())))
}

/// Collapses runs of whitespace to a single space and trims both ends.
pub fn clean_whitespace(content: &str) -> TransformResult {
    let output = content.split_whitespace().collect::<Vec<_>>().join(" ");
    TransformResult::new(content, output)
}

/// Retains only word characters, whitespace, and a small punctuation set
/// (`. , ! ? ; : ' " ( ) - _`).
pub fn extract_safe_text(content: &str) -> TransformResult {
    let output: String = content
        .chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | '(' | ')' | '-' | '_')
        })
        .collect();
    TransformResult::new(content, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encoding_round_trips() {
        let inputs = ["hello world", "a=1&b=2?c#d", "naïve café", "100% sure"];
        for input in inputs {
            let encoded = url_encode(input).output;
            assert_eq!(url_decode(&encoded).output, input, "input {input:?}");
        }
    }

    #[test]
    fn url_encode_is_ascii_only() {
        let encoded = url_encode("père noël").output;
        assert!(encoded.is_ascii());
        assert!(encoded.contains("%20"));
    }

    #[test]
    fn base64_round_trips() {
        let inputs = ["hello", "", "binary-ish \u{1F600} content"];
        for input in inputs {
            let encoded = base64_encode(input).output;
            let decoded = base64_decode(&encoded);
            assert_eq!(decoded.output, input);
            assert_eq!(decoded.metadata["decoded"], true);
        }
    }

    #[test]
    fn malformed_base64_returns_input_unchanged() {
        let result = base64_decode("!!! not base64 !!!");
        assert_eq!(result.output, "!!! not base64 !!!");
        assert_eq!(result.metadata["decoded"], false);
    }

    #[test]
    fn unicode_normalization_forms() {
        // "é" as combining sequence vs. precomposed.
        let decomposed = "e\u{0301}";
        let precomposed = "\u{00e9}";
        assert_eq!(normalize_unicode(decomposed, "NFC").unwrap().output, precomposed);
        assert_eq!(normalize_unicode(precomposed, "nfd").unwrap().output, decomposed);
        // Compatibility form folds the ligature.
        assert_eq!(normalize_unicode("ﬁle", "NFKC").unwrap().output, "file");
    }

    #[test]
    fn unknown_normalization_form_is_rejected() {
        let err = normalize_unicode("x", "NFX").unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { parameter: "form", .. }));
    }

    #[test]
    fn clean_whitespace_is_idempotent() {
        let input = "  a\t\tb \n c  ";
        let once = clean_whitespace(input).output;
        assert_eq!(once, "a b c");
        assert_eq!(clean_whitespace(&once).output, once);
    }

    #[test]
    fn extract_safe_text_drops_markup_characters() {
        let result = extract_safe_text("safe text! <script>alert('x')</script> 100%");
        assert!(!result.output.contains('<'));
        assert!(!result.output.contains('%'));
        assert!(result.output.contains("safe text!"));
        assert!(result.output.contains("alert('x')"));
    }
}
