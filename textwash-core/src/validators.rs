//! validators.rs - Format-correctness checks for untrusted strings.
//!
//! Every validator returns a [`ValidationResult`]: `valid` plus derived
//! attributes on success. Invalid input is a normal, representable outcome,
//! never a Rust error; the functions in this module do not fail.
//!
//! The module also keeps programmatic checks (Luhn, SSN structure) that go
//! beyond what the regular expressions can express. These reduce false
//! positives and feed diagnostic metadata elsewhere in the engine.
//!
//! License: MIT OR APACHE 2.0

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::patterns::PatternLibrary;

/// Minimum digits a phone number must carry to count as valid.
const PHONE_MIN_DIGITS: usize = 7;

/// Minimum length of a well-formed CSRF token.
const CSRF_TOKEN_MIN_LENGTH: usize = 16;

/// Outcome of a validation operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// A canonical form of the input, when one exists (e.g. lowercased
    /// email, digits-and-plus phone number).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    /// Attributes derived from the input (e.g. email domain, URL scheme).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ValidationResult {
    fn invalid() -> Self {
        Self::default()
    }

    fn invalid_with_error(message: String) -> Self {
        let mut result = Self::default();
        result.attributes.insert("error".to_string(), message);
        result
    }

    fn valid() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    fn attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// Validates an email address and derives its domain.
pub fn validate_email(content: &str) -> ValidationResult {
    if !PatternLibrary::global().email.is_match(content) {
        return ValidationResult::invalid();
    }

    let mut result = ValidationResult::valid();
    result.normalized = Some(content.to_lowercase());
    if let Some((_, domain)) = content.rsplit_once('@') {
        result = result.attribute("domain", domain.to_lowercase());
    }
    result
}

/// Validates a scheme-qualified URL and decomposes it.
pub fn validate_url(content: &str) -> ValidationResult {
    if !PatternLibrary::global().url.is_match(content) {
        return ValidationResult::invalid();
    }

    let Ok(parsed) = url::Url::parse(content) else {
        return ValidationResult::invalid();
    };

    let mut result = ValidationResult::valid()
        .attribute("scheme", parsed.scheme())
        .attribute("path", parsed.path());
    if let Some(host) = parsed.host_str() {
        result = result.attribute("host", host);
    }
    if let Some(query) = parsed.query() {
        result = result.attribute("query", query);
    }
    result.normalized = Some(parsed.to_string());
    result
}

/// Validates a phone number loosely (8-20 chars of digits and separators)
/// and normalizes it to digits plus an optional leading `+`.
pub fn validate_phone(content: &str) -> ValidationResult {
    let digits = content.chars().filter(char::is_ascii_digit).count();
    if !PatternLibrary::global().phone.is_match(content) || digits < PHONE_MIN_DIGITS {
        return ValidationResult::invalid();
    }

    let mut normalized: String = content
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if content.starts_with('+') {
        normalized.insert(0, '+');
    }

    let mut result = ValidationResult::valid().attribute("digits", digits.to_string());
    result.normalized = Some(normalized);
    result
}

/// Validates a dotted-quad IPv4 address.
pub fn validate_ip(content: &str) -> ValidationResult {
    if !PatternLibrary::global().ipv4.is_match(content) {
        return ValidationResult::invalid();
    }
    let mut result = ValidationResult::valid().attribute("version", "4");
    result.normalized = Some(content.to_string());
    result
}

/// Validates a DNS domain name and derives its top-level label.
pub fn validate_domain(content: &str) -> ValidationResult {
    if !PatternLibrary::global().domain.is_match(content) {
        return ValidationResult::invalid();
    }

    let mut result = ValidationResult::valid();
    if let Some((_, tld)) = content.rsplit_once('.') {
        result = result.attribute("tld", tld.to_lowercase());
    }
    result.normalized = Some(content.to_lowercase());
    result
}

/// Checks a filename's extension against a caller-supplied allow-list.
///
/// The derived content type is a best-effort guess for diagnostics only; it
/// is based on the extension, not the file contents, and must not be treated
/// as security-authoritative.
pub fn validate_file_type(filename: &str, allowed_types: &[String]) -> ValidationResult {
    let Some((stem, extension)) = filename.rsplit_once('.') else {
        return ValidationResult::invalid_with_error("filename has no extension".to_string());
    };
    if stem.is_empty() || extension.is_empty() {
        return ValidationResult::invalid_with_error("filename has no extension".to_string());
    }

    let extension = extension.to_lowercase();
    let allowed = allowed_types
        .iter()
        .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&extension));

    let mut result = if allowed {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid()
    };
    result = result
        .attribute("extension", extension.clone())
        .attribute("content_type", guess_content_type(&extension));
    result
}

fn guess_content_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Checks that the content parses as JSON. Parse failure is reported in the
/// attributes, never raised.
pub fn validate_json(content: &str) -> ValidationResult {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) => {
            let parsed_type = match value {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "boolean",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Array(_) => "array",
                serde_json::Value::Object(_) => "object",
            };
            ValidationResult::valid().attribute("parsed_type", parsed_type)
        }
        Err(e) => ValidationResult::invalid_with_error(e.to_string()),
    }
}

/// Checks that the content is well-formed XML. Parse failure is reported in
/// the attributes, never raised.
pub fn validate_xml(content: &str) -> ValidationResult {
    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().check_end_names = true;

    let mut saw_element = false;
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(quick_xml::events::Event::Start(_)) | Ok(quick_xml::events::Event::Empty(_)) => {
                saw_element = true;
            }
            Ok(_) => {}
            Err(e) => return ValidationResult::invalid_with_error(e.to_string()),
        }
    }

    if !saw_element {
        return ValidationResult::invalid_with_error("document has no root element".to_string());
    }
    ValidationResult::valid().attribute("parsed_type", "xml")
}

/// Validates a CSRF token against the expected session token.
///
/// The token must be well-formed (URL-safe charset, at least 16 chars) and
/// equal to `expected`. Equality is checked over SHA-256 digests so the
/// comparison time does not depend on where the strings diverge.
pub fn validate_csrf_token(token: &str, expected: &str) -> ValidationResult {
    if token.len() < CSRF_TOKEN_MIN_LENGTH || !PatternLibrary::global().csrf_token.is_match(token) {
        return ValidationResult::invalid();
    }

    let token_digest = hex::encode(Sha256::digest(token.as_bytes()));
    let expected_digest = hex::encode(Sha256::digest(expected.as_bytes()));
    if token_digest.eq_ignore_ascii_case(&expected_digest) {
        ValidationResult::valid().attribute("token_length", token.len().to_string())
    } else {
        ValidationResult::invalid()
    }
}

/// Validates a number using the Luhn algorithm.
///
/// The Luhn algorithm, also known as the Mod 10 algorithm, is a simple
/// checksum formula used to validate identification numbers such as credit
/// card numbers.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Applies the Luhn check to a credit card number after stripping separators.
pub fn is_valid_credit_card_digits(cc_number: &str) -> bool {
    let digits: String = cc_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    is_valid_luhn(&digits)
}

/// Structural SSN check based on US Social Security Administration rules.
///
/// Expects the format "XXX-XX-XXXX" and rejects known invalid area, group,
/// and serial components.
pub fn is_valid_ssn_structure(ssn: &str) -> bool {
    let mut parts = ssn.split('-');
    let (Some(area), Some(group), Some(serial), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }

    let Some(area_num) = area.parse::<u16>().ok() else {
        return false;
    };
    let Some(group_num) = group.parse::<u8>().ok() else {
        return false;
    };
    let Some(serial_num) = serial.parse::<u16>().ok() else {
        return false;
    };

    let invalid_area = (area_num == 0) || (area_num == 666) || (area_num >= 900);
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}
