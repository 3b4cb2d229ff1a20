//! operation.rs - The closed catalogue of engine operations.
//!
//! [`OperationKind`] enumerates every operation the dispatcher can serve.
//! Dispatch is an exhaustive `match` over this enum, so an operation without
//! a handler (or a handler without an operation) is a compile error rather
//! than a runtime "unknown operation". The string names are a stable,
//! externally visible contract.
//!
//! License: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// Every operation the engine can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    ValidateEmail,
    ValidateUrl,
    ValidatePhone,
    ValidateIp,
    ValidateDomain,
    ValidateFileType,
    ValidateJson,
    ValidateXml,
    SanitizeHtml,
    StripHtml,
    EscapeHtml,
    UnescapeHtml,
    SanitizeXml,
    PreventXss,
    PreventSqlInjection,
    PreventPathTraversal,
    SanitizeFilename,
    ValidateCsrfToken,
    FilterProfanity,
    FilterSensitiveData,
    RemoveMetadata,
    WhitelistChars,
    BlacklistChars,
    MaskEmail,
    MaskPhone,
    MaskCreditCard,
    MaskSsn,
    MaskCustom,
    UrlEncode,
    UrlDecode,
    Base64Encode,
    Base64Decode,
    NormalizeUnicode,
    CleanWhitespace,
    ExtractSafeText,
    BatchSanitize,
    PolicyEnforce,
}

impl OperationKind {
    /// Every catalogue member, in contract order.
    pub const ALL: [OperationKind; 37] = [
        Self::ValidateEmail,
        Self::ValidateUrl,
        Self::ValidatePhone,
        Self::ValidateIp,
        Self::ValidateDomain,
        Self::ValidateFileType,
        Self::ValidateJson,
        Self::ValidateXml,
        Self::SanitizeHtml,
        Self::StripHtml,
        Self::EscapeHtml,
        Self::UnescapeHtml,
        Self::SanitizeXml,
        Self::PreventXss,
        Self::PreventSqlInjection,
        Self::PreventPathTraversal,
        Self::SanitizeFilename,
        Self::ValidateCsrfToken,
        Self::FilterProfanity,
        Self::FilterSensitiveData,
        Self::RemoveMetadata,
        Self::WhitelistChars,
        Self::BlacklistChars,
        Self::MaskEmail,
        Self::MaskPhone,
        Self::MaskCreditCard,
        Self::MaskSsn,
        Self::MaskCustom,
        Self::UrlEncode,
        Self::UrlDecode,
        Self::Base64Encode,
        Self::Base64Decode,
        Self::NormalizeUnicode,
        Self::CleanWhitespace,
        Self::ExtractSafeText,
        Self::BatchSanitize,
        Self::PolicyEnforce,
    ];

    /// The stable wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateEmail => "validate_email",
            Self::ValidateUrl => "validate_url",
            Self::ValidatePhone => "validate_phone",
            Self::ValidateIp => "validate_ip",
            Self::ValidateDomain => "validate_domain",
            Self::ValidateFileType => "validate_file_type",
            Self::ValidateJson => "validate_json",
            Self::ValidateXml => "validate_xml",
            Self::SanitizeHtml => "sanitize_html",
            Self::StripHtml => "strip_html",
            Self::EscapeHtml => "escape_html",
            Self::UnescapeHtml => "unescape_html",
            Self::SanitizeXml => "sanitize_xml",
            Self::PreventXss => "prevent_xss",
            Self::PreventSqlInjection => "prevent_sql_injection",
            Self::PreventPathTraversal => "prevent_path_traversal",
            Self::SanitizeFilename => "sanitize_filename",
            Self::ValidateCsrfToken => "validate_csrf_token",
            Self::FilterProfanity => "filter_profanity",
            Self::FilterSensitiveData => "filter_sensitive_data",
            Self::RemoveMetadata => "remove_metadata",
            Self::WhitelistChars => "whitelist_chars",
            Self::BlacklistChars => "blacklist_chars",
            Self::MaskEmail => "mask_email",
            Self::MaskPhone => "mask_phone",
            Self::MaskCreditCard => "mask_credit_card",
            Self::MaskSsn => "mask_ssn",
            Self::MaskCustom => "mask_custom",
            Self::UrlEncode => "url_encode",
            Self::UrlDecode => "url_decode",
            Self::Base64Encode => "base64_encode",
            Self::Base64Decode => "base64_decode",
            Self::NormalizeUnicode => "normalize_unicode",
            Self::CleanWhitespace => "clean_whitespace",
            Self::ExtractSafeText => "extract_safe_text",
            Self::BatchSanitize => "batch_sanitize",
            Self::PolicyEnforce => "policy_enforce",
        }
    }

    /// The parameters the dispatcher requires before invoking the handler.
    ///
    /// Optional parameters (`allowed_tags`, `replacement`, `mask_char`,
    /// `form`, `words`, `params`) are not listed; handlers fall back to
    /// defaults for those.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::BatchSanitize => &["items", "operation"],
            Self::PolicyEnforce => &["content", "policy"],
            Self::ValidateFileType => &["content", "allowed_types"],
            Self::ValidateCsrfToken => &["content", "expected"],
            Self::WhitelistChars => &["content", "allowed_chars"],
            Self::BlacklistChars => &["content", "forbidden_chars"],
            Self::MaskCustom => &["content", "pattern", "replacement"],
            _ => &["content"],
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EngineError::UnknownOperation(s.to_string()))
    }
}
