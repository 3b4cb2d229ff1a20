//! patterns.rs - The pattern library: every compiled matcher used by the engine.
//!
//! The library is built once on first use and is read-only afterwards, so it
//! is safe to share across any number of threads without coordination. It
//! holds three groups of matchers:
//!
//! * anchored validation patterns (email, URL, phone, IPv4, domain, token),
//! * unanchored sensitive-data detectors (SSN, credit card, 10-digit phone),
//! * the threat catalogue (XSS, SQL injection, path traversal) plus the
//!   HTML/XML structure matchers used by the transformers.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::errors::EngineError;

/// Broad classification of the attack technique a threat pattern targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatCategory {
    /// Cross-site scripting vectors aimed at HTML rendering sinks.
    Xss,
    /// SQL keywords, tautologies, comment markers, and statement plumbing.
    SqlInjection,
    /// Directory escape sequences, literal or percent-encoded.
    PathTraversal,
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xss => write!(f, "xss"),
            Self::SqlInjection => write!(f, "sql_injection"),
            Self::PathTraversal => write!(f, "path_traversal"),
        }
    }
}

/// A single named detection pattern.
pub struct ThreatPattern {
    /// Short snake_case identifier used in logs and result metadata.
    pub name: &'static str,
    /// The family of technique this pattern belongs to.
    pub category: ThreatCategory,
    /// The regex source, compiled once into the global [`PatternLibrary`].
    pub pattern: &'static str,
}

/// The built-in threat catalogue.
///
/// Kept as a static slice so the sources are available at zero runtime cost
/// until the library compiles them.
pub static THREAT_PATTERNS: &[ThreatPattern] = &[
    // ---- Cross-site scripting ------------------------------------------
    ThreatPattern {
        name: "script_block",
        category: ThreatCategory::Xss,
        pattern: r"(?is)<script\b[^>]*>.*?</script\s*>",
    },
    ThreatPattern {
        name: "script_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)</?script\b[^>]*>",
    },
    ThreatPattern {
        name: "event_handler",
        category: ThreatCategory::Xss,
        pattern: r#"(?i)\bon[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#,
    },
    ThreatPattern {
        name: "javascript_scheme",
        category: ThreatCategory::Xss,
        pattern: r"(?i)javascript\s*:",
    },
    ThreatPattern {
        name: "iframe_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)</?iframe\b[^>]*>",
    },
    ThreatPattern {
        name: "object_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)</?object\b[^>]*>",
    },
    ThreatPattern {
        name: "embed_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)</?embed\b[^>]*>",
    },
    ThreatPattern {
        name: "link_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)<link\b[^>]*>",
    },
    ThreatPattern {
        name: "meta_tag",
        category: ThreatCategory::Xss,
        pattern: r"(?i)<meta\b[^>]*>",
    },
    // ---- SQL injection --------------------------------------------------
    ThreatPattern {
        name: "sql_keyword",
        category: ThreatCategory::SqlInjection,
        pattern: r"(?i)\b(?:select|insert|update|delete|drop|create|alter|truncate|exec|execute|declare|grant|revoke)\b",
    },
    ThreatPattern {
        name: "sql_union_select",
        category: ThreatCategory::SqlInjection,
        pattern: r"(?i)\bunion\s+(?:all\s+)?select\b",
    },
    ThreatPattern {
        name: "sql_tautology",
        category: ThreatCategory::SqlInjection,
        pattern: r#"(?i)\b(?:or|and)\s+(?:\d+\s*=\s*\d+|'[^']*'\s*=\s*'[^']*'|"[^"]*"\s*=\s*"[^"]*")"#,
    },
    ThreatPattern {
        name: "sql_comment",
        category: ThreatCategory::SqlInjection,
        pattern: r"(?:--|/\*|\*/|#)",
    },
    ThreatPattern {
        name: "sql_separator",
        category: ThreatCategory::SqlInjection,
        pattern: r";",
    },
    // ---- Path traversal --------------------------------------------------
    ThreatPattern {
        name: "dotdot_slash",
        category: ThreatCategory::PathTraversal,
        pattern: r"\.\.[/\\]",
    },
    ThreatPattern {
        name: "dotdot_encoded_slash",
        category: ThreatCategory::PathTraversal,
        pattern: r"(?i)\.\.(?:%2f|%5c)",
    },
    ThreatPattern {
        name: "encoded_dotdot_slash",
        category: ThreatCategory::PathTraversal,
        pattern: r"(?i)%2e%2e[/\\]",
    },
    ThreatPattern {
        name: "encoded_dotdot_encoded_slash",
        category: ThreatCategory::PathTraversal,
        pattern: r"(?i)%2e%2e(?:%2f|%5c)",
    },
    ThreatPattern {
        name: "double_encoded_dotdot",
        category: ThreatCategory::PathTraversal,
        pattern: r"(?i)%252e%252e(?:%252f|%255c|[/\\])",
    },
    ThreatPattern {
        name: "mixed_encoded_dot",
        category: ThreatCategory::PathTraversal,
        pattern: r"(?i)(?:\.%2e|%2e\.)(?:[/\\]|%2f|%5c)",
    },
];

// Validation patterns are anchored: validators full-match their input.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
const URL_PATTERN: &str = r"^(?:https?|ftp)://[^\s/$.?#][^\s]*$";
// Loose by design: 8-20 chars of digits and common separators. The validator
// additionally requires a minimum digit count, since the regex crate has no
// lookahead to express it here.
const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 ().\-]{6,18}[0-9]$";
const IPV4_PATTERN: &str =
    r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])$";
const DOMAIN_PATTERN: &str = r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$";
const CSRF_TOKEN_PATTERN: &str = r"^[A-Za-z0-9._=\-]{16,}$";

// Sensitive-data detectors are unanchored: filters search inside free text.
const SSN_PATTERN: &str = r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b";
const CREDIT_CARD_PATTERN: &str = r"\b[0-9]{4}[ \-]?[0-9]{4}[ \-]?[0-9]{4}[ \-]?[0-9]{1,7}\b";
const US_PHONE_PATTERN: &str = r"\b\(?[0-9]{3}\)?[ .\-]?[0-9]{3}[ .\-]?[0-9]{4}\b";

// HTML/XML structure matchers used by the transformers.
const HTML_TAG_PATTERN: &str = r"(?s)<[^>]*>";
const HTML_NAMED_TAG_PATTERN: &str = r"(?s)</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>";
const HTML_COMMENT_PATTERN: &str = r"(?s)<!--.*?-->";
const XML_CDATA_PATTERN: &str = r"(?s)<!\[CDATA\[.*?\]\]>";
const XML_PROCESSING_PATTERN: &str = r"(?s)<\?.*?\?>";

/// 10 MB limit for any compiled regex, matching the cap used for
/// caller-supplied patterns.
pub(crate) const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// The compiled pattern library shared by every component.
#[derive(Debug)]
pub struct PatternLibrary {
    pub email: Regex,
    pub url: Regex,
    pub phone: Regex,
    pub ipv4: Regex,
    pub domain: Regex,
    pub csrf_token: Regex,
    pub ssn: Regex,
    pub credit_card: Regex,
    pub us_phone: Regex,
    pub html_tag: Regex,
    pub html_named_tag: Regex,
    pub html_comment: Regex,
    pub xml_cdata: Regex,
    pub xml_processing: Regex,
    xss: Vec<(&'static str, Regex)>,
    sql_injection: Vec<(&'static str, Regex)>,
    path_traversal: Vec<(&'static str, Regex)>,
}

fn build(name: &'static str, pattern: &str) -> Result<Regex, EngineError> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| EngineError::PatternCompilationError(name.to_string(), e))
}

impl PatternLibrary {
    /// Compiles every built-in matcher.
    ///
    /// This is the low-level constructor; almost all callers want the shared
    /// [`PatternLibrary::global`] instance instead.
    pub fn compile() -> Result<Self, EngineError> {
        debug!("Compiling pattern library ({} threat patterns).", THREAT_PATTERNS.len());

        let mut xss = Vec::new();
        let mut sql_injection = Vec::new();
        let mut path_traversal = Vec::new();
        for entry in THREAT_PATTERNS {
            let compiled = build(entry.name, entry.pattern)?;
            match entry.category {
                ThreatCategory::Xss => xss.push((entry.name, compiled)),
                ThreatCategory::SqlInjection => sql_injection.push((entry.name, compiled)),
                ThreatCategory::PathTraversal => path_traversal.push((entry.name, compiled)),
            }
        }

        Ok(Self {
            email: build("email", EMAIL_PATTERN)?,
            url: build("url", URL_PATTERN)?,
            phone: build("phone", PHONE_PATTERN)?,
            ipv4: build("ipv4", IPV4_PATTERN)?,
            domain: build("domain", DOMAIN_PATTERN)?,
            csrf_token: build("csrf_token", CSRF_TOKEN_PATTERN)?,
            ssn: build("ssn", SSN_PATTERN)?,
            credit_card: build("credit_card", CREDIT_CARD_PATTERN)?,
            us_phone: build("us_phone", US_PHONE_PATTERN)?,
            html_tag: build("html_tag", HTML_TAG_PATTERN)?,
            html_named_tag: build("html_named_tag", HTML_NAMED_TAG_PATTERN)?,
            html_comment: build("html_comment", HTML_COMMENT_PATTERN)?,
            xml_cdata: build("xml_cdata", XML_CDATA_PATTERN)?,
            xml_processing: build("xml_processing", XML_PROCESSING_PATTERN)?,
            xss,
            sql_injection,
            path_traversal,
        })
    }

    /// Returns the shared, process-wide library.
    pub fn global() -> &'static Self {
        &GLOBAL_PATTERNS
    }

    /// The compiled XSS vectors, in catalogue order.
    pub fn xss(&self) -> &[(&'static str, Regex)] {
        &self.xss
    }

    /// The compiled SQL-injection vectors, in catalogue order.
    pub fn sql_injection(&self) -> &[(&'static str, Regex)] {
        &self.sql_injection
    }

    /// The compiled path-traversal vectors, in catalogue order.
    pub fn path_traversal(&self) -> &[(&'static str, Regex)] {
        &self.path_traversal
    }
}

lazy_static! {
    // The sources above are covered by the catalogue compile test, so a
    // failure here means a build of the library itself is broken.
    static ref GLOBAL_PATTERNS: PatternLibrary =
        PatternLibrary::compile().expect("built-in patterns must compile");
}
