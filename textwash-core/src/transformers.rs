//! transformers.rs - Content transformers: HTML/XML cleanup, security
//! filters, and filename sanitization.
//!
//! Every transformer is a pure function of `(content, parameters)` returning
//! a [`TransformResult`]. HTML and XML handling here is best-effort pattern
//! stripping, not a conformant parser: nested or malformed markup may not be
//! fully neutralized, and callers with a strict security boundary must not
//! treat these transforms as their sole defense.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::patterns::PatternLibrary;

/// Upper bound on removal/normalization passes in
/// [`prevent_path_traversal`]; removal shrinks the input, so the bound is
/// never reached in practice.
const MAX_TRAVERSAL_PASSES: usize = 8;

/// Longest filename, in bytes, that [`sanitize_filename`] will emit.
const FILENAME_MAX_BYTES: usize = 255;

/// Longest extension preserved when a filename must be truncated.
const FILENAME_MAX_EXTENSION_BYTES: usize = 16;

/// Outcome of a transform operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub output: String,
    /// Character count of the input.
    pub original_length: usize,
    /// Character count of the output.
    pub final_length: usize,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
}

impl TransformResult {
    pub fn new(original: &str, output: String) -> Self {
        Self {
            original_length: original.chars().count(),
            final_length: output.chars().count(),
            output,
            metadata: serde_json::Map::new(),
        }
    }

    pub(crate) fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Escapes the five HTML-significant characters as entities.
///
/// Escaping twice is well-defined (the `&` of an entity is escaped again);
/// it is not a no-op.
pub fn escape_html(content: &str) -> TransformResult {
    TransformResult::new(content, escape_html_str(content))
}

pub(crate) fn escape_html_str(content: &str) -> String {
    // `&` first, or freshly inserted entities would be double-escaped.
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Converts the five named/numeric entities back to characters.
///
/// The inverse of [`escape_html`] for inputs without pre-existing entities:
/// `unescape_html(escape_html(s)) == s`.
pub fn unescape_html(content: &str) -> TransformResult {
    // `&amp;` last, or "&amp;lt;" would collapse twice.
    let output = content
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    TransformResult::new(content, output)
}

/// Removes every `<...>` tag. No attribute-level filtering is performed.
pub fn strip_html(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let output = patterns.html_tag.replace_all(content, "").into_owned();
    TransformResult::new(content, output)
}

/// Sanitizes HTML: script blocks, event-handler attributes, and
/// `javascript:` schemes are removed, then (when an allow-list is given)
/// every tag not on the list is stripped, keeping its inner text.
///
/// The order is deliberate: script and attribute removal run before tag
/// filtering, otherwise a disallowed tag could smuggle a handler through
/// the filter.
pub fn sanitize_html(content: &str, allowed_tags: Option<&[String]>) -> TransformResult {
    let patterns = PatternLibrary::global();
    let mut current = content.to_string();
    let mut removed = 0usize;

    for (name, re) in patterns.xss() {
        if !matches!(
            *name,
            "script_block" | "script_tag" | "event_handler" | "javascript_scheme"
        ) {
            continue;
        }
        let matches = re.find_iter(&current).count();
        if matches > 0 {
            removed += matches;
            current = re.replace_all(&current, "").into_owned();
        }
    }

    let filtered = if let Some(allowed) = allowed_tags {
        let allow: std::collections::HashSet<String> =
            allowed.iter().map(|t| t.to_lowercase()).collect();
        patterns
            .html_named_tag
            .replace_all(&current, |caps: &regex::Captures<'_>| {
                if allow.contains(&caps[1].to_lowercase()) {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    } else {
        current
    };

    debug!("sanitize_html removed {removed} scripted construct(s).");
    TransformResult::new(content, filtered)
        .with_meta("scripted_constructs_removed", json!(removed))
        .with_meta("tag_filter_applied", json!(allowed_tags.is_some()))
}

/// Removes CDATA sections, processing instructions, and comments.
pub fn sanitize_xml(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let output = patterns.xml_cdata.replace_all(content, "");
    let output = patterns.xml_processing.replace_all(&output, "");
    let output = patterns.html_comment.replace_all(&output, "").into_owned();
    TransformResult::new(content, output)
}

/// Removes every XSS pattern match, then HTML-escapes the remainder.
///
/// Apply this as the last step before rendering: escaping first would hide
/// vectors inside escaped text where the pattern pass cannot see them.
pub fn prevent_xss(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let mut current = content.to_string();
    let mut removed_names: Vec<&str> = Vec::new();
    let mut total = 0usize;

    for (name, re) in patterns.xss() {
        let matches = re.find_iter(&current).count();
        if matches > 0 {
            total += matches;
            removed_names.push(*name);
            current = re.replace_all(&current, "").into_owned();
        }
    }

    let output = escape_html_str(&current);
    debug!("prevent_xss removed {total} match(es) across {} pattern(s).", removed_names.len());
    TransformResult::new(content, output)
        .with_meta("patterns_matched", json!(removed_names))
        .with_meta("matches_removed", json!(total))
}

/// Removes SQL keyword/operator patterns, then doubles every single quote.
///
/// This is a defense-in-depth filter for content that must pass near a SQL
/// boundary. It is not a substitute for parameterized queries.
pub fn prevent_sql_injection(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let mut current = content.to_string();
    let mut removed_names: Vec<&str> = Vec::new();
    let mut total = 0usize;

    for (name, re) in patterns.sql_injection() {
        let matches = re.find_iter(&current).count();
        if matches > 0 {
            total += matches;
            removed_names.push(*name);
            current = re.replace_all(&current, "").into_owned();
        }
    }

    let output = current.replace('\'', "''");
    TransformResult::new(content, output)
        .with_meta("patterns_matched", json!(removed_names))
        .with_meta("matches_removed", json!(total))
}

/// Removes path-traversal sequences and lexically normalizes the result,
/// looping both steps to a fixpoint.
///
/// Normalization can resurface a sequence that was split across two removed
/// fragments, so the removal pass re-runs after every normalization until
/// nothing changes. Any removal at all is surfaced as
/// `traversal_detected: true` in the metadata; callers with a strict
/// boundary should reject on that flag rather than use the rewritten path.
pub fn prevent_path_traversal(content: &str) -> TransformResult {
    let patterns = PatternLibrary::global();
    let mut current = content.to_string();
    let mut detected = false;

    for _ in 0..MAX_TRAVERSAL_PASSES {
        let mut changed = false;

        for (_, re) in patterns.path_traversal() {
            if re.is_match(&current) {
                detected = true;
                changed = true;
                current = re.replace_all(&current, "").into_owned();
            }
        }

        let normalized = normalize_path_lexically(&current);
        if normalized != current {
            current = normalized;
            changed = true;
        }

        if !changed {
            break;
        }
    }

    if detected {
        debug!("prevent_path_traversal removed traversal sequence(s).");
    }
    TransformResult::new(content, current).with_meta("traversal_detected", json!(detected))
}

/// Lexical `/`-path normalization: collapses duplicate separators, drops
/// `.` segments, and resolves `..` against preceding segments without ever
/// climbing above the root.
fn normalize_path_lexically(path: &str) -> String {
    if !path.contains('/') {
        return path.to_string();
    }

    let had_root = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = String::new();
    if had_root {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    out
}

/// Rewrites a filename so it is safe for any common filesystem: path
/// separators and reserved characters become `_`, control characters are
/// dropped, and the result is truncated to 255 bytes preserving the
/// extension where possible.
pub fn sanitize_filename(content: &str) -> TransformResult {
    let mut replaced = 0usize;
    let cleaned: String = content
        .chars()
        .filter_map(|c| {
            if matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*') {
                replaced += 1;
                Some('_')
            } else if c.is_control() {
                None
            } else {
                Some(c)
            }
        })
        .collect();

    let truncated = cleaned.len() > FILENAME_MAX_BYTES;
    let output = if truncated {
        truncate_filename(&cleaned)
    } else {
        cleaned
    };

    TransformResult::new(content, output)
        .with_meta("characters_replaced", json!(replaced))
        .with_meta("truncated", json!(truncated))
}

fn truncate_filename(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.len() <= FILENAME_MAX_EXTENSION_BYTES =>
        {
            let budget = FILENAME_MAX_BYTES - ext.len() - 1;
            format!("{}.{}", truncate_at_char_boundary(stem, budget), ext)
        }
        _ => truncate_at_char_boundary(name, FILENAME_MAX_BYTES).to_string(),
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
