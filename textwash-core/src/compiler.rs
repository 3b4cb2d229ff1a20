//! compiler.rs - Cached compilation of caller-supplied patterns.
//!
//! `mask_custom`, policy patterns, and per-call profanity word lists all
//! carry regex sources chosen by the caller. This module compiles them
//! through a thread-safe, process-wide cache so repeated calls with the same
//! pattern never pay the compilation cost twice.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::errors::EngineError;
use crate::patterns::REGEX_SIZE_LIMIT;

lazy_static! {
    /// A thread-safe, global cache for compiled caller patterns.
    /// The key is a hash of the pattern source.
    static ref COMPILED_PATTERN_CACHE: RwLock<HashMap<u64, Arc<Regex>>> =
        RwLock::new(HashMap::new());
}

fn hash_source(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a pattern, serving repeated sources from the cache.
pub fn compile_cached(source: &str) -> Result<Arc<Regex>, EngineError> {
    let cache_key = hash_source(source);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_PATTERN_CACHE.read().unwrap();
        if let Some(regex) = cache.get(&cache_key) {
            debug!("Serving compiled pattern from cache for key: {cache_key}");
            return Ok(Arc::clone(regex));
        }
    } // Read lock is released here.

    let compiled = RegexBuilder::new(source)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| EngineError::PatternCompilationError(source.to_string(), e))?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_PATTERN_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Compiled and cached pattern for key: {cache_key}");
    Ok(compiled_arc)
}

/// Compiles a raw caller-supplied pattern, applying the configured length cap
/// before compilation.
pub fn compile_caller_pattern(source: &str, max_len: usize) -> Result<Arc<Regex>, EngineError> {
    if source.len() > max_len {
        return Err(EngineError::PatternLengthExceeded(source.len(), max_len));
    }
    compile_cached(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_the_same_instance() {
        let a = compile_cached(r"cache-test-\d+").unwrap();
        let b = compile_cached(r"cache-test-\d+").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn oversized_pattern_is_rejected_before_compilation() {
        let source = "a".repeat(40);
        let err = compile_caller_pattern(&source, 20).unwrap_err();
        assert!(matches!(err, EngineError::PatternLengthExceeded(40, 20)));
    }

    #[test]
    fn invalid_pattern_reports_a_compilation_error() {
        let err = compile_caller_pattern("(unclosed", 500).unwrap_err();
        assert!(matches!(err, EngineError::PatternCompilationError(_, _)));
    }
}
