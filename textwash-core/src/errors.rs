//! errors.rs - Custom error types for the textwash-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `textwash-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Operation '{operation}' is missing required parameter '{parameter}'")]
    MissingParameter {
        operation: &'static str,
        parameter: &'static str,
    },

    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("Content length ({0}) exceeds the configured maximum ({1})")]
    ContentLengthExceeded(usize, usize),

    #[error("Batch size ({0}) exceeds the configured maximum ({1})")]
    BatchSizeExceeded(usize, usize),

    #[error("Pattern length ({0}) exceeds maximum allowed ({1})")]
    PatternLengthExceeded(usize, usize),

    #[error("Failed to compile pattern '{0}': {1}")]
    PatternCompilationError(String, regex::Error),

    #[error("Malformed policy object: {0}")]
    MalformedPolicy(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
