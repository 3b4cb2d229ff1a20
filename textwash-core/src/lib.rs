// textwash-core/src/lib.rs
//! # Textwash Core Library
//!
//! `textwash-core` provides the fundamental, platform-independent logic for
//! inspecting, transforming, and judging untrusted text before it is used
//! elsewhere: rendered as HTML, used as a file path, stored, logged, or
//! compared against a policy. It exposes a flat catalogue of operations over
//! a stateless processor, with every result wrapped in a uniform envelope.
//!
//! The library is pure and stateless: every operation is a synchronous,
//! CPU-bound function of its input and parameters, holding no cross-call
//! state. The only long-lived object is the compiled pattern library, built
//! once at first use and read-only afterwards, so callers may execute
//! operations from any number of threads without coordination.
//!
//! ## Modules
//!
//! * `config`: Defines `EngineConfig` (resource limits and the profanity
//!   word list), with embedded defaults and YAML file loading.
//! * `patterns`: The pattern library: every compiled matcher used by the
//!   validators, transformers, and filters.
//! * `compiler`: Cached compilation of caller-supplied patterns.
//! * `operation`: The closed `OperationKind` catalogue.
//! * `envelope`: The uniform result wrapper returned by every dispatch.
//! * `validators`: Format-correctness checks that never fail the call.
//! * `transformers`: HTML/XML cleanup, security filters, and filename
//!   sanitization.
//! * `filters`: Profanity, sensitive-data, metadata, and character-set
//!   filtering.
//! * `maskers`: Shape-preserving masking of sensitive values.
//! * `encoders`: URL/Base64 codecs, Unicode normalization, whitespace
//!   cleanup.
//! * `policy`: Declarative content-policy enforcement.
//! * `batch`: Result types for the order-preserving batch runner.
//! * `processor`: The dispatcher tying everything together.
//! * `errors`: The library's structured error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use serde_json::json;
//! use textwash_core::{execute, Status};
//!
//! let envelope = execute("prevent_xss", &json!({
//!     "content": "<script>alert(1)</script>hello",
//! }));
//!
//! assert_eq!(envelope.status, Status::Success);
//! let result = envelope.result.unwrap();
//! assert!(result["output"].as_str().unwrap().contains("hello"));
//! ```
//!
//! ## Error Handling
//!
//! Request errors (unknown operation, missing parameter, oversized content
//! or pattern, malformed policy) and handler errors are both converted into
//! error envelopes at the dispatcher boundary; no panic propagates to the
//! caller. Validators treat invalid input as a normal outcome
//! (`valid: false`), batch runs record per-item failures without aborting,
//! and policy violations are data, never errors.
//!
//! ## Design Principles
//!
//! * **Closed catalogue:** dispatch is an exhaustive match over
//!   `OperationKind`, so an operation without a handler is a compile error.
//! * **Stateless:** values live for exactly one call.
//! * **Best-effort markup handling:** HTML/XML operations strip patterns;
//!   they are not a conformant parser and are documented as such.
//! * **Bounded:** content length and caller-pattern length are capped
//!   before any matching runs.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod batch;
pub mod compiler;
pub mod config;
pub mod encoders;
pub mod envelope;
pub mod errors;
pub mod filters;
pub mod maskers;
pub mod operation;
pub mod patterns;
pub mod policy;
pub mod processor;
pub mod transformers;
pub mod validators;

/// Re-exports the public configuration types and helpers.
pub use config::{merge_config, EngineConfig, LimitsConfig, ProfanityConfig, MAX_PATTERN_LENGTH};

/// Re-exports the custom error type for clear error reporting.
pub use errors::EngineError;

/// Re-exports the envelope types returned by every dispatch.
pub use envelope::{Envelope, Status};

/// Re-exports the closed operation catalogue.
pub use operation::OperationKind;

/// Re-exports the processor and the one-shot convenience entry point.
pub use processor::{execute, Processor};

/// Re-exports the pattern library and threat catalogue.
pub use patterns::{PatternLibrary, ThreatCategory, ThreatPattern, THREAT_PATTERNS};

/// Re-exports the operation result types.
pub use batch::{BatchItemResult, BatchResult};
pub use policy::{Policy, PolicyResult};
pub use transformers::TransformResult;
pub use validators::ValidationResult;
