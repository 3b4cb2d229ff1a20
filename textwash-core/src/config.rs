//! Configuration management for `textwash-core`.
//!
//! This module defines the engine configuration: resource limits applied by
//! the dispatcher before any handler runs, and the default word list used by
//! the profanity filter. It handles serialization/deserialization of YAML
//! configurations and provides utilities for loading and merging them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum allowed length for a caller-supplied regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Resource ceilings applied by the dispatcher before any handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Requests whose `content` exceeds this many bytes are rejected before
    /// any pattern matching runs.
    pub max_content_length: usize,
    /// Cap on caller-supplied regex patterns (`mask_custom`, policy patterns).
    pub max_pattern_length: usize,
    /// Cap on the number of items a single `batch_sanitize` call may carry.
    pub max_batch_items: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_length: 1_048_576,
            max_pattern_length: MAX_PATTERN_LENGTH,
            max_batch_items: 10_000,
        }
    }
}

/// Word list and replacement used by the `filter_profanity` operation.
///
/// The built-in list ships in the embedded default configuration; callers may
/// override both fields per call or through a user configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfanityConfig {
    pub words: Vec<String>,
    pub replacement: String,
}

impl Default for ProfanityConfig {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            replacement: "***".to_string(),
        }
    }
}

/// Represents the top-level configuration structure for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: LimitsConfig,
    pub profanity: ProfanityConfig,
}

impl EngineConfig {
    /// Loads the default configuration from the embedded YAML.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default engine configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: EngineConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;

        debug!(
            "Loaded default configuration with {} profanity words.",
            config.profanity.words.len()
        );
        Ok(config)
    }

    /// Loads a user configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: EngineConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}

/// Merges a user configuration over the defaults.
///
/// Limits always come from the user configuration (missing fields fall back
/// to the standard defaults during deserialization). The profanity word list
/// and replacement are only overridden when the user supplies non-empty
/// values, so a limits-only file keeps the built-in word list.
pub fn merge_config(default_config: EngineConfig, user_config: Option<EngineConfig>) -> EngineConfig {
    let Some(user) = user_config else {
        return default_config;
    };

    debug!("Merging user configuration over defaults.");
    let mut merged = default_config;
    merged.limits = user.limits;

    if !user.profanity.words.is_empty() {
        debug!("Overriding profanity word list with {} user words.", user.profanity.words.len());
        merged.profanity.words = user.profanity.words;
    }
    if !user.profanity.replacement.is_empty() {
        merged.profanity.replacement = user.profanity.replacement;
    }

    merged
}
