//! batch.rs - Result types for the batch runner.
//!
//! One failing item never affects its siblings: the runner records an error
//! at the failing index and keeps going, so `results.len()` always equals
//! the input length and result order always matches input order.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Status;

/// The outcome of one item in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub status: Status,
    /// The item as submitted (JSON-rendered when it was not a string).
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    pub(crate) fn success(index: usize, input: String, result: Value) -> Self {
        Self {
            index,
            status: Status::Success,
            input,
            result: Some(result),
            error: None,
        }
    }

    pub(crate) fn failure(index: usize, input: String, error: String) -> Self {
        Self {
            index,
            status: Status::Error,
            input,
            result: None,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchResult {
    pub(crate) fn from_items(results: Vec<BatchItemResult>) -> Self {
        let successful = results
            .iter()
            .filter(|r| r.status == Status::Success)
            .count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}
