//! envelope.rs - The uniform result wrapper returned by every dispatch.
//!
//! Whatever an operation does, the caller always receives an [`Envelope`]:
//! a status, the operation name, the operation-specific payload (or an error
//! message), the processing time, and an RFC 3339 timestamp.
//!
//! License: MIT OR Apache-2.0

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Whether a dispatched request produced a payload or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The uniform envelope wrapped around every operation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    pub operation: String,
    pub result: Option<Value>,
    pub processing_time_seconds: f64,
    pub timestamp: String,
    pub error: Option<String>,
}

impl Envelope {
    /// Wraps a successful operation payload.
    pub fn success(operation: &str, result: Value, elapsed: Duration) -> Self {
        Self {
            status: Status::Success,
            operation: operation.to_string(),
            result: Some(result),
            processing_time_seconds: elapsed.as_secs_f64(),
            timestamp: Utc::now().to_rfc3339(),
            error: None,
        }
    }

    /// Wraps a request or handler error.
    pub fn failure(operation: &str, error: String, elapsed: Duration) -> Self {
        Self {
            status: Status::Error,
            operation: operation.to_string(),
            result: None,
            processing_time_seconds: elapsed.as_secs_f64(),
            timestamp: Utc::now().to_rfc3339(),
            error: Some(error),
        }
    }

    /// True when the envelope carries a payload.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let envelope = Envelope::success("escape_html", json!({"output": "x"}), Duration::from_millis(2));
        assert!(envelope.is_success());
        assert_eq!(envelope.operation, "escape_html");
        assert!(envelope.error.is_none());
        assert!(envelope.processing_time_seconds > 0.0);

        let serialized = serde_json::to_value(&envelope).unwrap();
        assert_eq!(serialized["status"], "success");
    }

    #[test]
    fn failure_envelope_shape() {
        let envelope = Envelope::failure("nope", "Unknown operation 'nope'".to_string(), Duration::ZERO);
        assert!(!envelope.is_success());
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Unknown operation 'nope'"));
    }
}
