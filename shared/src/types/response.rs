//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error response
    pub fn error(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Error body returned to clients
///
/// `code` is stable and meant for programmatic handling; `message` is for
/// people. The optional fields carry just enough for a legitimate retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Seconds to wait before retrying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,

    /// Verification attempts left on the current code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

impl ErrorResponse {
    /// Create an error body with only a code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retry_after_seconds: None,
            remaining_attempts: None,
        }
    }

    /// Attach a retry-after hint
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after_seconds = Some(seconds);
        self
    }

    /// Attach the remaining attempt count
    pub fn with_remaining_attempts(mut self, remaining: u32) -> Self {
        self.remaining_attempts = Some(remaining);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_omits_error() {
        let response = ApiResponse::success("ok");
        assert!(response.is_success());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["data"], "ok");
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse::new("rate_limited", "Too many requests").with_retry_after(42);
        let response: ApiResponse<()> = ApiResponse::error(body);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["error"]["retry_after_seconds"], 42);
        assert!(json["error"].get("remaining_attempts").is_none());
    }
}
