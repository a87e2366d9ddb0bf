//! Result types returned by the OTP store and service

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A freshly installed session
#[derive(Clone, PartialEq, Eq)]
pub struct CreatedSession {
    /// The code to deliver
    pub code: String,
    /// Canonical form of the primary identifier
    pub canonical_key: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CreatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedSession")
            .field("code", &"<redacted>")
            .field("canonical_key", &self.canonical_key)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// What one delivery channel did with a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    /// Channel name ("sms" or "email")
    pub channel: String,
    /// Whether the channel accepted the message
    pub delivered: bool,
    /// Provider message id on success
    pub message_id: Option<String>,
}

/// Result of sending a verification code
#[derive(Debug, Clone, Serialize)]
pub struct SendCodeResult {
    /// Canonical identifier the session was created for
    pub canonical_key: String,
    /// Code lifetime in minutes
    pub expires_in_minutes: i64,
    /// When the code expires
    pub expires_at: DateTime<Utc>,
    /// One entry per attempted delivery
    pub deliveries: Vec<DeliveryOutcome>,
}

impl SendCodeResult {
    /// True when at least one channel accepted the code
    pub fn any_delivered(&self) -> bool {
        self.deliveries.iter().any(|d| d.delivered)
    }
}

/// Result of verifying a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyCodeResult {
    pub canonical_key: String,
    pub verified: bool,
}

/// Result of a verification status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub canonical_key: String,
    pub verified: bool,
}
