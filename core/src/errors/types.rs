//! Error types for the OTP engine and its delivery collaborators
//!
//! Messages carry no detail about how close a submitted code was. The only
//! hints exposed are a retry-after duration and a count of remaining attempts.

use chrono::Duration;
use thiserror::Error;

/// Errors produced by the session and rate-limit engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Rate limit exceeded, retry in {} seconds", .retry_after.num_seconds())]
    RateLimitExceeded { retry_after: Duration },

    #[error("OTP session not found")]
    SessionNotFound,

    #[error("OTP session expired")]
    SessionExpired,

    #[error("Contact already verified")]
    AlreadyVerified,

    #[error("Maximum verification attempts exceeded")]
    AttemptsExhausted,

    #[error("Invalid code, {remaining_attempts} attempt(s) remaining")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("Secure random source failure: {message}")]
    RandomSourceFailure { message: String },
}

impl OtpError {
    /// Whole seconds a rate-limited caller should wait, rounded up and never zero
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            OtpError::RateLimitExceeded { retry_after } => {
                let millis = retry_after.num_milliseconds().max(0) as u64;
                Some(((millis + 999) / 1000).max(1))
            }
            _ => None,
        }
    }

    /// Remaining attempts carried by a code mismatch
    pub fn remaining_attempts(&self) -> Option<u32> {
        match self {
            OtpError::CodeMismatch { remaining_attempts } => Some(*remaining_attempts),
            _ => None,
        }
    }

    /// Whether the caller has to request a fresh code to continue
    pub fn requires_new_code(&self) -> bool {
        matches!(
            self,
            OtpError::SessionNotFound | OtpError::SessionExpired | OtpError::AttemptsExhausted
        )
    }
}

/// Errors reported by a delivery channel
///
/// A delivery failure never invalidates the session it was delivering for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Invalid destination: {destination}")]
    InvalidDestination { destination: String },

    #[error("Delivery channel not configured: {message}")]
    NotConfigured { message: String },

    #[error("Delivery failed: {message}")]
    Failed { message: String },
}

/// Result type for engine operations
pub type OtpResult<T> = Result<T, OtpError>;
