//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{DeliveryError, OtpError, OtpResult};

use thiserror::Error;

/// Service-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    // Bridge to engine errors
    #[error(transparent)]
    Otp(#[from] OtpError),
}

pub type DomainResult<T> = Result<T, DomainError>;
