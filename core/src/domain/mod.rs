//! Domain layer containing the OTP session entity.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
