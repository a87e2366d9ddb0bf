//! Shared utilities and common types for the OTP Gate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - API response envelopes
//! - Log-safe identifier masking

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DeliveryConfig, EmailConfig, Environment, LogFormat, LoggingConfig, OtpConfig,
    RateLimitConfig, ServerConfig, SmsConfig,
};
pub use types::{ApiResponse, ErrorResponse};
pub use utils::mask::{mask_email, mask_identifier, mask_phone};
