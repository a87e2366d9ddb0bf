//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Sliding-window limit on code requests per canonical identifier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max code requests per identifier inside one window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Load limits from `OTP_RATE_LIMIT_*` environment variables
    pub fn from_env() -> Self {
        Self {
            max_requests: env_or("OTP_RATE_LIMIT_MAX_REQUESTS", default_max_requests()),
            window_seconds: env_or("OTP_RATE_LIMIT_WINDOW_SECONDS", default_window_seconds()),
        }
    }
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_seconds() -> u64 {
    60
}
