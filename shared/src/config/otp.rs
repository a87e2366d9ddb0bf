//! One-time code housekeeping configuration
//!
//! Code lifetime, attempt limit and code length are fixed policy constants in
//! `otp_core` and cannot be overridden here.

use serde::{Deserialize, Serialize};

use super::env_or;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Seconds between background sweeps; 0 disables the background reaper
    #[serde(default)]
    pub reaper_interval_seconds: u64,
}

impl OtpConfig {
    /// Read `OTP_REAPER_INTERVAL_SECONDS`
    pub fn from_env() -> Self {
        Self {
            reaper_interval_seconds: env_or("OTP_REAPER_INTERVAL_SECONDS", 0),
        }
    }

    /// Whether a background sweep should be scheduled
    pub fn reaper_enabled(&self) -> bool {
        self.reaper_interval_seconds > 0
    }
}
