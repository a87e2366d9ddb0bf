//! Environment-driven configuration
//!
//! Everything is read once at startup by `AppConfig::from_env`. A missing or
//! unparsable variable keeps its default.

pub mod delivery;
pub mod environment;
pub mod otp;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

// Re-export commonly used types
pub use delivery::{DeliveryConfig, EmailConfig, SmsConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Settings for one server process
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// One-time code policy
    #[serde(default)]
    pub otp: OtpConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Delivery channel configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            otp: OtpConfig::default(),
            rate_limit: RateLimitConfig::default(),
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean environment variable (`true`/`1`/`yes`/`on`)
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Read a string environment variable, treating blank values as missing
pub(crate) fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_development_logging() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.otp.reaper_enabled());
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        assert_eq!(env_or("OTP_SHARED_TEST_UNSET_VARIABLE", 42u32), 42);
    }

    #[test]
    fn test_env_flag_default() {
        assert!(env_flag("OTP_SHARED_TEST_UNSET_FLAG", true));
        assert!(!env_flag("OTP_SHARED_TEST_UNSET_FLAG", false));
    }
}
