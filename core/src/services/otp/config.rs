//! Engine policy

use chrono::Duration;
use otp_shared::RateLimitConfig;

use crate::domain::{CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Default code requests per identifier per window
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 5;

/// Default rate-limit window (1 minute)
pub const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: i64 = 60;

/// Longest configurable rate-limit window (1 day)
pub const MAX_RATE_LIMIT_WINDOW_SECONDS: i64 = 86_400;

/// Fixed policy for one store; never supplied per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Lifetime of a code
    pub ttl: Duration,
    /// Verification attempts per code
    pub max_attempts: u32,
    /// Digits per code
    pub code_length: usize,
    /// Code requests allowed per identifier per window
    pub rate_limit_max_requests: u32,
    /// Length of the rate-limit window
    pub rate_limit_window: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
            max_attempts: MAX_ATTEMPTS,
            code_length: CODE_LENGTH,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window: Duration::seconds(DEFAULT_RATE_LIMIT_WINDOW_SECONDS),
        }
    }
}

impl OtpPolicy {
    /// Fixed code policy with the configured rate limit
    ///
    /// A zero request budget or a window outside `1..=MAX_RATE_LIMIT_WINDOW_SECONDS`
    /// falls back to the default.
    pub fn from_config(rate_limit: &RateLimitConfig) -> Self {
        let defaults = Self::default();

        let max_requests = match rate_limit.max_requests {
            0 => defaults.rate_limit_max_requests,
            n => n,
        };
        let window = i64::try_from(rate_limit.window_seconds)
            .ok()
            .filter(|secs| (1..=MAX_RATE_LIMIT_WINDOW_SECONDS).contains(secs))
            .map(Duration::seconds)
            .unwrap_or(defaults.rate_limit_window);

        Self {
            rate_limit_max_requests: max_requests,
            rate_limit_window: window,
            ..defaults
        }
    }

    /// Code lifetime in whole minutes
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_constants() {
        let policy = OtpPolicy::default();
        assert_eq!(policy.ttl_minutes(), 10);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.code_length, 6);
        assert_eq!(policy.rate_limit_max_requests, 5);
        assert_eq!(policy.rate_limit_window, Duration::seconds(60));
    }

    #[test]
    fn test_from_default_config() {
        let policy = OtpPolicy::from_config(&RateLimitConfig::default());
        assert_eq!(policy, OtpPolicy::default());
    }

    #[test]
    fn test_configured_rate_limit_is_applied() {
        let policy = OtpPolicy::from_config(&RateLimitConfig {
            max_requests: 2,
            window_seconds: 300,
        });
        assert_eq!(policy.rate_limit_max_requests, 2);
        assert_eq!(policy.rate_limit_window, Duration::minutes(5));
        assert_eq!(policy.code_length, CODE_LENGTH);
        assert_eq!(policy.max_attempts, MAX_ATTEMPTS);
    }

    #[test]
    fn test_out_of_range_rate_limit_falls_back() {
        for (max_requests, window_seconds) in [(0, 60), (5, 0), (5, u64::MAX), (5, 86_401)] {
            let policy = OtpPolicy::from_config(&RateLimitConfig {
                max_requests,
                window_seconds,
            });
            assert!(policy.rate_limit_max_requests >= 1);
            assert!(policy.rate_limit_window > Duration::zero());
            assert!(policy.rate_limit_window <= Duration::days(1));
        }
    }
}
