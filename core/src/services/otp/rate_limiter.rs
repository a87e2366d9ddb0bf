//! Sliding-window request limiter keyed by canonical identifier
//!
//! The limiter holds plain data and takes `now` from its caller; the store
//! owns it under the same guard as the session table.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};

use crate::errors::{OtpError, OtpResult};

/// Snapshot of one key's standing in the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests still counted in the window
    pub current_count: usize,
    /// Requests left before the key is denied
    pub remaining: usize,
    /// When the oldest counted request leaves the window
    pub resets_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    history: HashMap<String, VecDeque<DateTime<Utc>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            history: HashMap::new(),
        }
    }

    /// Drop this key's timestamps that fell out of the window
    fn prune_key(&mut self, key: &str, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        if let Some(entries) = self.history.get_mut(key) {
            while entries.front().map_or(false, |t| *t <= cutoff) {
                entries.pop_front();
            }
            if entries.is_empty() {
                self.history.remove(key);
            }
        }
    }

    /// Check one key without recording a request
    pub fn check(&mut self, key: &str, now: DateTime<Utc>) -> OtpResult<()> {
        self.prune_key(key, now);

        let Some(entries) = self.history.get(key) else {
            return Ok(());
        };

        if entries.len() >= self.max_requests {
            let retry_after = match entries.front() {
                Some(oldest) => *oldest + self.window - now,
                None => self.window,
            };
            return Err(OtpError::RateLimitExceeded { retry_after });
        }

        Ok(())
    }

    /// Record a request for one key
    pub fn record(&mut self, key: &str, now: DateTime<Utc>) {
        self.history
            .entry(key.to_string())
            .or_default()
            .push_back(now);
    }

    /// Check then record a single key
    pub fn check_and_record(&mut self, key: &str, now: DateTime<Utc>) -> OtpResult<()> {
        self.check(key, now)?;
        self.record(key, now);
        Ok(())
    }

    /// Check every key, denying with the longest wait if any is over the limit
    ///
    /// Nothing is recorded here, so a denied multi-key request leaves no trace.
    pub fn check_all<'a, I>(&mut self, keys: I, now: DateTime<Utc>) -> OtpResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut longest: Option<Duration> = None;
        for key in keys {
            if let Err(OtpError::RateLimitExceeded { retry_after }) = self.check(key, now) {
                longest = Some(match longest {
                    Some(current) if current >= retry_after => current,
                    _ => retry_after,
                });
            }
        }

        match longest {
            Some(retry_after) => Err(OtpError::RateLimitExceeded { retry_after }),
            None => Ok(()),
        }
    }

    /// Record one request for every key
    pub fn record_all<'a, I>(&mut self, keys: I, now: DateTime<Utc>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            self.record(key, now);
        }
    }

    /// Remove every entry with nothing left in the window, returning how many went
    pub fn prune_stale(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        let before = self.history.len();
        self.history.retain(|_, entries| {
            while entries.front().map_or(false, |t| *t <= cutoff) {
                entries.pop_front();
            }
            !entries.is_empty()
        });
        before - self.history.len()
    }

    /// Requests currently counted for a key
    pub fn request_count(&self, key: &str, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        self.history
            .get(key)
            .map_or(0, |entries| entries.iter().filter(|t| **t > cutoff).count())
    }

    pub fn status(&self, key: &str, now: DateTime<Utc>) -> RateLimitStatus {
        let cutoff = now - self.window;
        let oldest = self
            .history
            .get(key)
            .and_then(|entries| entries.iter().find(|t| **t > cutoff).copied());
        let current_count = self.request_count(key, now);

        RateLimitStatus {
            current_count,
            remaining: self.max_requests.saturating_sub(current_count),
            resets_at: oldest.map(|t| t + self.window),
        }
    }

    /// Number of keys with history
    pub fn tracked_keys(&self) -> usize {
        self.history.len()
    }
}
