//! OTP session entity and its verification state machine.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use std::fmt;
use uuid::Uuid;

use crate::errors::{OtpError, OtpResult};

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Opaque identifier of a session in the session arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Allocate a fresh session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One outstanding or resolved verification attempt
///
/// A session is shared by every canonical key it was installed under; the
/// keys are aliases of this one value, not copies of it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Arena id
    pub id: SessionId,

    /// The current secret
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Number of verification attempts made
    pub attempts: u32,

    /// Terminal once true
    pub verified: bool,

    /// Normalized email bound to this session
    pub email: Option<String>,

    /// Normalized phone bound to this session
    pub phone: Option<String>,
}

impl Session {
    /// Create a session that expires `ttl` after `now`
    pub fn new(
        code: String,
        now: DateTime<Utc>,
        ttl: Duration,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            code,
            created_at: now,
            expires_at: now + ttl,
            attempts: 0,
            verified: false,
            email,
            phone,
        }
    }

    /// Whether the code has passed its expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Remaining verification attempts (0 if exhausted)
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Whether the session is Active: unverified, unexpired and under the attempt limit
    pub fn is_active(&self, now: DateTime<Utc>, max_attempts: u32) -> bool {
        !self.verified && !self.is_expired(now) && self.attempts < max_attempts
    }

    /// Constant-time comparison against the stored code
    pub fn matches(&self, submitted: &str) -> bool {
        if submitted.len() != self.code.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Apply one verification attempt
    ///
    /// Checks run in a fixed order: verified, expired, exhausted, then the
    /// attempt is counted and the code compared. A verified session is never
    /// charged an attempt. The caller owns deletion: on `SessionExpired` and
    /// `AttemptsExhausted` the session must be removed.
    pub fn attempt(
        &mut self,
        submitted: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> OtpResult<()> {
        if self.verified {
            return Err(OtpError::AlreadyVerified);
        }

        if self.is_expired(now) {
            return Err(OtpError::SessionExpired);
        }

        // Exhausted by an earlier caller
        if self.attempts >= max_attempts {
            return Err(OtpError::AttemptsExhausted);
        }

        self.attempts += 1;

        if !self.matches(submitted) {
            let remaining = self.remaining_attempts(max_attempts);
            if remaining == 0 {
                return Err(OtpError::AttemptsExhausted);
            }
            return Err(OtpError::CodeMismatch {
                remaining_attempts: remaining,
            });
        }

        self.verified = true;
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("code", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .field("verified", &self.verified)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish()
    }
}
