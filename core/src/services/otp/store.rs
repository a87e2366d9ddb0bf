//! OTP session store
//!
//! The store exposes whole operations rather than raw get/set so that each
//! read-modify-write happens under one guard. Any other backend has to give
//! the same atomic check-and-set guarantees.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use otp_shared::mask_identifier;

use super::clock::{Clock, SystemClock};
use super::code_generator::{CodeGenerator, SecureCodeGenerator};
use super::config::OtpPolicy;
use super::normalizer::{is_email, normalize};
use super::rate_limiter::{RateLimitStatus, SlidingWindowLimiter};
use super::reaper::{sweep, SweepReport};
use super::session_table::SessionTable;
use super::types::CreatedSession;
use crate::domain::Session;
use crate::errors::{OtpError, OtpResult};

/// Session lifecycle and rate limiting for contact verification
pub trait OtpStore: Send + Sync {
    /// Install a new session under the primary key and any secondary keys
    ///
    /// Every key is checked against the rate limit before anything is
    /// recorded. Existing sessions on these keys are replaced.
    fn create_session(
        &self,
        primary: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> OtpResult<CreatedSession>;

    /// Apply one verification attempt against the session bound to `identifier`
    fn verify_session(&self, identifier: &str, code: &str) -> OtpResult<()>;

    /// Whether the identifier is bound to a verified session
    fn is_verified(&self, identifier: &str) -> bool;

    /// Unbind this one identifier; returns true if it was bound
    fn clear_session(&self, identifier: &str) -> bool;

    /// Remove the session bound to `identifier` together with all its aliases
    fn clear_all_aliases(&self, identifier: &str) -> bool;

    /// Remove expired sessions and stale rate-limit history
    fn cleanup(&self) -> SweepReport;

    /// Policy this store was built with
    fn policy(&self) -> &OtpPolicy;
}

/// Everything behind the store's single guard
#[derive(Debug)]
struct StoreState {
    sessions: SessionTable,
    limiter: SlidingWindowLimiter,
}

/// Process-local store: one `RwLock` over the session table and the limiter
pub struct InMemoryOtpStore {
    state: RwLock<StoreState>,
    policy: OtpPolicy,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn CodeGenerator>,
}

impl InMemoryOtpStore {
    /// Store with the default policy, system clock and OS random codes
    pub fn new() -> Self {
        Self::with_policy(OtpPolicy::default())
    }

    pub fn with_policy(policy: OtpPolicy) -> Self {
        let generator = Arc::new(SecureCodeGenerator::new(policy.code_length));
        Self::with_parts(policy, Arc::new(SystemClock), generator)
    }

    /// Store with an injected clock and code generator
    pub fn with_parts(
        policy: OtpPolicy,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let limiter =
            SlidingWindowLimiter::new(policy.rate_limit_max_requests, policy.rate_limit_window);
        Self {
            state: RwLock::new(StoreState {
                sessions: SessionTable::new(),
                limiter,
            }),
            policy,
            clock,
            generator,
        }
    }

    // Write paths validate before they mutate, so a poisoned guard still
    // holds consistent state.
    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!(event = "otp_store_poisoned", "Recovering poisoned OTP store lock");
            poisoned.into_inner()
        })
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!(event = "otp_store_poisoned", "Recovering poisoned OTP store lock");
            poisoned.into_inner()
        })
    }

    /// Canonical keys for a create request: primary first, no duplicates
    fn alias_keys(primary: &str, email: Option<&str>, phone: Option<&str>) -> Vec<String> {
        let mut keys = vec![normalize(primary)];
        for secondary in [email, phone].into_iter().flatten() {
            let key = normalize(secondary);
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Rate-limit standing of an identifier
    pub fn rate_limit_status(&self, identifier: &str) -> RateLimitStatus {
        let now = self.clock.now();
        self.read_state().limiter.status(&normalize(identifier), now)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.read_state().sessions.session_count()
    }

    /// Number of bound canonical keys
    pub fn alias_count(&self) -> usize {
        self.read_state().sessions.alias_count()
    }

    /// Remaining attempts on the session bound to `identifier`
    pub fn remaining_attempts(&self, identifier: &str) -> Option<u32> {
        let state = self.read_state();
        state
            .sessions
            .get(&normalize(identifier))
            .map(|session| session.remaining_attempts(self.policy.max_attempts))
    }
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore for InMemoryOtpStore {
    fn create_session(
        &self,
        primary: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> OtpResult<CreatedSession> {
        let keys = Self::alias_keys(primary, email, phone);
        let canonical_key = keys[0].clone();

        let mut state = self.write_state();
        let now = self.clock.now();

        if let Err(err) = state.limiter.check_all(keys.iter().map(String::as_str), now) {
            warn!(
                event = "otp_rate_limited",
                identifier = %mask_identifier(&canonical_key),
                retry_after_seconds = err.retry_after_seconds().unwrap_or_default(),
                "OTP request rate limited"
            );
            return Err(err);
        }

        // Generation happens before any mutation so a random source failure
        // leaves the store untouched
        let code = self.generator.generate()?;

        state.limiter.record_all(keys.iter().map(String::as_str), now);

        let email_key = email
            .map(normalize)
            .filter(|k| !k.is_empty())
            .or_else(|| is_email(primary).then(|| canonical_key.clone()));
        let phone_key = phone
            .map(normalize)
            .filter(|k| !k.is_empty())
            .or_else(|| (!is_email(primary)).then(|| canonical_key.clone()));

        let session = Session::new(code.clone(), now, self.policy.ttl, email_key, phone_key);
        let expires_at = session.expires_at;
        state.sessions.install(&keys, session);

        info!(
            event = "otp_session_created",
            identifier = %mask_identifier(&canonical_key),
            aliases = keys.len(),
            "OTP session created"
        );

        Ok(CreatedSession {
            code,
            canonical_key,
            expires_at,
        })
    }

    fn verify_session(&self, identifier: &str, code: &str) -> OtpResult<()> {
        let key = normalize(identifier);
        let max_attempts = self.policy.max_attempts;

        let mut state = self.write_state();
        let now = self.clock.now();

        let id = state.sessions.resolve(&key).ok_or(OtpError::SessionNotFound)?;
        let outcome = match state.sessions.get_mut(&key) {
            Some(session) => session.attempt(code, now, max_attempts),
            None => Err(OtpError::SessionNotFound),
        };

        match &outcome {
            Ok(()) => {
                info!(
                    event = "otp_verified",
                    identifier = %mask_identifier(&key),
                    "OTP verified"
                );
            }
            Err(err @ (OtpError::SessionExpired | OtpError::AttemptsExhausted)) => {
                let aliases = state.sessions.remove_session(id);
                warn!(
                    event = "otp_session_removed",
                    identifier = %mask_identifier(&key),
                    aliases_removed = aliases,
                    reason = %err,
                    "OTP session removed"
                );
            }
            Err(OtpError::CodeMismatch { remaining_attempts }) => {
                warn!(
                    event = "otp_mismatch",
                    identifier = %mask_identifier(&key),
                    remaining_attempts = *remaining_attempts,
                    "OTP code mismatch"
                );
            }
            Err(err) => {
                debug!(
                    event = "otp_verify_rejected",
                    identifier = %mask_identifier(&key),
                    error = %err,
                    "OTP verification rejected"
                );
            }
        }

        outcome
    }

    fn is_verified(&self, identifier: &str) -> bool {
        let key = normalize(identifier);
        self.read_state()
            .sessions
            .get(&key)
            .map_or(false, |session| session.verified)
    }

    fn clear_session(&self, identifier: &str) -> bool {
        let key = normalize(identifier);
        let removed = self.write_state().sessions.remove_alias(&key);
        if removed {
            debug!(
                event = "otp_session_cleared",
                identifier = %mask_identifier(&key),
                "OTP session cleared"
            );
        }
        removed
    }

    fn clear_all_aliases(&self, identifier: &str) -> bool {
        let key = normalize(identifier);
        let mut state = self.write_state();
        let Some(id) = state.sessions.resolve(&key) else {
            return false;
        };
        let aliases = state.sessions.remove_session(id);
        debug!(
            event = "otp_session_cleared",
            identifier = %mask_identifier(&key),
            aliases_removed = aliases,
            "OTP session cleared with all aliases"
        );
        true
    }

    fn cleanup(&self) -> SweepReport {
        let mut state = self.write_state();
        let now = self.clock.now();
        let StoreState { sessions, limiter } = &mut *state;
        let report = sweep(sessions, limiter, now);

        if !report.is_empty() {
            debug!(
                event = "otp_cleanup",
                sessions_removed = report.sessions_removed,
                aliases_removed = report.aliases_removed,
                rate_limit_entries_removed = report.rate_limit_entries_removed,
                "Removed expired OTP state"
            );
        }
        report
    }

    fn policy(&self) -> &OtpPolicy {
        &self.policy
    }
}
