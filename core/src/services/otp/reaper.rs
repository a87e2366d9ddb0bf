//! Sweeping of expired sessions and stale rate-limit history
//!
//! The store sweeps opportunistically from its public entry points. A
//! periodic sweep can also be scheduled with `spawn_reaper`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::rate_limiter::SlidingWindowLimiter;
use super::session_table::SessionTable;
use super::store::OtpStore;

/// Summary of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Expired sessions removed from the arena
    pub sessions_removed: usize,
    /// Aliases that pointed at those sessions
    pub aliases_removed: usize,
    /// Rate-limit keys with nothing left in the window
    pub rate_limit_entries_removed: usize,
}

impl SweepReport {
    /// True when the sweep removed nothing
    pub fn is_empty(&self) -> bool {
        self.sessions_removed == 0
            && self.aliases_removed == 0
            && self.rate_limit_entries_removed == 0
    }
}

/// Remove expired sessions with all their aliases, then prune the limiter
pub fn sweep(
    sessions: &mut SessionTable,
    limiter: &mut SlidingWindowLimiter,
    now: DateTime<Utc>,
) -> SweepReport {
    let mut report = SweepReport::default();

    for id in sessions.expired_ids(now) {
        report.aliases_removed += sessions.remove_session(id);
        report.sessions_removed += 1;
    }
    report.rate_limit_entries_removed = limiter.prune_stale(now);

    report
}

/// Run `cleanup` on the store every `interval` until the task is aborted
pub fn spawn_reaper<S>(store: Arc<S>, interval: StdDuration) -> JoinHandle<()>
where
    S: OtpStore + ?Sized + 'static,
{
    info!(
        event = "reaper_started",
        interval_seconds = interval.as_secs(),
        "Starting OTP session reaper"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let report = store.cleanup();
            if !report.is_empty() {
                debug!(
                    event = "reaper_sweep",
                    sessions_removed = report.sessions_removed,
                    aliases_removed = report.aliases_removed,
                    rate_limit_entries_removed = report.rate_limit_entries_removed,
                    "Reaper removed stale OTP state"
                );
            }
        }
    })
}
