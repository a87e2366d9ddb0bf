//! One-time code engine and verification service
//!
//! - `normalizer` canonicalizes phone numbers and emails
//! - `code_generator` draws numeric codes from the OS RNG
//! - `rate_limiter` counts requests in a sliding window
//! - `session_table` binds canonical keys to shared sessions
//! - `store` guards the table and limiter behind one lock
//! - `reaper` sweeps expired state
//! - `service` ties the store to delivery channels

mod clock;
mod code_generator;
mod config;
mod normalizer;
mod rate_limiter;
mod reaper;
mod service;
mod session_table;
mod store;
mod traits;
mod types;


pub use clock::{Clock, ManualClock, SystemClock};
pub use code_generator::{generate_code, CodeGenerator, SecureCodeGenerator};
pub use config::{
    OtpPolicy, DEFAULT_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
    MAX_RATE_LIMIT_WINDOW_SECONDS,
};
pub use normalizer::{is_email, normalize};
pub use rate_limiter::{RateLimitStatus, SlidingWindowLimiter};
pub use reaper::{spawn_reaper, sweep, SweepReport};
pub use service::OtpService;
pub use session_table::SessionTable;
pub use store::{InMemoryOtpStore, OtpStore};
pub use traits::DeliveryChannel;
pub use types::{CheckResult, CreatedSession, DeliveryOutcome, SendCodeResult, VerifyCodeResult};
