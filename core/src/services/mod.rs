//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    generate_code, is_email, normalize, spawn_reaper, CheckResult, Clock, CodeGenerator,
    CreatedSession, DeliveryChannel, DeliveryOutcome, InMemoryOtpStore, ManualClock, OtpPolicy,
    OtpService, OtpStore, RateLimitStatus, SecureCodeGenerator, SendCodeResult, SweepReport,
    SystemClock, VerifyCodeResult,
};
