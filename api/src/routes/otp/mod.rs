//! OTP route handlers
//!
//! - `POST /api/v1/otp/send` issues and delivers a code
//! - `POST /api/v1/otp/verify` checks a submitted code
//! - `POST /api/v1/otp/check` reports verification status

use std::sync::Arc;

use otp_core::{DeliveryChannel, InMemoryOtpStore, OtpPolicy, OtpService, OtpStore};
use otp_infra::create_delivery_channels;
use otp_shared::AppConfig;

pub mod check;
pub mod send;
pub mod verify;

pub use check::check_verification;
pub use send::send_otp;
pub use verify::verify_otp;

/// Application state that holds shared services
#[derive(Clone)]
pub struct AppState {
    pub otp_service: Arc<OtpService<dyn OtpStore>>,
    pub store: Arc<dyn OtpStore>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OtpStore>,
        email_channel: Arc<dyn DeliveryChannel>,
        sms_channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        let otp_service = Arc::new(OtpService::new(store.clone(), email_channel, sms_channel));
        Self { otp_service, store }
    }

    /// Wire the in-memory store and configured delivery channels
    pub fn from_config(config: &AppConfig) -> Self {
        let policy = OtpPolicy::from_config(&config.rate_limit);
        let channels = create_delivery_channels(&config.delivery, policy.ttl_minutes());
        let store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::with_policy(policy));
        Self::new(store, channels.email, channels.sms)
    }
}
