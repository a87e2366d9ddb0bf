//! Console Delivery Channel
//!
//! Logs codes instead of sending them. Used in development and whenever a
//! real provider is disabled or unavailable.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::errors::DeliveryError;
use otp_core::{is_email, normalize, DeliveryChannel};
use otp_shared::mask_identifier;

use super::message::{email_subject, email_text_body, sms_body};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Medium {
    Sms,
    Email,
}

/// Console channel for development and testing
///
/// Tracks the number of messages it "sent" and can simulate failures.
#[derive(Clone)]
pub struct ConsoleChannel {
    medium: Medium,
    from_address: Option<String>,
    ttl_minutes: i64,
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl ConsoleChannel {
    /// Console stand-in for the SMS channel
    pub fn sms(ttl_minutes: i64) -> Self {
        Self {
            medium: Medium::Sms,
            from_address: None,
            ttl_minutes,
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Console stand-in for the email channel
    pub fn email(from_address: &str, ttl_minutes: i64) -> Self {
        Self {
            medium: Medium::Email,
            from_address: Some(from_address.to_string()),
            ttl_minutes,
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Enable or disable failure simulation
    pub fn with_simulated_failure(mut self, simulate: bool) -> Self {
        self.simulate_failure = simulate;
        self
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    fn check_destination(&self, destination: &str) -> Result<(), DeliveryError> {
        let valid = match self.medium {
            Medium::Email => is_email(destination),
            Medium::Sms => !is_email(destination) && !normalize(destination).is_empty(),
        };
        if valid {
            Ok(())
        } else {
            Err(DeliveryError::InvalidDestination {
                destination: mask_identifier(destination),
            })
        }
    }
}

#[async_trait]
impl DeliveryChannel for ConsoleChannel {
    async fn deliver(&self, destination: &str, code: &str) -> Result<String, DeliveryError> {
        self.check_destination(destination)?;

        if self.simulate_failure {
            warn!(
                channel = self.channel_name(),
                destination = %mask_identifier(destination),
                "Console channel simulating failure"
            );
            return Err(DeliveryError::Failed {
                message: "Simulated delivery failure".to_string(),
            });
        }

        let message_id = format!("console_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        // Development mode: the code itself is logged
        match self.medium {
            Medium::Sms => info!(
                target: "delivery",
                provider = "console",
                channel = "sms",
                destination = %mask_identifier(destination),
                message_id = %message_id,
                count,
                body = %sms_body(code, self.ttl_minutes),
                "DEV MODE - SMS not sent"
            ),
            Medium::Email => info!(
                target: "delivery",
                provider = "console",
                channel = "email",
                from = self.from_address.as_deref().unwrap_or_default(),
                destination = %mask_identifier(destination),
                message_id = %message_id,
                count,
                subject = email_subject(),
                body = %email_text_body(code, self.ttl_minutes),
                "DEV MODE - email not sent"
            ),
        }

        Ok(message_id)
    }

    fn channel_name(&self) -> &str {
        match self.medium {
            Medium::Sms => "sms",
            Medium::Email => "email",
        }
    }
}
