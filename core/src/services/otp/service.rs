//! Send/verify/check orchestration on top of the OTP store

use std::sync::Arc;
use tracing::{info, warn};

use otp_shared::mask_identifier;

use crate::errors::{DomainError, DomainResult};

use super::normalizer::normalize;
use super::store::OtpStore;
use super::traits::DeliveryChannel;
use super::types::{CheckResult, DeliveryOutcome, SendCodeResult, VerifyCodeResult};

/// Contact verification service
///
/// Delivery runs after the store operation has returned, so no channel I/O
/// ever happens under the store's guard.
pub struct OtpService<S: OtpStore + ?Sized> {
    store: Arc<S>,
    email_channel: Arc<dyn DeliveryChannel>,
    sms_channel: Arc<dyn DeliveryChannel>,
}

impl<S: OtpStore + ?Sized> OtpService<S> {
    pub fn new(
        store: Arc<S>,
        email_channel: Arc<dyn DeliveryChannel>,
        sms_channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            store,
            email_channel,
            sms_channel,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Pick the primary identifier: phone when given, otherwise email
    fn primary<'a>(
        phone: Option<&'a str>,
        email: Option<&'a str>,
    ) -> DomainResult<(&'a str, Option<&'a str>, Option<&'a str>)> {
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());
        let email = email.map(str::trim).filter(|e| !e.is_empty());

        let primary = phone.or(email).ok_or_else(|| DomainError::Validation {
            message: "either phone_number or email must be provided".to_string(),
        })?;

        if normalize(primary).is_empty() {
            return Err(DomainError::Validation {
                message: "identifier does not contain a usable phone number or email".to_string(),
            });
        }

        Ok((primary, phone, email))
    }

    /// Issue a code for a phone number and/or email and deliver it
    ///
    /// Delivery failures are logged and reported in the result; the session
    /// stays valid either way.
    pub async fn send_code(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> DomainResult<SendCodeResult> {
        let (primary, phone, email) = Self::primary(phone, email)?;

        self.store.cleanup();

        let created = self.store.create_session(primary, email, phone)?;

        let mut deliveries = Vec::new();
        if let Some(email) = email {
            deliveries.push(self.deliver(&self.email_channel, email, &created.code).await);
        }
        if let Some(phone) = phone {
            deliveries.push(self.deliver(&self.sms_channel, phone, &created.code).await);
        }

        info!(
            event = "otp_send_success",
            identifier = %mask_identifier(&created.canonical_key),
            channels = deliveries.len(),
            "Verification code issued"
        );

        Ok(SendCodeResult {
            canonical_key: created.canonical_key,
            expires_in_minutes: self.store.policy().ttl_minutes(),
            expires_at: created.expires_at,
            deliveries,
        })
    }

    async fn deliver(
        &self,
        channel: &Arc<dyn DeliveryChannel>,
        destination: &str,
        code: &str,
    ) -> DeliveryOutcome {
        match channel.deliver(destination, code).await {
            Ok(message_id) => {
                info!(
                    event = "otp_delivered",
                    channel = channel.channel_name(),
                    destination = %mask_identifier(destination),
                    "Verification code delivered"
                );
                DeliveryOutcome {
                    channel: channel.channel_name().to_string(),
                    delivered: true,
                    message_id: Some(message_id),
                }
            }
            Err(e) => {
                warn!(
                    event = "otp_delivery_failed",
                    channel = channel.channel_name(),
                    destination = %mask_identifier(destination),
                    error = %e,
                    "Failed to deliver verification code"
                );
                DeliveryOutcome {
                    channel: channel.channel_name().to_string(),
                    delivered: false,
                    message_id: None,
                }
            }
        }
    }

    /// Verify a code for a phone number or email
    pub async fn verify_code(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let (primary, _, _) = Self::primary(phone, email)?;

        self.store.cleanup();

        self.store.verify_session(primary, code)?;

        Ok(VerifyCodeResult {
            canonical_key: normalize(primary),
            verified: true,
        })
    }

    /// Report whether an identifier has been verified
    pub fn check_verification(&self, identifier: &str) -> CheckResult {
        CheckResult {
            canonical_key: normalize(identifier),
            verified: self.store.is_verified(identifier),
        }
    }

    /// Drop the session binding for an identifier
    pub fn clear(&self, identifier: &str) -> bool {
        self.store.clear_session(identifier)
    }
}
