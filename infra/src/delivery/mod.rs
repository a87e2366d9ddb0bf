//! Delivery Channel Module
//!
//! Implementations of `DeliveryChannel` and a factory that picks them from
//! configuration. A disabled channel always falls back to the console
//! channel, so codes still show up in development logs.

use std::sync::Arc;

use otp_core::DeliveryChannel;
use otp_shared::{DeliveryConfig, EmailConfig, SmsConfig};

pub mod console;
pub mod message;
pub mod twilio;

pub use console::ConsoleChannel;
pub use message::{email_subject, email_text_body, sms_body};
pub use twilio::{TwilioConfig, TwilioSmsChannel};

#[cfg(test)]
mod tests;

/// The pair of channels the OTP service delivers through
#[derive(Clone)]
pub struct DeliveryChannels {
    pub email: Arc<dyn DeliveryChannel>,
    pub sms: Arc<dyn DeliveryChannel>,
}

/// Build both channels from configuration
pub fn create_delivery_channels(config: &DeliveryConfig, ttl_minutes: i64) -> DeliveryChannels {
    DeliveryChannels {
        email: create_email_channel(&config.email, ttl_minutes),
        sms: create_sms_channel(&config.sms, ttl_minutes),
    }
}

/// Create the SMS channel named by `SMS_PROVIDER`
///
/// Falls back to the console channel when SMS is disabled, the provider is
/// unknown, or the provider is missing credentials.
pub fn create_sms_channel(config: &SmsConfig, ttl_minutes: i64) -> Arc<dyn DeliveryChannel> {
    if !config.enabled {
        tracing::info!(event = "sms_channel", provider = "console", "SMS delivery disabled");
        return Arc::new(ConsoleChannel::sms(ttl_minutes));
    }

    match config.provider.as_str() {
        "console" | "dev" | "development" => Arc::new(ConsoleChannel::sms(ttl_minutes)),
        "twilio" => match TwilioConfig::from_sms_config(config)
            .and_then(|twilio| TwilioSmsChannel::new(twilio, ttl_minutes))
        {
            Ok(channel) => Arc::new(channel),
            Err(e) => {
                tracing::error!("Failed to initialize Twilio SMS channel: {}", e);
                tracing::warn!("Falling back to console SMS channel");
                Arc::new(ConsoleChannel::sms(ttl_minutes))
            }
        },
        other => {
            tracing::warn!(
                "Unknown SMS provider '{}', using console implementation",
                other
            );
            Arc::new(ConsoleChannel::sms(ttl_minutes))
        }
    }
}

/// Create the email channel named by `EMAIL_PROVIDER`
pub fn create_email_channel(config: &EmailConfig, ttl_minutes: i64) -> Arc<dyn DeliveryChannel> {
    if config.enabled && config.provider != "console" {
        tracing::warn!(
            "Unknown email provider '{}', using console implementation",
            config.provider
        );
    }
    Arc::new(ConsoleChannel::email(&config.from_address, ttl_minutes))
}
