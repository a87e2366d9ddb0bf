//! # Infrastructure Layer
//!
//! Concrete delivery channels for one-time codes:
//! - **Console**: logs codes instead of sending them (development)
//! - **Twilio**: SMS over the Twilio REST API
//!
//! Channels are chosen from `DeliveryConfig` by `create_delivery_channels`.

use otp_core::errors::DeliveryError;

pub mod delivery;

pub use delivery::{
    create_delivery_channels, create_email_channel, create_sms_channel, ConsoleChannel,
    DeliveryChannels, TwilioConfig, TwilioSmsChannel,
};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS provider rejected the request
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Destination cannot be delivered to
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
}

impl From<InfrastructureError> for DeliveryError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DeliveryError::NotConfigured { message },
            InfrastructureError::InvalidDestination(destination) => {
                DeliveryError::InvalidDestination { destination }
            }
            other => DeliveryError::Failed {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_maps_to_delivery_error() {
        let err: DeliveryError = InfrastructureError::Config("missing sid".into()).into();
        assert_eq!(
            err,
            DeliveryError::NotConfigured {
                message: "missing sid".into()
            }
        );

        let err: DeliveryError = InfrastructureError::Sms("status 500".into()).into();
        assert!(matches!(err, DeliveryError::Failed { message } if message.contains("status 500")));
    }
}
