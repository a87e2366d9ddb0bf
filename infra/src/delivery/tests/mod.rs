//! Tests for channel selection

use otp_core::DeliveryChannel;
use otp_shared::{DeliveryConfig, EmailConfig, SmsConfig};

use super::*;

#[test]
fn test_disabled_channels_use_console() {
    let channels = create_delivery_channels(&DeliveryConfig::default(), 10);
    assert_eq!(channels.sms.channel_name(), "sms");
    assert_eq!(channels.email.channel_name(), "email");
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_console() {
    let config = SmsConfig {
        enabled: true,
        provider: "carrier-pigeon".to_string(),
        ..SmsConfig::default()
    };
    let channel = create_sms_channel(&config, 10);

    let message_id = channel.deliver("+14155550123", "123456").await.unwrap();
    assert!(message_id.starts_with("console_"));
}

#[tokio::test]
async fn test_twilio_without_credentials_falls_back_to_console() {
    let config = SmsConfig {
        enabled: true,
        provider: "twilio".to_string(),
        ..SmsConfig::default()
    };
    let channel = create_sms_channel(&config, 10);

    let message_id = channel.deliver("+14155550123", "123456").await.unwrap();
    assert!(message_id.starts_with("console_"));
}

#[tokio::test]
async fn test_email_channel_is_console() {
    let config = EmailConfig {
        enabled: true,
        ..EmailConfig::default()
    };
    let channel = create_email_channel(&config, 10);

    let message_id = channel.deliver("user@example.com", "123456").await.unwrap();
    assert!(message_id.starts_with("console_"));
}
