//! Twilio SMS Channel
//!
//! Sends codes through the Twilio Messages REST endpoint with basic auth
//! and retries transient failures with exponential backoff.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use otp_core::errors::DeliveryError;
use otp_core::DeliveryChannel;
use otp_shared::{mask_phone, SmsConfig};

use super::message::sms_body;
use crate::InfrastructureError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Maximum SMS body Twilio accepts
const MAX_MESSAGE_LENGTH: usize = 1600;

/// Twilio SMS channel configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API base URL
    pub api_base: String,
}

impl TwilioConfig {
    /// Build from the loaded SMS configuration
    pub fn from_sms_config(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let account_sid = config
            .twilio_account_sid
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = config
            .twilio_auth_token
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = config
            .twilio_from_number
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 10,
            api_base: TWILIO_API_BASE.to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", self.api_base, self.account_sid)
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio-backed SMS delivery
pub struct TwilioSmsChannel {
    client: reqwest::Client,
    config: TwilioConfig,
    ttl_minutes: i64,
}

impl TwilioSmsChannel {
    pub fn new(config: TwilioConfig, ttl_minutes: i64) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio SMS channel initialized with from number: {}",
            mask_phone(&config.from_number)
        );

        Ok(Self {
            client,
            config,
            ttl_minutes,
        })
    }

    /// Put a phone number in E.164 form, assuming the US when no country code is given
    pub fn to_e164(phone: &str) -> Result<String, InfrastructureError> {
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 7 {
            return Err(InfrastructureError::InvalidDestination(mask_phone(phone)));
        }

        if phone.trim_start().starts_with('+') || digits.starts_with('1') {
            Ok(format!("+{}", digits))
        } else {
            Ok(format!("+1{}", digits))
        }
    }

    async fn send_once(&self, to: &str, body: &str) -> Result<String, SendFailure> {
        let params = [
            ("From", self.config.from_number.as_str()),
            ("To", to),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendFailure::Retryable(e.into()))?;

        let status = response.status();
        if status.is_success() {
            let message: MessageResponse = response
                .json()
                .await
                .map_err(|e| SendFailure::Fatal(e.into()))?;
            return Ok(message.sid);
        }

        let detail = response.json::<ErrorResponse>().await.ok();
        let message = format!(
            "Twilio API error (status {}): {}",
            status.as_u16(),
            detail
                .map(|d| format!(
                    "{} (code {})",
                    d.message.unwrap_or_default(),
                    d.code.unwrap_or_default()
                ))
                .unwrap_or_else(|| "no error body".to_string())
        );

        if status.as_u16() == 429 || status.is_server_error() {
            Err(SendFailure::Retryable(InfrastructureError::Sms(message)))
        } else {
            Err(SendFailure::Fatal(InfrastructureError::Sms(message)))
        }
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;
            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_phone(to)
            );

            match self.send_once(to, body).await {
                Ok(sid) => {
                    info!("SMS sent successfully to {} with SID: {}", mask_phone(to), sid);
                    return Ok(sid);
                }
                Err(SendFailure::Fatal(e)) => {
                    error!("Twilio rejected SMS to {}: {}", mask_phone(to), e);
                    return Err(e);
                }
                Err(SendFailure::Retryable(e)) => {
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, self.config.max_retries, e
                    );
                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            attempts, e
                        )));
                    }
                    warn!("Retrying SMS after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

enum SendFailure {
    Retryable(InfrastructureError),
    Fatal(InfrastructureError),
}

#[async_trait]
impl DeliveryChannel for TwilioSmsChannel {
    async fn deliver(&self, destination: &str, code: &str) -> Result<String, DeliveryError> {
        let to = Self::to_e164(destination)?;
        let body = sms_body(code, self.ttl_minutes);

        if body.len() > MAX_MESSAGE_LENGTH {
            return Err(DeliveryError::Failed {
                message: "Message exceeds maximum length of 1600 characters".to_string(),
            });
        }

        Ok(self.send_with_retry(&to, &body).await?)
    }

    fn channel_name(&self) -> &str {
        "sms"
    }
}
