//! Delivery channel configuration (SMS and email)

use serde::{Deserialize, Serialize};

use super::{env_flag, env_string};

/// Configuration for both code delivery channels
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// SMS channel
    #[serde(default)]
    pub sms: SmsConfig,

    /// Email channel
    #[serde(default)]
    pub email: EmailConfig,
}

impl DeliveryConfig {
    /// Load both channels from the environment
    pub fn from_env() -> Self {
        Self {
            sms: SmsConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

/// SMS channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// When false, codes are only written to the log
    #[serde(default)]
    pub enabled: bool,

    /// Provider name: "console" or "twilio"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Twilio account SID
    #[serde(default)]
    pub twilio_account_sid: Option<String>,

    /// Twilio auth token
    #[serde(default, skip_serializing)]
    pub twilio_auth_token: Option<String>,

    /// Sending number in E.164 format
    #[serde(default)]
    pub twilio_from_number: Option<String>,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
        }
    }
}

impl SmsConfig {
    /// Load from `SMS_*` and `TWILIO_*` variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("SMS_ENABLED", false),
            provider: env_string("SMS_PROVIDER").unwrap_or_else(default_provider),
            twilio_account_sid: env_string("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: env_string("TWILIO_AUTH_TOKEN"),
            twilio_from_number: env_string("TWILIO_FROM_NUMBER"),
        }
    }
}

/// Email channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// When false, codes are only written to the log
    #[serde(default)]
    pub enabled: bool,

    /// Provider name; only "console" ships with this repository
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            from_address: default_from_address(),
        }
    }
}

impl EmailConfig {
    /// Load from `EMAIL_*` variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("EMAIL_ENABLED", false),
            provider: env_string("EMAIL_PROVIDER").unwrap_or_else(default_provider),
            from_address: env_string("EMAIL_FROM").unwrap_or_else(default_from_address),
        }
    }
}

fn default_provider() -> String {
    String::from("console")
}

fn default_from_address() -> String {
    String::from("noreply@otpgate.local")
}
