use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Phone number in any common format, e.g. "+1 (415) 555-0123"
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,

    /// Email address
    #[validate(length(max = 254))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,

    #[validate(length(max = 254))]
    pub email: Option<String>,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckVerificationRequest {
    /// Phone number or email to check
    #[validate(length(min = 1, max = 254))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub message: String,
    /// Canonical identifier the code was issued for
    pub phone_number: String,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub message: String,
    pub phone_number: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckVerificationResponse {
    pub phone_number: String,
    pub verified: bool,
}
