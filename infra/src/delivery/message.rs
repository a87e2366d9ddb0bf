//! Message texts for delivered codes

/// SMS body carrying the code
pub fn sms_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Your verification code is: {}. Valid for {} minutes.",
        code, ttl_minutes
    )
}

pub fn email_subject() -> &'static str {
    "Your Verification Code"
}

/// Plain-text email body carrying the code
pub fn email_text_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Hello,\n\n\
         Your verification code is: {}\n\n\
         This code will expire in {} minutes.\n\n\
         If you did not request this code, please ignore this email.\n",
        code, ttl_minutes
    )
}
