//! Mapping of service errors to HTTP responses

use actix_web::{
    error::JsonPayloadError, http::header, http::StatusCode, HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use otp_core::errors::{DomainError, OtpError};
use otp_shared::{ApiResponse, ErrorResponse};

fn error_response(status: StatusCode, body: ErrorResponse) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()>::error(body))
}

/// Convert a service error into an HTTP response
///
/// Rate limits map to 429 with `Retry-After`. Every state the client can
/// only leave by requesting a new code maps to 400.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { message } => {
            tracing::debug!(event = "request_rejected", %message, "Validation error");
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("validation_error", message),
            )
        }
        DomainError::Otp(otp_error) => {
            if otp_error.requires_new_code() {
                tracing::debug!(
                    event = "otp_new_code_required",
                    error = %otp_error,
                    "Client must request a new code"
                );
            }
            handle_otp_error(otp_error)
        }
    }
}

fn handle_otp_error(error: OtpError) -> HttpResponse {
    match error {
        OtpError::RateLimitExceeded { .. } => {
            let seconds = error.retry_after_seconds().unwrap_or(1);
            HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, seconds.to_string()))
                .json(ApiResponse::<()>::error(
                    ErrorResponse::new(
                        "rate_limit_exceeded",
                        format!(
                            "Too many OTP requests. Please try again in {} seconds",
                            seconds
                        ),
                    )
                    .with_retry_after(seconds),
                ))
        }
        OtpError::CodeMismatch { remaining_attempts } => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                "invalid_code",
                format!(
                    "Invalid OTP code. {} attempt(s) remaining",
                    remaining_attempts
                ),
            )
            .with_remaining_attempts(remaining_attempts),
        ),
        OtpError::SessionNotFound => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                "otp_not_found",
                "No OTP found for this identifier. Please request a new code",
            ),
        ),
        OtpError::SessionExpired => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("otp_expired", "OTP has expired. Please request a new code"),
        ),
        OtpError::AttemptsExhausted => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                "attempts_exhausted",
                "Maximum verification attempts exceeded. Please request a new code",
            )
            .with_remaining_attempts(0),
        ),
        OtpError::AlreadyVerified => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                "already_verified",
                "This contact is already verified. Please request a new code to verify again",
            ),
        ),
        OtpError::RandomSourceFailure { message } => {
            tracing::error!(event = "random_source_failure", %message, "Code generation failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("internal_error", "An internal error occurred"),
            )
        }
    }
}

/// 400 response listing the fields that failed validation
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();

    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(
            "validation_error",
            format!("Invalid request fields: {}", fields.join(", ")),
        ),
    )
}

/// Error handler for malformed JSON bodies
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("invalid_request", message),
    );
    actix_web::error::InternalError::from_response(err, response).into()
}
