use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_shared::ApiResponse;

use super::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/otp/send
///
/// At least one of `phone_number` and `email` is required. The phone number
/// is the primary identifier when both are given, and the code goes out on
/// every channel provided.
///
/// # Request Body
///
/// ```json
/// { "phone_number": "+1 (415) 555-0123", "email": "john@example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "message": "OTP sent successfully",
///         "phone_number": "14155550123",
///         "expires_in_minutes": 10
///     },
///     "timestamp": "2025-08-14T10:00:00Z"
/// }
/// ```
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .otp_service
        .send_code(request.phone_number.as_deref(), request.email.as_deref())
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success(SendOtpResponse {
            message: "OTP sent successfully".to_string(),
            phone_number: result.canonical_key,
            expires_in_minutes: result.expires_in_minutes,
        })),
        Err(e) => handle_domain_error(e),
    }
}
