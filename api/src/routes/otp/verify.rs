use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_shared::ApiResponse;

use super::AppState;
use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/otp/verify
///
/// A mismatch answers 400 with `remaining_attempts`. Not-found, expired,
/// exhausted and already-verified sessions answer 400 asking for a new code.
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .otp_service
        .verify_code(
            request.phone_number.as_deref(),
            request.email.as_deref(),
            &request.otp_code,
        )
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success(VerifyOtpResponse {
            message: "Contact verified successfully".to_string(),
            phone_number: result.canonical_key,
            verified: result.verified,
        })),
        Err(e) => handle_domain_error(e),
    }
}
