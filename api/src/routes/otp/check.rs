use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_shared::ApiResponse;

use super::AppState;
use crate::dto::{CheckVerificationRequest, CheckVerificationResponse};
use crate::handlers::handle_validation_errors;

/// Handler for POST /api/v1/otp/check
pub async fn check_verification(
    state: web::Data<AppState>,
    request: web::Json<CheckVerificationRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    let result = state.otp_service.check_verification(&request.phone_number);
    HttpResponse::Ok().json(ApiResponse::success(CheckVerificationResponse {
        phone_number: result.canonical_key,
        verified: result.verified,
    }))
}
