//! Application factory
//!
//! Builds the Actix-web application around a shared `AppState`.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use otp_shared::{ApiResponse, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::routes::otp::{check_verification, send_otp, verify_otp, AppState};

/// Register every route and extractor config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/otp")
                    .route("/send", web::post().to(send_otp))
                    .route("/verify", web::post().to(verify_otp))
                    .route("/check", web::post().to(check_verification)),
            ),
        );
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(TracingLogger::default())
        .configure(configure)
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "otp-gate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    )))
}
