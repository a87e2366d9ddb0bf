use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};
use std::sync::Arc;

use otp_api::{create_app, AppState};
use otp_core::errors::OtpResult;
use otp_core::{CodeGenerator, InMemoryOtpStore, OtpPolicy, OtpStore, SystemClock};
use otp_infra::ConsoleChannel;
use otp_shared::{AppConfig, RateLimitConfig};

/// Always issues the same code so tests can submit it
struct FixedCode(&'static str);

impl CodeGenerator for FixedCode {
    fn generate(&self) -> OtpResult<String> {
        Ok(self.0.to_string())
    }
}

fn test_state() -> AppState {
    let store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::with_parts(
        OtpPolicy::default(),
        Arc::new(SystemClock),
        Arc::new(FixedCode("123456")),
    ));
    AppState::new(
        store,
        Arc::new(ConsoleChannel::email("noreply@otpgate.local", 10)),
        Arc::new(ConsoleChannel::sms(10)),
    )
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_send_then_verify_by_phone() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "phone_number": "+1 (415) 555-0123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone_number"], "14155550123");
    assert_eq!(body["data"]["expires_in_minutes"], 10);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "phone_number": "14155550123", "otp_code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["verified"], true);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/check")
        .set_json(json!({ "phone_number": "+1 415 555 0123" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["phone_number"], "14155550123");
    assert_eq!(body["data"]["verified"], true);
}

#[actix_web::test]
async fn test_verified_contact_cannot_verify_again() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "phone_number": "+14155550123", "email": "user@example.com" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "email": "user@example.com", "otp_code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "phone_number": "+14155550123", "otp_code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "already_verified");
}

#[actix_web::test]
async fn test_send_by_email_returns_email_identifier() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "email": "John@Example.com " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["phone_number"], "john@example.com");
}

#[actix_web::test]
async fn test_send_requires_an_identifier() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");
}

#[actix_web::test]
async fn test_wrong_code_reports_remaining_attempts() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "phone_number": "+14155550123" }))
        .to_request();
    test::call_service(&app, req).await;

    for expected in [2, 1] {
        let req = test::TestRequest::post()
            .uri("/api/v1/otp/verify")
            .set_json(json!({ "phone_number": "+14155550123", "otp_code": "000000" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "invalid_code");
        assert_eq!(body["error"]["remaining_attempts"], expected);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "phone_number": "+14155550123", "otp_code": "000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "attempts_exhausted");

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "phone_number": "+14155550123", "otp_code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "otp_not_found");
}

#[actix_web::test]
async fn test_short_code_fails_validation() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/verify")
        .set_json(json!({ "phone_number": "+14155550123", "otp_code": "12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");
}

#[actix_web::test]
async fn test_rate_limit_returns_429() {
    let app = test::init_service(create_app(test_state())).await;

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/otp/send")
            .set_json(json!({ "phone_number": "+14155550123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "phone_number": "+14155550123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "rate_limit_exceeded");
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "invalid_request");
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_out_of_range_rate_limit_config_still_serves() {
    let config = AppConfig {
        rate_limit: RateLimitConfig {
            max_requests: 0,
            window_seconds: u64::MAX,
        },
        ..AppConfig::default()
    };
    let app = test::init_service(create_app(AppState::from_config(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/otp/send")
        .set_json(json!({ "phone_number": "+14155550123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["expires_in_minutes"], 10);
}
