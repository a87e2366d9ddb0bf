//! End-to-end properties of the OTP engine through the public API

use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use otp_core::{
    generate_code, normalize, Clock, CodeGenerator, InMemoryOtpStore, ManualClock, OtpError,
    OtpPolicy, OtpStore, SecureCodeGenerator,
};

fn store_with_clock() -> (InMemoryOtpStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = InMemoryOtpStore::with_parts(
        OtpPolicy::default(),
        clock.clone(),
        Arc::new(SecureCodeGenerator::default()),
    );
    (store, clock)
}

#[test]
fn normalization_examples() {
    assert_eq!(normalize("John@Example.com "), "john@example.com");
    assert_eq!(normalize("+1 (415) 555-0123"), "14155550123");
}

#[test]
fn generated_codes_are_six_digits() {
    let generator = SecureCodeGenerator::default();
    let codes: HashSet<String> = (0..20).map(|_| generator.generate().unwrap()).collect();
    for code in &codes {
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
    }
    assert_eq!(generate_code().unwrap().len(), 6);
}

#[test]
fn only_latest_code_is_accepted() {
    let (store, clock) = store_with_clock();

    let first = store.create_session("+1 (415) 555-0123", None, None).unwrap();
    clock.advance(Duration::seconds(5));
    let second = store.create_session("14155550123", None, None).unwrap();

    if first.code != second.code {
        assert!(matches!(
            store.verify_session("14155550123", &first.code),
            Err(OtpError::CodeMismatch { .. })
        ));
    }
    assert!(store.verify_session("14155550123", &second.code).is_ok());
}

#[test]
fn full_lifecycle_with_aliases() {
    let (store, clock) = store_with_clock();

    let created = store
        .create_session(
            "+1 (415) 555-0123",
            Some("John@Example.com "),
            Some("+1 (415) 555-0123"),
        )
        .unwrap();
    assert_eq!(created.canonical_key, "14155550123");
    assert_eq!(created.expires_at - clock.now(), Duration::minutes(10));

    assert!(store.verify_session("john@example.com", &created.code).is_ok());
    assert_eq!(
        store.verify_session("14155550123", &created.code),
        Err(OtpError::AlreadyVerified)
    );
    assert!(store.is_verified("+1 415 555 0123"));

    // Verified sessions still expire
    clock.advance(Duration::minutes(11));
    let report = store.cleanup();
    assert_eq!(report.sessions_removed, 1);
    assert!(!store.is_verified("14155550123"));
    assert!(store.cleanup().is_empty());
}

#[test]
fn rate_limit_recovers_after_window() {
    let (store, clock) = store_with_clock();

    for _ in 0..5 {
        store.create_session("user@example.com", None, None).unwrap();
    }
    match store.create_session("user@example.com", None, None) {
        Err(err @ OtpError::RateLimitExceeded { .. }) => {
            assert!(err.retry_after_seconds().unwrap() > 0);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }

    clock.advance(Duration::seconds(61));
    assert!(store.create_session("user@example.com", None, None).is_ok());
}
