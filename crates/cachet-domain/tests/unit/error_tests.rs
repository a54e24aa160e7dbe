//! Unit tests for domain error types

use cachet_domain::Error;
use std::time::Duration;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("user:1");
    match &error {
        Error::NotFound { key } => assert_eq!(key, "user:1"),
        _ => panic!("Expected NotFound error"),
    }
    assert!(error.is_not_found());
    assert!(!error.is_lock_timeout());
}

#[test]
fn test_lock_timeout_is_distinct_from_backend_error() {
    let timeout = Error::lock_wait_timeout("jobs", Duration::from_millis(500));
    let backend = Error::backend("connection reset");

    assert!(timeout.is_lock_timeout());
    assert!(!backend.is_lock_timeout());
    assert!(format!("{timeout}").contains("jobs"));
}

#[test]
fn test_invalid_numeric_error() {
    let error = Error::invalid_numeric("counter", "abc");
    assert!(error.is_invalid_numeric());
    assert_eq!(format!("{error}"), "Invalid numeric value for counter: abc");
}

#[test]
fn test_not_implemented_error() {
    let error = Error::not_implemented("list_push", "memcached");
    assert!(error.is_not_implemented());
    assert!(format!("{error}").contains("memcached"));
}

#[test]
fn test_backend_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = Error::backend_with_source("Redis GET failed", io);
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_aggregate_joins_messages() {
    let error = Error::aggregate(vec![
        Error::backend("action failed"),
        Error::backend("release failed"),
    ]);
    let display = format!("{error}");
    assert!(display.contains("action failed"));
    assert!(display.contains("release failed"));
}

#[test]
fn test_aggregate_of_one_is_unwrapped() {
    let error = Error::aggregate(vec![Error::not_found("k")]);
    assert!(error.is_not_found());
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Serialization { .. }));
}
