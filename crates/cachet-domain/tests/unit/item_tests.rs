//! Unit tests for lazily-typed items

use cachet_domain::{Error, Item, Value};
use serde::Deserialize;

#[test]
fn test_integer_value_stays_integer() {
    let item = Item::found("x", Value::from(100));
    assert_eq!(item.as_int64().unwrap(), 100);
    assert!((item.as_float64().unwrap() - 100.0).abs() < f64::EPSILON);
    assert_eq!(item.as_string().unwrap(), "100");
}

#[test]
fn test_numeric_text_converts() {
    let item = Item::found("x", Value::from(" 42 "));
    assert_eq!(item.as_int64().unwrap(), 42);
}

#[test]
fn test_conversions_fail_independently() {
    let item = Item::found("name", Value::from("alice"));
    assert!(item.as_int64().unwrap_err().is_invalid_numeric());
    assert!(item.as_float64().unwrap_err().is_invalid_numeric());
    assert_eq!(item.as_string().unwrap(), "alice");
}

#[test]
fn test_fractional_float_is_not_an_integer() {
    let item = Item::found("ratio", Value::from(0.5));
    assert!(item.as_int64().is_err());
    assert!((item.as_float64().unwrap() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_missing_item_reports_not_found() {
    let item = Item::missing("gone");
    assert!(!item.is_found());
    assert!(matches!(item.error(), Some(Error::NotFound { .. })));
    assert!(item.as_string().unwrap_err().is_not_found());
    assert!(item.into_value().unwrap_err().is_not_found());
}

#[test]
fn test_decode_structured_value() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    let item = Item::found(
        "user",
        Value::from(serde_json::json!({ "id": 7, "name": "bob" })),
    );
    let user: User = item.decode().unwrap();
    assert_eq!(
        user,
        User {
            id: 7,
            name: "bob".to_string()
        }
    );
}

#[test]
fn test_bytes_round_trip_as_text() {
    let item = Item::found("raw", Value::from(b"hello".to_vec()));
    assert_eq!(item.as_string().unwrap(), "hello");
    assert_eq!(item.as_bytes().unwrap(), b"hello".to_vec());
}
