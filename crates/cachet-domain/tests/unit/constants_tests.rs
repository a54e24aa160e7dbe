//! Unit tests for persisted key layouts

use cachet_domain::constants::{forever_key, rate_limit_timer_key, tag_key};

#[test]
fn test_tag_key_layout() {
    assert_eq!(tag_key("users"), "tag:users:key");
}

#[test]
fn test_forever_key_layout() {
    assert_eq!(forever_key("app:", "abc123"), "app:abc123:forever");
    assert_eq!(forever_key("", "abc123"), "abc123:forever");
}

#[test]
fn test_rate_limit_timer_key_layout() {
    assert_eq!(rate_limit_timer_key("login:42"), "login:42:timer");
}
