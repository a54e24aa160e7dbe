//! Batch write request

use super::ttl::Ttl;
use super::value::Value;

/// One (key, value, lifetime) triple of a batch write
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Logical key
    pub key: String,
    /// Value to store
    pub value: Value,
    /// Lifetime of the stored value
    pub ttl: Ttl,
}

impl Entry {
    /// Create a new entry
    pub fn new<K: Into<String>, V: Into<Value>, T: Into<Ttl>>(key: K, value: V, ttl: T) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl: ttl.into(),
        }
    }

    /// Create an entry that never expires
    pub fn forever<K: Into<String>, V: Into<Value>>(key: K, value: V) -> Self {
        Self::new(key, value, Ttl::Forever)
    }

    /// Same value and lifetime under another key
    pub fn with_key<K: Into<String>>(self, key: K) -> Self {
        Self {
            key: key.into(),
            ..self
        }
    }
}
