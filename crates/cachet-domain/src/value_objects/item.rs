//! Lazily-typed accessor over one stored value
//!
//! An [`Item`] is what a read returns. It carries the key it was read for
//! and the raw value, if any. Every conversion is computed on demand and
//! fails on its own: asking for an integer from a text value that is not
//! numeric does not poison a later `as_string()` call.

use super::value::Value;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// Result of reading one key
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    key: String,
    value: Option<Value>,
}

impl Item {
    /// An item that was present in the store
    pub fn found<K: Into<String>>(key: K, value: Value) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
        }
    }

    /// An item that was absent from the store
    pub fn missing<K: Into<String>>(key: K) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// The key this item was read for
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the key was present
    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }

    /// Borrow the raw value
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The retrieval error, if the key was absent
    pub fn error(&self) -> Option<Error> {
        match self.value {
            Some(_) => None,
            None => Some(Error::not_found(&self.key)),
        }
    }

    /// Take the raw value, failing with not-found when absent
    pub fn into_value(self) -> Result<Value> {
        self.value.ok_or(Error::NotFound { key: self.key })
    }

    fn raw(&self) -> Result<&Value> {
        self.value.as_ref().ok_or_else(|| Error::not_found(&self.key))
    }

    fn invalid(&self, value: &Value) -> Error {
        let rendered: String = value.to_string().chars().take(64).collect();
        Error::invalid_numeric(&self.key, rendered)
    }

    /// Interpret the value as a signed integer
    pub fn as_int64(&self) -> Result<i64> {
        let value = self.raw()?;
        let parsed = match value {
            Value::Int64(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            Value::Float64(x) if x.fract() == 0.0 && x.is_finite() => Some(*x as i64),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Bytes(b) => std::str::from_utf8(b)
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok()),
            Value::Structured(v) => v.as_i64(),
            Value::Float64(_) => None,
        };
        parsed.ok_or_else(|| self.invalid(value))
    }

    /// Interpret the value as a float
    pub fn as_float64(&self) -> Result<f64> {
        let value = self.raw()?;
        let parsed = match value {
            #[allow(clippy::cast_precision_loss)]
            Value::Int64(i) => Some(*i as f64),
            Value::Float64(x) => Some(*x),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bytes(b) => std::str::from_utf8(b)
                .ok()
                .and_then(|s| s.trim().parse::<f64>().ok()),
            Value::Structured(v) => v.as_f64(),
        };
        parsed.ok_or_else(|| self.invalid(value))
    }

    /// Render the value as text
    pub fn as_string(&self) -> Result<String> {
        match self.raw()? {
            Value::String(s) => Ok(s.clone()),
            Value::Bytes(b) => String::from_utf8(b.clone()).map_err(|e| {
                Error::serialization_with_source(
                    format!("Value for {} is not valid UTF-8", self.key),
                    e,
                )
            }),
            other => Ok(other.to_string()),
        }
    }

    /// Raw bytes of the value; text is returned as its UTF-8 encoding
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        match self.raw()? {
            Value::Bytes(b) => Ok(b.clone()),
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            other => Ok(other.to_string().into_bytes()),
        }
    }

    /// Decode the value into a caller-chosen type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let decoded = match self.raw()? {
            Value::Structured(v) => serde_json::from_value(v.clone()),
            Value::String(s) => serde_json::from_str(s)
                .or_else(|_| serde_json::from_value(serde_json::Value::String(s.clone()))),
            Value::Bytes(b) => serde_json::from_slice(b),
            Value::Int64(i) => serde_json::from_value(serde_json::Value::from(*i)),
            Value::Float64(x) => serde_json::from_value(serde_json::Value::from(*x)),
        };
        decoded.map_err(|e| {
            Error::serialization_with_source(format!("Failed to decode value for {}", self.key), e)
        })
    }
}
