//! Stored value sum type

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value held by a store
///
/// Values keep their shape across backends: an integer written with
/// [`Value::Int64`] reads back as an integer, not as its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 text
    String(String),
    /// Signed 64-bit integer (the shape counters are stored in)
    Int64(i64),
    /// 64-bit float
    Float64(f64),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Arbitrary structured data
    Structured(serde_json::Value),
}

impl Value {
    /// Serialize any value into the structured variant
    pub fn structured<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Structured(serde_json::to_value(value)?))
    }

    /// Name of the variant, used in logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::Bytes(_) => "bytes",
            Self::Structured(_) => "structured",
        }
    }

    /// True for the two numeric variants
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64(_) | Self::Float64(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float64(x) => write!(f, "{x}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Structured(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int64(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int64(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}
