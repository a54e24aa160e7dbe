//! Wire codec for network backends
//!
//! Numbers are written as plain decimal text so the server's own
//! increment commands work on them and reads come back numeric. Every other
//! value goes through the configured [`Encoder`].

use cachet_domain::error::Result;
use cachet_domain::{Encoder, Value};
use std::sync::Arc;

/// Value <-> bytes translation used by the Redis and Memcached stores
#[derive(Debug, Clone)]
pub struct WireCodec {
    encoder: Arc<dyn Encoder>,
}

impl WireCodec {
    /// Create a codec around an encoder
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Name of the wrapped encoder
    pub fn encoder_name(&self) -> &'static str {
        self.encoder.name()
    }

    /// Encode a value for storage
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Int64(i) => Ok(i.to_string().into_bytes()),
            // `{:?}` keeps a trailing ".0" so whole floats don't read back as integers
            Value::Float64(x) if x.is_finite() => Ok(format!("{x:?}").into_bytes()),
            other => self.encoder.encode(other),
        }
    }

    /// Decode bytes read from storage
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        if let Some(number) = parse_number(bytes) {
            return Ok(number);
        }
        self.encoder.decode(bytes)
    }
}

fn parse_number(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() || bytes.len() > 32 {
        return None;
    }
    let first = bytes[0];
    if !(first == b'-' || first.is_ascii_digit()) {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Int64(i));
    }
    if text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
    {
        return text.parse::<f64>().ok().map(Value::Float64);
    }
    None
}
