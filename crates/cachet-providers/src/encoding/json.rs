//! JSON encoder

use cachet_domain::error::{Error, Result};
use cachet_domain::{Encoder, Value};

/// Encodes values as JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| Error::serialization_with_source("Failed to encode value as JSON", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::serialization_with_source("Failed to decode JSON value", e))
    }
}
