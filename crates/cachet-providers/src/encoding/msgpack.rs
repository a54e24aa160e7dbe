//! MessagePack encoder

use cachet_domain::error::{Error, Result};
use cachet_domain::{Encoder, Value};

/// Encodes values as compact MessagePack
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackEncoder;

impl Encoder for MessagePackEncoder {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        rmp_serde::to_vec(value).map_err(|e| {
            Error::serialization_with_source("Failed to encode value as MessagePack", e)
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| Error::serialization_with_source("Failed to decode MessagePack value", e))
    }
}
