//! Encoder Port
//!
//! Pluggable value serialization for backends that store bytes.

use crate::error::Result;
use crate::value_objects::Value;

/// Converts values to and from their stored byte form
pub trait Encoder: Send + Sync + std::fmt::Debug {
    /// Short format name (e.g. "json", "msgpack")
    fn name(&self) -> &'static str;

    /// Encode a value
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decode bytes produced by [`Encoder::encode`]
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}
