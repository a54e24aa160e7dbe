//! Value Encoders
//!
//! Byte encodings for backends that store opaque payloads.
//!
//! ## Available Encoders
//!
//! | Encoder | Format | Notes |
//! |---------|--------|-------|
//! | [`JsonEncoder`] | JSON | Human-readable, interoperable |
//! | [`MessagePackEncoder`] | MessagePack | Compact binary |

pub mod json;
pub mod msgpack;

pub use json::JsonEncoder;
pub use msgpack::MessagePackEncoder;

use cachet_domain::Encoder;
use std::sync::Arc;

/// Look up an encoder by its format name
pub fn encoder_by_name(name: &str) -> Option<Arc<dyn Encoder>> {
    match name {
        "json" => Some(Arc::new(JsonEncoder)),
        "msgpack" | "messagepack" => Some(Arc::new(MessagePackEncoder)),
        _ => None,
    }
}
