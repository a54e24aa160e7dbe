//! Value Objects
//!
//! Immutable types exchanged across the store contract.

/// Batch write request
pub mod entry;
/// Lazily-typed read result
pub mod item;
/// Entry lifetime sentinel
pub mod ttl;
/// Stored value sum type
pub mod value;

pub use entry::Entry;
pub use item::Item;
pub use ttl::Ttl;
pub use value::Value;
