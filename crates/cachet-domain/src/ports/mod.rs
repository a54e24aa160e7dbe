//! Domain Port Interfaces
//!
//! Contracts implemented by backend adapters and consumed by the
//! backend-independent core.
//!
//! ## Organization
//!
//! - **store** - The key/value capability set every backend provides
//! - **lock** - Per-backend atomic lock acquire/release
//! - **list** - Optional server-side list capability
//! - **encoder** - Pluggable value serialization

/// Pluggable value serialization
pub mod encoder;
/// Optional server-side list capability
pub mod list;
/// Per-backend lock primitive
pub mod lock;
/// Store capability contract
pub mod store;

pub use encoder::Encoder;
pub use list::ListStore;
pub use lock::LockPrimitive;
pub use store::Store;
