// Allow collapsible_if for nested connection/closed checks
#![allow(clippy::collapsible_if)]

//! # cachet - Backend Adapters
//!
//! Concrete stores behind the `Store` port defined in `cachet-domain`, plus
//! the lock primitive each backend provides and the byte encoders used by
//! the network backends.
//!
//! ## Adapters
//!
//! | Backend | Store | Lock primitive | Lists |
//! |---------|-------|----------------|-------|
//! | In-process map | [`cache::MokaStore`] | [`lock::MemoryLock`] or [`lock::MutexLock`] | no |
//! | Redis | `cache::RedisStore` | `lock::RedisLock` | yes |
//! | Memcached | `cache::MemcachedStore` | `lock::MemcachedLock` | no |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! cachet-providers = { version = "0.1", default-features = false, features = ["cache-redis"] }
//! ```

// Re-export domain types commonly used with providers
pub use cachet_domain::error::{Error, Result};
pub use cachet_domain::{Encoder, ListStore, LockPrimitive, Store};

/// Provider-specific constants
pub mod constants;

/// Value encoders (JSON, MessagePack)
pub mod encoding;

/// Store implementations
pub mod cache;

/// Lock primitive implementations
pub mod lock;
