//! Lock Primitive Implementations
//!
//! Each backend's atomic acquire/release pair. The orchestration built on
//! top of them (`get`, `block`) is backend-independent and lives in the
//! application layer.
//!
//! | Primitive | Acquire | Release |
//! |-----------|---------|---------|
//! | [`MemoryLock`] | add-if-absent in the store's map | compare owner, then remove |
//! | [`MutexLock`] | insert into a guarded table | compare owner, then remove |
//! | `RedisLock` | `SET NX PX` | compare-and-delete script |
//! | `MemcachedLock` | `add` | get, compare, delete (not atomic) |

#[cfg(feature = "cache-memcached")]
pub mod memcached;
#[cfg(feature = "cache-moka")]
pub mod memory;
pub mod mutex;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-memcached")]
pub use memcached::MemcachedLock;
#[cfg(feature = "cache-moka")]
pub use memory::MemoryLock;
pub use mutex::MutexLock;
#[cfg(feature = "cache-redis")]
pub use redis::RedisLock;

use serde::{Deserialize, Serialize};

/// Lock primitive handed out by the in-process store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryLockKind {
    /// Add-if-absent on the store's own map; shares expiry with data entries
    #[default]
    Map,
    /// Separate table of held locks guarded per name
    Mutex,
}
