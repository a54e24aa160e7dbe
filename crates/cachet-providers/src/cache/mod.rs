//! Store Implementations
//!
//! ## Available Stores
//!
//! | Store | Type | Description |
//! |-------|------|-------------|
//! | [`MokaStore`] | Local | In-process map with per-entry expiry |
//! | [`RedisStore`] | Distributed | Redis, atomic counters and server-side lists |
//! | [`MemcachedStore`] | Distributed | Memcached text protocol |
//!
//! ## Selection Guide
//!
//! - **Tests and single instances**: `MokaStore`
//! - **Several processes sharing state**: `RedisStore` or `MemcachedStore`
//! - **Tagged entries written with `forever`**: prefer `RedisStore`, the only
//!   backend that can delete them explicitly on a tag flush

pub mod codec;
#[cfg(feature = "cache-memcached")]
pub mod memcached;
#[cfg(feature = "cache-moka")]
pub mod moka;
#[cfg(feature = "cache-redis")]
pub mod redis;

pub use codec::WireCodec;
#[cfg(feature = "cache-memcached")]
pub use memcached::{MemcachedStore, MemcachedStoreOptions};
#[cfg(feature = "cache-moka")]
pub use moka::{MokaStore, MokaStoreOptions};
#[cfg(feature = "cache-redis")]
pub use redis::{RedisStore, RedisStoreOptions};

/// Strip credentials from a connection URL before logging it
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
