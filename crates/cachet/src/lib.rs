//! # cachet
//!
//! A backend-agnostic caching client. One store contract over an
//! in-process map, Redis and Memcached, with three features layered on top
//! that work identically on every backend:
//!
//! - **Tagged caches**: group entries under tags and invalidate a whole
//!   group by rotating its tags' version tokens.
//! - **Locks**: single-owner exclusion with `get` and `block` call patterns.
//! - **Rate limiting**: fixed-window counters built from plain store calls.
//!
//! ## Example
//!
//! ```ignore
//! use cachet::{Store, Ttl, Value};
//! use std::time::Duration;
//!
//! let cache = cachet::connect().await?;
//! cache.put("answer", Value::from(42), Ttl::secs(60)).await?;
//! assert_eq!(cache.get_int64("answer").await?, 42);
//!
//! let users = cache.tags(["users"]);
//! users.forever("alice", Value::from("admin")).await?;
//! users.flush_tags().await?;
//!
//! let lock = cache.lock("reindex", cachet::Lock::new_owner(), Duration::from_secs(10));
//! let outcome = lock.get(|| async { Ok(()) }).await;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value model, error taxonomy and the store ports
//! - `application` - tags, locks, rate limiter and the `Cache` handle
//! - `providers` - backend adapters and encoders
//! - `infrastructure` - configuration, logging and the store factory

/// Domain layer - value model, errors and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use cachet_domain::*;
}

/// Application layer - features built on the store contract
pub mod application {
    pub use cachet_application::*;
}

/// Backend adapters and encoders
pub mod providers {
    pub use cachet_providers::*;
}

/// Infrastructure layer - config, logging and store construction
pub mod infrastructure {
    pub use cachet_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::*;

pub use application::{Cache, Lock, LockOutcome, RateLimiter, TagSet, TaggedCache, ThrottleResponse};
pub use infrastructure::config::{AppConfig, BackendConfig, BackendKind, StoreConfig};
pub use infrastructure::{ConfigLoader, StoreFactory, StoreOptions};

/// Connect using the configuration found by [`ConfigLoader`]
///
/// Reads defaults, then `cachet.toml` if one is discovered, then
/// `CACHET_*` environment variables.
pub async fn connect() -> Result<Cache> {
    let config = ConfigLoader::new().load()?;
    connect_with(&config).await
}

/// Connect using an already loaded configuration
pub async fn connect_with(config: &AppConfig) -> Result<Cache> {
    infrastructure::config::loader::validate_app_config(config)?;
    StoreFactory::cache(&config.store).await
}
