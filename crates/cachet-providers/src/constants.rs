//! Provider Constants
//!
//! Defaults specific to the backend adapters. Persisted key layouts live in
//! `cachet_domain::constants`.

use std::time::Duration;

// ============================================================================
// IN-PROCESS STORE
// ============================================================================

/// Default maximum number of entries held by the in-process store
pub const MEMORY_DEFAULT_MAX_CAPACITY: u64 = 100_000;

/// Default interval of the in-process expiry sweep
pub const MEMORY_DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// ============================================================================
// REDIS
// ============================================================================

/// Default Redis connection URL
pub const REDIS_DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Compare-and-delete used to release a Redis lock only for its owner
pub const REDIS_RELEASE_LOCK_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

// ============================================================================
// MEMCACHED
// ============================================================================

/// Default Memcached connection URL
pub const MEMCACHED_DEFAULT_URL: &str = "tcp://127.0.0.1:11211";
