//! Store Port
//!
//! The minimal capability set every backend adapter implements. The tag
//! layer, the rate limiter and the lock orchestration only ever talk to a
//! backend through this trait, which keeps them backend-independent.
//!
//! ## Semantics
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | `get` | [`Error::NotFound`] when absent |
//! | `get_int64` / `get_float64` | [`Error::InvalidNumeric`] when present but not numeric |
//! | `put` | Upsert; [`Ttl::Forever`] never expires |
//! | `add` | Create only if absent; `true` when this call created it |
//! | `increment` | Atomic where the backend allows; a missing key counts from zero |
//! | `forget` | Idempotent; `true` when a key was present |
//! | `flush` | Clears the whole backend namespace, not just a prefix |
//! | `many` / `put_many` | First failing key aborts; no partial rollback |

use super::list::ListStore;
use super::lock::LockPrimitive;
use crate::error::{Error, Result};
use crate::value_objects::{Entry, Item, Ttl, Value};
use async_trait::async_trait;
use std::sync::Arc;

/// Store Port
///
/// A handle to one backend instance. Implementations own their connection
/// and are safe to share between tasks behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use cachet_domain::{Store, Ttl, Value};
/// use std::time::Duration;
///
/// store.put("x", Value::from(100), Ttl::from(Duration::from_secs(1))).await?;
/// assert_eq!(store.get_int64("x").await?, 100);
/// ```
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Get the name/identifier of this backend (e.g. "memory", "redis", "memcached")
    fn provider_name(&self) -> &str;

    /// Key prefix used when deriving tagged-item and forever-index keys
    fn prefix(&self) -> &str {
        ""
    }

    /// Read one key
    async fn get(&self, key: &str) -> Result<Item>;

    /// Read one key as text
    async fn get_string(&self, key: &str) -> Result<String> {
        self.get(key).await?.as_string()
    }

    /// Read one key as a signed integer
    async fn get_int64(&self, key: &str) -> Result<i64> {
        self.get(key).await?.as_int64()
    }

    /// Read one key as a float
    async fn get_float64(&self, key: &str) -> Result<f64> {
        self.get(key).await?.as_float64()
    }

    /// Check if a key exists
    async fn has(&self, key: &str) -> Result<bool> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write a value, overwriting any previous one
    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()>;

    /// Write a value that never expires
    async fn forever(&self, key: &str, value: Value) -> Result<()> {
        self.put(key, value, Ttl::Forever).await
    }

    /// Write a value only if the key is absent
    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool>;

    /// Add `delta` to an integer value and return the new value
    async fn increment(&self, key: &str, delta: i64) -> Result<i64>;

    /// Subtract `delta` from an integer value and return the new value
    async fn decrement(&self, key: &str, delta: i64) -> Result<i64> {
        self.increment(key, delta.saturating_neg()).await
    }

    /// Delete a key
    async fn forget(&self, key: &str) -> Result<bool>;

    /// Remove every entry of the backend
    async fn flush(&self) -> Result<()>;

    /// Read several keys; absent keys yield missing items, in input order
    async fn many(&self, keys: &[String]) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            match self.get(key).await {
                Ok(item) => items.push(item),
                Err(Error::NotFound { .. }) => items.push(Item::missing(key.as_str())),
                Err(e) => return Err(e),
            }
        }
        Ok(items)
    }

    /// Write several entries
    async fn put_many(&self, entries: Vec<Entry>) -> Result<()> {
        for entry in entries {
            self.put(&entry.key, entry.value, entry.ttl).await?;
        }
        Ok(())
    }

    /// Release the backend connection; later calls fail with [`Error::StoreClosed`]
    async fn close(&self) -> Result<()>;

    /// The backend's atomic acquire/release pair used by locks
    fn lock_primitive(&self) -> Arc<dyn LockPrimitive>;

    /// Server-side list support, when the backend has it
    ///
    /// Backends that cannot reclaim untimed entries on their own expose
    /// this so tag flushes can delete forever entries explicitly.
    fn as_list_store(&self) -> Option<&dyn ListStore> {
        None
    }
}
