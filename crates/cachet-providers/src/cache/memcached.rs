//! Memcached store
//!
//! Distributed store over the memcached text protocol.
//!
//! Memcached differs from the other backends in a few places:
//!
//! - Relative expiries above 30 days are interpreted by the server as unix
//!   timestamps, so longer TTLs are sent as absolute times.
//! - Counters are unsigned: decrementing below zero stops at zero.
//! - There are no server-side lists, so tagged entries written with
//!   `forever` are only invalidated by tag rotation, never deleted.

use super::codec::WireCodec;
use super::redact_url;
use crate::constants::MEMCACHED_DEFAULT_URL;
use crate::encoding::JsonEncoder;
use crate::lock::MemcachedLock;
use async_memcached::{Client, Status};
use async_trait::async_trait;
use cachet_domain::constants::MEMCACHED_MAX_RELATIVE_TTL_SECS;
use cachet_domain::error::{Error, Result};
use cachet_domain::{Encoder, Item, LockPrimitive, Store, Ttl, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, info};

/// Construction options for [`MemcachedStore`]
#[derive(Debug, Clone)]
pub struct MemcachedStoreOptions {
    /// Server address, e.g. `tcp://127.0.0.1:11211`
    pub url: String,
    /// Key prefix for tag key derivation
    pub prefix: String,
    /// Encoder for non-numeric values
    pub encoder: Arc<dyn Encoder>,
}

impl MemcachedStoreOptions {
    /// Options for the given URL with the JSON encoder and no prefix
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for MemcachedStoreOptions {
    fn default() -> Self {
        Self {
            url: MEMCACHED_DEFAULT_URL.to_string(),
            prefix: String::new(),
            encoder: Arc::new(JsonEncoder),
        }
    }
}

/// Memcached client shared by the store and its lock, emptied on close
pub(crate) struct MemcachedConnection {
    client: Mutex<Option<Client>>,
}

impl MemcachedConnection {
    /// Exclusive access to the client for one command
    pub(crate) async fn client(&self) -> Result<MappedMutexGuard<'_, Client>> {
        let guard = self.client.lock().await;
        MutexGuard::try_map(guard, Option::as_mut).map_err(|_| Error::store_closed("memcached"))
    }

    async fn close(&self) -> bool {
        self.client.lock().await.take().is_some()
    }
}

/// True when memcached reported the key as absent
pub(crate) fn is_not_found(error: &async_memcached::Error) -> bool {
    matches!(error, async_memcached::Error::Protocol(Status::NotFound))
}

/// True when a conditional write was refused
pub(crate) fn is_not_stored(error: &async_memcached::Error) -> bool {
    matches!(error, async_memcached::Error::Protocol(Status::NotStored))
}

/// Map a memcached failure onto the error taxonomy
pub(crate) fn memcached_error(command: &str, key: &str, error: async_memcached::Error) -> Error {
    let message = error.to_string();
    if message.contains("non-numeric") || message.contains("invalid numeric") {
        return Error::invalid_numeric(key, message);
    }
    Error::backend_with_source(format!("Memcached {command} failed for {key}"), error)
}

/// Translate a TTL into memcached's expiry argument
///
/// Zero means no expiry. Relative values beyond 30 days are sent as absolute
/// unix timestamps.
pub fn expiry_arg(ttl: Ttl) -> i64 {
    let Some(secs) = ttl.as_secs_ceil() else {
        return 0;
    };
    let secs = if secs > MEMCACHED_MAX_RELATIVE_TTL_SECS {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        now.saturating_add(secs)
    } else {
        secs
    };
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Memcached-backed store
#[derive(Clone)]
pub struct MemcachedStore {
    connection: Arc<MemcachedConnection>,
    codec: WireCodec,
    prefix: String,
    lock: Arc<MemcachedLock>,
}

impl MemcachedStore {
    /// Connect to the server
    pub async fn connect(options: MemcachedStoreOptions) -> Result<Self> {
        let client = Client::new(&options.url).await.map_err(|e| {
            Error::backend_with_source(
                format!("Failed to connect to memcached at {}", redact_url(&options.url)),
                e,
            )
        })?;

        info!(url = %redact_url(&options.url), encoder = options.encoder.name(), "Memcached store connected");

        let connection = Arc::new(MemcachedConnection {
            client: Mutex::new(Some(client)),
        });

        Ok(Self {
            lock: Arc::new(MemcachedLock::new(Arc::clone(&connection))),
            connection,
            codec: WireCodec::new(options.encoder),
            prefix: options.prefix,
        })
    }

    /// Ask the server for its version
    pub async fn health_check(&self) -> Result<bool> {
        let mut client = self.connection.client().await?;
        match client.version().await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!(error = %e, "Memcached health check failed");
                Ok(false)
            }
        }
    }

    async fn add_raw(&self, key: &str, payload: &[u8], ttl: Ttl) -> Result<bool> {
        let mut client = self.connection.client().await?;
        match client.add(key, payload, Some(expiry_arg(ttl)), None).await {
            Ok(()) => Ok(true),
            Err(e) if is_not_stored(&e) => Ok(false),
            Err(e) => Err(memcached_error("ADD", key, e)),
        }
    }

    /// Apply a delta to an existing counter; `None` when the key is absent
    async fn apply_delta(&self, key: &str, delta: i64) -> Result<Option<i64>> {
        let mut client = self.connection.client().await?;
        let amount = delta.unsigned_abs();
        let applied = if delta >= 0 {
            client.increment(key, amount).await
        } else {
            client.decrement(key, amount).await
        };
        match applied {
            Ok(value) => Ok(Some(i64::try_from(value).unwrap_or(i64::MAX))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(memcached_error("INCR", key, e)),
        }
    }
}

#[async_trait]
impl Store for MemcachedStore {
    fn provider_name(&self) -> &str {
        "memcached"
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn get(&self, key: &str) -> Result<Item> {
        let mut client = self.connection.client().await?;
        let found = client
            .get(key)
            .await
            .map_err(|e| memcached_error("GET", key, e))?;

        match found {
            Some(value) => {
                debug!(key = key, "Cache HIT (memcached)");
                Ok(Item::found(key, self.codec.decode(&value.data)?))
            }
            None => {
                debug!(key = key, "Cache MISS (memcached)");
                Err(Error::not_found(key))
            }
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        let payload = self.codec.encode(&value)?;
        let expiry = expiry_arg(ttl);
        let mut client = self.connection.client().await?;
        client
            .set(key, payload.as_slice(), Some(expiry), None)
            .await
            .map_err(|e| memcached_error("SET", key, e))?;
        debug!(key = key, expiry = expiry, "Cache SET (memcached)");
        Ok(())
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        let payload = self.codec.encode(&value)?;
        self.add_raw(key, &payload, ttl).await
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        if let Some(value) = self.apply_delta(key, delta).await? {
            return Ok(value);
        }

        // Missing counter: create it, unless another client got there first
        let initial = delta.max(0);
        if self
            .add_raw(key, initial.to_string().as_bytes(), Ttl::Forever)
            .await?
        {
            return Ok(initial);
        }
        self.apply_delta(key, delta)
            .await?
            .ok_or_else(|| Error::not_found(key))
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        let mut client = self.connection.client().await?;
        let existed = match client.delete(key).await {
            Ok(()) => true,
            Err(e) if is_not_found(&e) => false,
            Err(e) => return Err(memcached_error("DELETE", key, e)),
        };
        debug!(key = key, existed = existed, "Cache DEL (memcached)");
        Ok(existed)
    }

    async fn flush(&self) -> Result<()> {
        let mut client = self.connection.client().await?;
        client
            .flush_all()
            .await
            .map_err(|e| memcached_error("FLUSH_ALL", "*", e))?;
        info!("Memcached flushed");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.connection.close().await {
            info!("Memcached store closed");
        }
        Ok(())
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        Arc::clone(&self.lock) as Arc<dyn LockPrimitive>
    }
}

impl std::fmt::Debug for MemcachedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcachedStore")
            .field("client", &"Client")
            .field("encoder", &self.codec.encoder_name())
            .field("prefix", &self.prefix)
            .finish()
    }
}
