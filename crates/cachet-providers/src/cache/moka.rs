//! In-process map store using Moka
//!
//! High-performance concurrent in-memory store with per-entry expiry.
//!
//! ## Features
//!
//! - Per-entry TTL through a Moka [`Expiry`] policy
//! - Atomic `add` and `increment` through Moka's entry API
//! - Optional background sweep that evicts expired entries on an interval
//!
//! **Important**: state lives in this process only. Locks taken through
//! this store exclude other tasks of the same process, nothing more.
//!
//! ## Example
//!
//! ```ignore
//! use cachet_providers::cache::{MokaStore, MokaStoreOptions};
//!
//! let store = MokaStore::new(MokaStoreOptions::default());
//! ```

use crate::constants::{MEMORY_DEFAULT_MAX_CAPACITY, MEMORY_DEFAULT_SWEEP_INTERVAL};
use crate::lock::{MemoryLock, MemoryLockKind, MutexLock};
use async_trait::async_trait;
use cachet_domain::error::{Error, Result};
use cachet_domain::{Item, LockPrimitive, Store, Ttl, Value};
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How an entry's expiry changes when it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expiration {
    Never,
    After(Duration),
    /// Keep whatever expiry the entry already had (counter updates)
    Keep,
}

impl From<Ttl> for Expiration {
    fn from(ttl: Ttl) -> Self {
        match ttl {
            Ttl::Forever => Self::Never,
            Ttl::After(d) => Self::After(d),
        }
    }
}

/// Value plus its expiry policy as stored in the map
#[derive(Debug, Clone)]
pub(crate) struct MemoryEntry {
    pub(crate) value: Value,
    pub(crate) expiration: Expiration,
}

impl MemoryEntry {
    pub(crate) fn new(value: Value, ttl: Ttl) -> Self {
        Self {
            value,
            expiration: ttl.into(),
        }
    }
}

struct EntryExpiry;

impl Expiry<String, MemoryEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        match value.expiration {
            Expiration::After(d) => Some(d),
            Expiration::Never | Expiration::Keep => None,
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        match value.expiration {
            Expiration::After(d) => Some(d),
            Expiration::Never => None,
            Expiration::Keep => duration_until_expiry,
        }
    }
}

/// Construction options for [`MokaStore`]
#[derive(Debug, Clone)]
pub struct MokaStoreOptions {
    /// Maximum number of entries before size-based eviction
    pub max_capacity: u64,
    /// Interval of the background expiry sweep; `None` disables it
    pub sweep_interval: Option<Duration>,
    /// Which lock primitive [`Store::lock_primitive`] hands out
    pub lock: MemoryLockKind,
    /// Key prefix for tag key derivation
    pub prefix: String,
}

impl Default for MokaStoreOptions {
    fn default() -> Self {
        Self {
            max_capacity: MEMORY_DEFAULT_MAX_CAPACITY,
            sweep_interval: Some(MEMORY_DEFAULT_SWEEP_INTERVAL),
            lock: MemoryLockKind::default(),
            prefix: String::new(),
        }
    }
}

/// In-process store backed by a Moka cache
#[derive(Clone)]
pub struct MokaStore {
    cache: Cache<String, MemoryEntry>,
    options: MokaStoreOptions,
    lock: Arc<dyn LockPrimitive>,
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
    closed: Arc<AtomicBool>,
}

impl Default for MokaStore {
    fn default() -> Self {
        Self::new(MokaStoreOptions::default())
    }
}

impl MokaStore {
    /// Create a new store
    ///
    /// The sweep task is only started when called from inside a Tokio runtime.
    pub fn new(options: MokaStoreOptions) -> Self {
        let cache: Cache<String, MemoryEntry> = Cache::builder()
            .max_capacity(options.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        let lock: Arc<dyn LockPrimitive> = match options.lock {
            MemoryLockKind::Map => Arc::new(MemoryLock::new(cache.clone())),
            MemoryLockKind::Mutex => Arc::new(MutexLock::new()),
        };

        let sweeper = options
            .sweep_interval
            .and_then(|interval| spawn_sweeper(cache.clone(), interval));

        debug!(
            max_capacity = options.max_capacity,
            lock = ?options.lock,
            sweeping = sweeper.is_some(),
            "Moka in-memory store created"
        );

        Self {
            cache,
            options,
            lock,
            sweeper: Arc::new(Mutex::new(sweeper)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a store with the given capacity and default options otherwise
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::new(MokaStoreOptions {
            max_capacity,
            ..MokaStoreOptions::default()
        })
    }

    /// Get the maximum capacity of the store
    pub fn max_capacity(&self) -> u64 {
        self.options.max_capacity
    }

    /// Approximate number of live entries
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::store_closed("memory"));
        }
        Ok(())
    }
}

fn spawn_sweeper(cache: Cache<String, MemoryEntry>, interval: Duration) -> Option<JoinHandle<()>> {
    let runtime = tokio::runtime::Handle::try_current().ok()?;
    Some(runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.run_pending_tasks().await;
        }
    }))
}

#[async_trait]
impl Store for MokaStore {
    fn provider_name(&self) -> &str {
        "memory"
    }

    fn prefix(&self) -> &str {
        &self.options.prefix
    }

    async fn get(&self, key: &str) -> Result<Item> {
        self.ensure_open()?;
        match self.cache.get(key).await {
            Some(entry) => {
                debug!(key = key, "Cache HIT (memory)");
                Ok(Item::found(key, entry.value))
            }
            None => {
                debug!(key = key, "Cache MISS (memory)");
                Err(Error::not_found(key))
            }
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.ensure_open()?;
        self.cache
            .insert(key.to_string(), MemoryEntry::new(value, ttl))
            .await;
        debug!(key = key, ttl = ?ttl, "Cache SET (memory)");
        Ok(())
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        self.ensure_open()?;
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async move { MemoryEntry::new(value, ttl) })
            .await;
        Ok(entry.is_fresh())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.ensure_open()?;
        let owned_key = key.to_string();
        let outcome = self
            .cache
            .entry(key.to_string())
            .and_try_compute_with(move |existing| async move {
                let (current, expiration) = match existing {
                    Some(entry) => {
                        let stored = entry.into_value();
                        let current = Item::found(owned_key.as_str(), stored.value).as_int64()?;
                        (current, Expiration::Keep)
                    }
                    None => (0, Expiration::Never),
                };
                let next = current
                    .checked_add(delta)
                    .ok_or_else(|| Error::invalid_numeric(&owned_key, "increment overflows i64"))?;
                Ok::<_, Error>(Op::Put(MemoryEntry {
                    value: Value::Int64(next),
                    expiration,
                }))
            })
            .await?;

        match outcome {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                Item::found(key, entry.into_value().value).as_int64()
            }
            other => Err(Error::backend(format!(
                "Unexpected increment outcome for {key}: {other:?}"
            ))),
        }
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        self.ensure_open()?;
        let existed = self.cache.remove(key).await.is_some();
        debug!(key = key, existed = existed, "Cache DEL (memory)");
        Ok(existed)
    }

    async fn flush(&self) -> Result<()> {
        self.ensure_open()?;
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        info!("Memory store flushed");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Ok(mut sweeper) = self.sweeper.lock() {
            if let Some(handle) = sweeper.take() {
                handle.abort();
            }
        }
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        info!("Memory store closed");
        Ok(())
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        Arc::clone(&self.lock)
    }
}

impl std::fmt::Debug for MokaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStore")
            .field("max_capacity", &self.options.max_capacity)
            .field("entry_count", &self.cache.entry_count())
            .field("lock", &self.options.lock)
            .finish()
    }
}
