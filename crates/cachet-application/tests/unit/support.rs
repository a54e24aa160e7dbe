//! Shared fixtures

use async_trait::async_trait;
use cachet_application::Cache;
use cachet_domain::error::Result;
use cachet_domain::{Item, ListStore, LockPrimitive, Store, Ttl, Value};
use cachet_providers::cache::{MokaStore, MokaStoreOptions};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Barrier, Mutex};

pub fn memory_store() -> MokaStore {
    MokaStore::new(MokaStoreOptions {
        sweep_interval: None,
        ..MokaStoreOptions::default()
    })
}

pub fn memory_cache() -> Cache {
    Cache::new(Arc::new(memory_store()))
}

/// In-process store that also offers server-side lists
#[derive(Debug, Default)]
pub struct ListingStore {
    inner: MokaStore,
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl ListingStore {
    pub fn new(prefix: &str) -> Self {
        Self {
            inner: MokaStore::new(MokaStoreOptions {
                sweep_interval: None,
                prefix: prefix.to_string(),
                ..MokaStoreOptions::default()
            }),
            lists: Mutex::new(HashMap::new()),
        }
    }

    /// Read a key directly, bypassing any tag mapping
    pub async fn raw_has(&self, key: &str) -> bool {
        self.inner.has(key).await.unwrap()
    }
}

#[async_trait]
impl Store for ListingStore {
    fn provider_name(&self) -> &str {
        "listing"
    }

    fn prefix(&self) -> &str {
        self.inner.prefix()
    }

    async fn get(&self, key: &str) -> Result<Item> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.inner.put(key, value, ttl).await
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        self.inner.add(key, value, ttl).await
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.inner.increment(key, delta).await
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        self.inner.forget(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.lists.lock().await.clear();
        self.inner.flush().await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        self.inner.lock_primitive()
    }

    fn as_list_store(&self) -> Option<&dyn ListStore> {
        Some(self)
    }
}

#[async_trait]
impl ListStore for ListingStore {
    async fn list_push(&self, key: &str, value: &str) -> Result<()> {
        self.lists
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.lists.lock().await.get(key).cloned().unwrap_or_default())
    }

    async fn list_clear(&self, key: &str) -> Result<()> {
        self.lists.lock().await.remove(key);
        Ok(())
    }
}

/// In-process store whose increments wait until `callers` of them are pending
///
/// Forces concurrent callers to finish every write that precedes their
/// increment before any of them increments.
#[derive(Debug)]
pub struct IncrementGate {
    inner: MokaStore,
    gate: Barrier,
}

impl IncrementGate {
    pub fn new(callers: usize) -> Self {
        Self {
            inner: memory_store(),
            gate: Barrier::new(callers),
        }
    }
}

#[async_trait]
impl Store for IncrementGate {
    fn provider_name(&self) -> &str {
        "gated"
    }

    async fn get(&self, key: &str) -> Result<Item> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.inner.put(key, value, ttl).await
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        self.inner.add(key, value, ttl).await
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.gate.wait().await;
        self.inner.increment(key, delta).await
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        self.inner.forget(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.inner.flush().await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        self.inner.lock_primitive()
    }
}
