//! Shared store handle
//!
//! [`Cache`] wraps one backend behind `Arc<dyn Store>` and is itself a
//! [`Store`]. It is the factory for the features layered on top: tagged
//! views, locks and rate limiters all borrow its backend.

use crate::lock::Lock;
use crate::rate_limiter::RateLimiter;
use crate::tags::{TagSet, TaggedCache};
use async_trait::async_trait;
use cachet_domain::error::{Error, Result};
use cachet_domain::{Entry, Item, ListStore, LockPrimitive, Store, Ttl, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Cloneable handle to one store
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<dyn Store>,
}

impl Cache {
    /// Wrap a store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// A view whose keys are scoped to the given tags
    pub fn tags<I, S>(&self, names: I) -> TaggedCache
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = TagSet::new(Arc::clone(&self.store), names);
        TaggedCache::new(Arc::clone(&self.store), tags)
    }

    /// A lock on this backend
    pub fn lock(&self, name: impl Into<String>, owner: impl Into<String>, ttl: Duration) -> Lock {
        Lock::new(self.store.lock_primitive(), name, owner, ttl)
    }

    /// A rate limiter counting in this backend
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(Arc::clone(&self.store))
    }

    /// Server-side lists of the backend
    ///
    /// Fails with [`Error::NotImplemented`] on backends without them.
    pub fn lists(&self) -> Result<&dyn ListStore> {
        self.store
            .as_list_store()
            .ok_or_else(|| Error::not_implemented("lists", self.store.provider_name()))
    }

    /// Read `key`, or compute, store and return it on a miss
    pub async fn remember<F, Fut>(&self, key: &str, ttl: Ttl, producer: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        match self.store.get(key).await {
            Ok(item) => item.into_value(),
            Err(Error::NotFound { .. }) => {
                let value = producer().await?;
                self.store.put(key, value.clone(), ttl).await?;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    /// Read `key` and delete it
    pub async fn pull(&self, key: &str) -> Result<Item> {
        let item = self.store.get(key).await?;
        self.store.forget(key).await?;
        Ok(item)
    }
}

impl From<Arc<dyn Store>> for Cache {
    fn from(store: Arc<dyn Store>) -> Self {
        Self::new(store)
    }
}

#[async_trait]
impl Store for Cache {
    fn provider_name(&self) -> &str {
        self.store.provider_name()
    }

    fn prefix(&self) -> &str {
        self.store.prefix()
    }

    async fn get(&self, key: &str) -> Result<Item> {
        self.store.get(key).await
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.store.put(key, value, ttl).await
    }

    async fn forever(&self, key: &str, value: Value) -> Result<()> {
        self.store.forever(key, value).await
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        self.store.add(key, value, ttl).await
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.store.increment(key, delta).await
    }

    async fn decrement(&self, key: &str, delta: i64) -> Result<i64> {
        self.store.decrement(key, delta).await
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        self.store.forget(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    async fn many(&self, keys: &[String]) -> Result<Vec<Item>> {
        self.store.many(keys).await
    }

    async fn put_many(&self, entries: Vec<Entry>) -> Result<()> {
        self.store.put_many(entries).await
    }

    async fn close(&self) -> Result<()> {
        self.store.close().await
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        self.store.lock_primitive()
    }

    fn as_list_store(&self) -> Option<&dyn ListStore> {
        self.store.as_list_store()
    }
}
