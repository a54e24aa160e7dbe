//! Lock on the in-process map
//!
//! Lock entries live in the same map as data, under the lock name, so they
//! expire through the same per-entry policy.

use crate::cache::moka::MemoryEntry;
use async_trait::async_trait;
use cachet_domain::error::Result;
use cachet_domain::{LockPrimitive, Ttl, Value};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::time::Duration;

/// Add-if-absent lock over a Moka map
#[derive(Clone)]
pub struct MemoryLock {
    cache: Cache<String, MemoryEntry>,
}

impl MemoryLock {
    pub(crate) fn new(cache: Cache<String, MemoryEntry>) -> Self {
        Self { cache }
    }
}

fn owner_of(entry: &MemoryEntry) -> Option<&str> {
    match &entry.value {
        Value::String(owner) => Some(owner.as_str()),
        _ => None,
    }
}

#[async_trait]
impl LockPrimitive for MemoryLock {
    async fn acquire(&self, name: &str, owner: &str, ttl: Duration) -> Result<bool> {
        let entry = MemoryEntry::new(Value::from(owner), Ttl::from(ttl));
        let inserted = self
            .cache
            .entry(name.to_string())
            .or_insert_with(async move { entry })
            .await;
        Ok(inserted.is_fresh())
    }

    async fn release(&self, name: &str, owner: &str) -> Result<bool> {
        let owner = owner.to_string();
        let outcome = self
            .cache
            .entry(name.to_string())
            .and_compute_with(move |existing| {
                let op = match existing {
                    Some(entry) if owner_of(entry.value()) == Some(owner.as_str()) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(outcome, CompResult::Removed(_)))
    }

    async fn force_release(&self, name: &str) -> Result<()> {
        self.cache.invalidate(name).await;
        Ok(())
    }

    async fn current_owner(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .cache
            .get(name)
            .await
            .and_then(|entry| owner_of(&entry).map(str::to_string)))
    }
}

impl std::fmt::Debug for MemoryLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLock").finish_non_exhaustive()
    }
}
