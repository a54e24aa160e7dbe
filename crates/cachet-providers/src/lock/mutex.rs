//! Guarded lock table
//!
//! Locks held in a concurrent map separate from any stored data. A shard
//! lock of the map makes check-then-insert atomic per name.

use async_trait::async_trait;
use cachet_domain::LockPrimitive;
use cachet_domain::error::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct HeldLock {
    owner: String,
    expires_at: Option<Instant>,
}

impl HeldLock {
    fn new(owner: &str, ttl: Duration) -> Self {
        Self {
            owner: owner.to_string(),
            // A ttl past the end of the clock never expires either
            expires_at: Instant::now()
                .checked_add(ttl)
                .filter(|_| !ttl.is_zero()),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-process lock table
#[derive(Debug, Clone, Default)]
pub struct MutexLock {
    held: Arc<DashMap<String, HeldLock>>,
}

impl MutexLock {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locks currently recorded, expired ones included
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Whether no lock is recorded
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

#[async_trait]
impl LockPrimitive for MutexLock {
    async fn acquire(&self, name: &str, owner: &str, ttl: Duration) -> Result<bool> {
        match self.held.entry(name.to_string()) {
            Entry::Occupied(mut held) => {
                if held.get().is_expired() {
                    held.insert(HeldLock::new(owner, ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(HeldLock::new(owner, ttl));
                Ok(true)
            }
        }
    }

    async fn release(&self, name: &str, owner: &str) -> Result<bool> {
        let removed = self
            .held
            .remove_if(name, |_, held| held.owner == owner && !held.is_expired());
        if removed.is_none() {
            // Drop a stale record so the table does not grow
            self.held.remove_if(name, |_, held| held.is_expired());
        }
        Ok(removed.is_some())
    }

    async fn force_release(&self, name: &str) -> Result<()> {
        self.held.remove(name);
        Ok(())
    }

    async fn current_owner(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .held
            .get(name)
            .filter(|held| !held.is_expired())
            .map(|held| held.owner.clone()))
    }
}
