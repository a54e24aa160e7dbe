//! Memcached lock primitive
//!
//! Acquire is an `add` of the owner under the lock name. Memcached has no
//! compare-and-delete, so release reads the owner and deletes in two round
//! trips; a lock that expires and is re-taken in between can be released by
//! its previous holder.

use crate::cache::memcached::{
    MemcachedConnection, expiry_arg, is_not_found, is_not_stored, memcached_error,
};
use async_trait::async_trait;
use cachet_domain::error::Result;
use cachet_domain::{LockPrimitive, Ttl};
use std::sync::Arc;
use std::time::Duration;

/// Lock over the memcached client shared with its store
pub struct MemcachedLock {
    connection: Arc<MemcachedConnection>,
}

impl MemcachedLock {
    pub(crate) fn new(connection: Arc<MemcachedConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl LockPrimitive for MemcachedLock {
    async fn acquire(&self, name: &str, owner: &str, ttl: Duration) -> Result<bool> {
        let mut client = self.connection.client().await?;
        match client
            .add(name, owner.as_bytes(), Some(expiry_arg(Ttl::from(ttl))), None)
            .await
        {
            Ok(()) => Ok(true),
            Err(e) if is_not_stored(&e) => Ok(false),
            Err(e) => Err(memcached_error("ADD", name, e)),
        }
    }

    async fn release(&self, name: &str, owner: &str) -> Result<bool> {
        if self.current_owner(name).await?.as_deref() != Some(owner) {
            return Ok(false);
        }
        let mut client = self.connection.client().await?;
        match client.delete(name).await {
            Ok(()) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(memcached_error("DELETE", name, e)),
        }
    }

    async fn force_release(&self, name: &str) -> Result<()> {
        let mut client = self.connection.client().await?;
        match client.delete(name).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(memcached_error("DELETE", name, e)),
        }
    }

    async fn current_owner(&self, name: &str) -> Result<Option<String>> {
        let mut client = self.connection.client().await?;
        let found = client
            .get(name)
            .await
            .map_err(|e| memcached_error("GET", name, e))?;
        Ok(found.map(|value| String::from_utf8_lossy(&value.data).into_owned()))
    }
}

impl std::fmt::Debug for MemcachedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcachedLock").finish_non_exhaustive()
    }
}
