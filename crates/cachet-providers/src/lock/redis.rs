//! Redis lock primitive
//!
//! Acquire is `SET name owner NX PX ttl`. Release runs a compare-and-delete
//! script so a holder whose lock expired and was re-taken cannot delete the
//! new holder's key.

use crate::cache::redis::{RedisConnection, redis_error};
use crate::constants::REDIS_RELEASE_LOCK_SCRIPT;
use async_trait::async_trait;
use cachet_domain::LockPrimitive;
use cachet_domain::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Lock over the Redis connection shared with its store
pub struct RedisLock {
    connection: Arc<RedisConnection>,
    release_script: redis::Script,
}

impl RedisLock {
    pub(crate) fn new(connection: Arc<RedisConnection>) -> Self {
        Self {
            connection,
            release_script: redis::Script::new(REDIS_RELEASE_LOCK_SCRIPT),
        }
    }
}

#[async_trait]
impl LockPrimitive for RedisLock {
    async fn acquire(&self, name: &str, owner: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection.get()?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(name).arg(owner).arg("NX");
        if !ttl.is_zero() {
            cmd.arg("PX")
                .arg(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1));
        }
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("SET NX", name, e))?;
        Ok(reply.is_some())
    }

    async fn release(&self, name: &str, owner: &str) -> Result<bool> {
        let mut conn = self.connection.get()?;
        let removed: i64 = self
            .release_script
            .key(name)
            .arg(owner)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| redis_error("EVALSHA release", name, e))?;
        Ok(removed > 0)
    }

    async fn force_release(&self, name: &str) -> Result<()> {
        let mut conn = self.connection.get()?;
        redis::cmd("DEL")
            .arg(name)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| redis_error("DEL", name, e))?;
        Ok(())
    }

    async fn current_owner(&self, name: &str) -> Result<Option<String>> {
        let mut conn = self.connection.get()?;
        redis::cmd("GET")
            .arg(name)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("GET", name, e))
    }
}

impl std::fmt::Debug for RedisLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLock").finish_non_exhaustive()
    }
}
