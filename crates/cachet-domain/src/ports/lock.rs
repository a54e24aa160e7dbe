//! Lock Primitive Port
//!
//! The per-backend atomic operations the lock orchestration is built on.
//! Ownership is a bearer token compared by value: any caller presenting the
//! same owner string is treated as the owner.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Backend-specific acquire/release pair
#[async_trait]
pub trait LockPrimitive: Send + Sync + std::fmt::Debug {
    /// Try once to take the lock; `false` when someone already holds it
    async fn acquire(&self, name: &str, owner: &str, ttl: Duration) -> Result<bool>;

    /// Release the lock if `owner` holds it; `false` otherwise
    async fn release(&self, name: &str, owner: &str) -> Result<bool>;

    /// Release the lock regardless of who holds it
    async fn force_release(&self, name: &str) -> Result<()>;

    /// Owner token of the current holder, if any
    async fn current_owner(&self, name: &str) -> Result<Option<String>>;
}
