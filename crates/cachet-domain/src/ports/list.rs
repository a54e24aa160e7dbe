//! Server-side list capability
//!
//! Optional: only backends with native lists implement it. Callers discover
//! it through [`Store::as_list_store`](super::store::Store::as_list_store).

use crate::error::Result;
use async_trait::async_trait;

/// Append/range/clear over a server-side list of strings
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Append a value to the end of the list
    async fn list_push(&self, key: &str, value: &str) -> Result<()>;

    /// Every value of the list, oldest first; an absent list is empty
    async fn list_range(&self, key: &str) -> Result<Vec<String>>;

    /// Delete the whole list
    async fn list_clear(&self, key: &str) -> Result<()>;
}
