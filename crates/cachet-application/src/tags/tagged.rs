//! Tagged cache decorator
//!
//! A [`Store`] view that remaps every logical key to
//! `prefix + hex(sha1(namespace)) + ":" + key` before delegating. Because it
//! is itself a `Store`, it composes with everything else that takes one.
//!
//! Backends that expose server-side lists also get a forever-key index:
//! each untimed write, including a successful untimed `add`, is recorded
//! under `prefix + segment + ":forever"` for every tag segment, so
//! [`TaggedCache::flush_tags`] can delete those entries instead of leaving
//! them unreachable.

use super::tag_set::TagSet;
use async_trait::async_trait;
use cachet_domain::constants::{
    NAMESPACE_SEPARATOR, TAGGED_KEY_SEPARATOR, forever_key, tag_key,
};
use cachet_domain::error::{Error, Result};
use cachet_domain::{Entry, Item, LockPrimitive, Store, Ttl, Value};
use sha1::{Digest, Sha1};
use std::sync::Arc;
use tracing::{debug, info};

/// Store view scoped to a tag set
#[derive(Debug, Clone)]
pub struct TaggedCache {
    store: Arc<dyn Store>,
    tags: TagSet,
}

impl TaggedCache {
    /// Wrap a store with a tag set
    pub fn new(store: Arc<dyn Store>, tags: TagSet) -> Self {
        Self { store, tags }
    }

    /// The tag set this view resolves keys through
    pub fn tag_set(&self) -> &TagSet {
        &self.tags
    }

    /// Physical key for a logical key under the current namespace
    pub async fn tagged_item_key(&self, key: &str) -> Result<String> {
        let namespace = self.tags.namespace().await?;
        Ok(self.key_in(&namespace, key))
    }

    fn key_in(&self, namespace: &str, key: &str) -> String {
        let digest = Sha1::digest(namespace.as_bytes());
        format!(
            "{}{}{TAGGED_KEY_SEPARATOR}{key}",
            self.store.prefix(),
            hex::encode(digest)
        )
    }

    /// Invalidate every entry written through this tag set
    ///
    /// With list support, indexed forever entries are deleted, each tag's
    /// token entry is removed and its index cleared. Without it, every tag
    /// is rotated and old entries are left for the backend to expire.
    pub async fn flush_tags(&self) -> Result<()> {
        let Some(lists) = self.store.as_list_store() else {
            self.tags.reset().await?;
            info!(tags = ?self.tags.names(), "Tags flushed by rotation");
            return Ok(());
        };

        let segments = self.tags.tag_ids().await?;
        let mut deleted = 0_usize;
        for (name, segment) in self.tags.names().iter().zip(&segments) {
            let index_key = forever_key(self.store.prefix(), segment);
            for key in lists.list_range(&index_key).await? {
                if self.store.forget(&key).await? {
                    deleted += 1;
                }
            }
            self.store.forget(&tag_key(name)).await?;
            lists.list_clear(&index_key).await?;
        }
        info!(tags = ?self.tags.names(), deleted = deleted, "Tags flushed with forever index");
        Ok(())
    }

    async fn index_forever_key(&self, namespace: &str, tagged_key: &str) -> Result<()> {
        let Some(lists) = self.store.as_list_store() else {
            return Ok(());
        };
        for segment in namespace.split(NAMESPACE_SEPARATOR) {
            lists
                .list_push(&forever_key(self.store.prefix(), segment), tagged_key)
                .await?;
        }
        debug!(key = tagged_key, "Forever key indexed");
        Ok(())
    }
}

#[async_trait]
impl Store for TaggedCache {
    fn provider_name(&self) -> &str {
        self.store.provider_name()
    }

    fn prefix(&self) -> &str {
        self.store.prefix()
    }

    async fn get(&self, key: &str) -> Result<Item> {
        let tagged = self.tagged_item_key(key).await?;
        let item = self.store.get(&tagged).await.map_err(|e| {
            if e.is_not_found() {
                Error::not_found(key)
            } else {
                e
            }
        })?;
        Ok(match item.value() {
            Some(value) => Item::found(key, value.clone()),
            None => Item::missing(key),
        })
    }

    async fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        if ttl.is_forever() {
            return self.forever(key, value).await;
        }
        let tagged = self.tagged_item_key(key).await?;
        self.store.put(&tagged, value, ttl).await
    }

    async fn forever(&self, key: &str, value: Value) -> Result<()> {
        let namespace = self.tags.namespace().await?;
        let tagged = self.key_in(&namespace, key);
        self.store.forever(&tagged, value).await?;
        self.index_forever_key(&namespace, &tagged).await
    }

    async fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        let namespace = self.tags.namespace().await?;
        let tagged = self.key_in(&namespace, key);
        let added = self.store.add(&tagged, value, ttl).await?;
        if added && ttl.is_forever() {
            self.index_forever_key(&namespace, &tagged).await?;
        }
        Ok(added)
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        let tagged = self.tagged_item_key(key).await?;
        self.store.increment(&tagged, delta).await
    }

    async fn decrement(&self, key: &str, delta: i64) -> Result<i64> {
        let tagged = self.tagged_item_key(key).await?;
        self.store.decrement(&tagged, delta).await
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        let tagged = self.tagged_item_key(key).await?;
        self.store.forget(&tagged).await
    }

    /// Flushes the whole underlying store, not only this tag set
    async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    async fn many(&self, keys: &[String]) -> Result<Vec<Item>> {
        let namespace = self.tags.namespace().await?;
        let tagged: Vec<String> = keys.iter().map(|key| self.key_in(&namespace, key)).collect();
        let items = self.store.many(&tagged).await?;
        Ok(keys
            .iter()
            .zip(items)
            .map(|(key, item)| match item.value() {
                Some(value) => Item::found(key.as_str(), value.clone()),
                None => Item::missing(key.as_str()),
            })
            .collect())
    }

    async fn put_many(&self, entries: Vec<Entry>) -> Result<()> {
        let namespace = self.tags.namespace().await?;
        let (untimed, timed): (Vec<Entry>, Vec<Entry>) =
            entries.into_iter().partition(|entry| entry.ttl.is_forever());

        let timed = timed
            .into_iter()
            .map(|entry| {
                let tagged = self.key_in(&namespace, &entry.key);
                entry.with_key(tagged)
            })
            .collect();
        self.store.put_many(timed).await?;

        for entry in untimed {
            let tagged = self.key_in(&namespace, &entry.key);
            self.store.forever(&tagged, entry.value).await?;
            self.index_forever_key(&namespace, &tagged).await?;
        }
        Ok(())
    }

    /// The view owns nothing; the underlying store stays open
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn lock_primitive(&self) -> Arc<dyn LockPrimitive> {
        self.store.lock_primitive()
    }
}
