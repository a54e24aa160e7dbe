//! Store factory
//!
//! Turns a backend kind plus its matching settings into a connected store.
//! A kind paired with another backend's settings is rejected here, before
//! any connection attempt.

use crate::config::{BackendConfig, BackendKind, EncoderKind, StoreConfig};
use cachet_application::Cache;
use cachet_domain::Store;
use cachet_domain::error::{Error, Result};
use cachet_providers::cache::{
    MemcachedStore, MemcachedStoreOptions, MokaStore, MokaStoreOptions, RedisStore,
    RedisStoreOptions,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Settings shared by every backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Prefix for tagged-item and forever-index keys
    pub prefix: String,
    /// Encoding for non-numeric values on network backends
    pub encoder: EncoderKind,
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            encoder: config.encoder,
        }
    }
}

/// Builds stores from configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreFactory;

impl StoreFactory {
    /// Connect the backend described by `kind` and `config`
    pub async fn create(
        kind: BackendKind,
        config: BackendConfig,
        options: StoreOptions,
    ) -> Result<Arc<dyn Store>> {
        if config.kind() != kind {
            return Err(Error::configuration(format!(
                "Store kind {kind} cannot be built from {} settings",
                config.kind()
            )));
        }

        let store: Arc<dyn Store> = match config {
            BackendConfig::Memory(memory) => Arc::new(MokaStore::new(MokaStoreOptions {
                max_capacity: memory.max_capacity,
                sweep_interval: memory.sweep_interval(),
                lock: memory.lock,
                prefix: options.prefix,
            })),
            BackendConfig::Redis(redis) => {
                let connect = RedisStore::connect(RedisStoreOptions {
                    url: redis.url,
                    prefix: options.prefix,
                    encoder: options.encoder.encoder(),
                });
                Arc::new(with_timeout(kind, redis.connection_timeout_ms, connect).await?)
            }
            BackendConfig::Memcached(memcached) => {
                let connect = MemcachedStore::connect(MemcachedStoreOptions {
                    url: memcached.url,
                    prefix: options.prefix,
                    encoder: options.encoder.encoder(),
                });
                Arc::new(with_timeout(kind, memcached.connection_timeout_ms, connect).await?)
            }
        };

        info!(backend = %kind, "Store created");
        Ok(store)
    }

    /// Connect the backend selected by a store configuration
    pub async fn from_config(config: &StoreConfig) -> Result<Arc<dyn Store>> {
        Self::create(config.kind, config.backend_config()?, StoreOptions::from(config)).await
    }

    /// Connect and wrap the store in a [`Cache`] handle
    pub async fn cache(config: &StoreConfig) -> Result<Cache> {
        Ok(Cache::new(Self::from_config(config).await?))
    }
}

async fn with_timeout<T>(
    kind: BackendKind,
    timeout_ms: u64,
    connect: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), connect)
        .await
        .map_err(|_| Error::backend(format!("Timed out connecting to {kind} after {timeout_ms}ms")))?
}
