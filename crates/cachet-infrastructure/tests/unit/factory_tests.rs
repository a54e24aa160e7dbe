//! Store factory tests

use cachet_domain::{Store, Ttl, Value};
use cachet_infrastructure::config::{
    BackendConfig, BackendKind, MemoryConfig, RedisConfig, StoreConfig,
};
use cachet_infrastructure::{StoreFactory, StoreOptions};
use cachet_providers::lock::MemoryLockKind;

#[tokio::test]
async fn test_create_memory_store() {
    let store = StoreFactory::create(
        BackendKind::Memory,
        BackendConfig::Memory(MemoryConfig::default()),
        StoreOptions {
            prefix: "app:".to_string(),
            ..StoreOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(store.provider_name(), "memory");
    assert_eq!(store.prefix(), "app:");
    store.put("k", Value::from("v"), Ttl::secs(60)).await.unwrap();
    assert_eq!(store.get_string("k").await.unwrap(), "v");
}

#[tokio::test]
async fn test_kind_mismatch_is_rejected() {
    let err = StoreFactory::create(
        BackendKind::Redis,
        BackendConfig::Memory(MemoryConfig::default()),
        StoreOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("redis"));
}

#[tokio::test]
async fn test_from_config_requires_section() {
    let config = StoreConfig {
        kind: BackendKind::Redis,
        ..StoreConfig::default()
    };
    assert!(StoreFactory::from_config(&config).await.is_err());
}

#[tokio::test]
async fn test_cache_with_mutex_lock() {
    let config = StoreConfig::memory(MemoryConfig {
        sweep_interval_ms: 0,
        lock: MemoryLockKind::Mutex,
        ..MemoryConfig::default()
    });
    let cache = StoreFactory::cache(&config).await.unwrap();
    let lock = cache.lock("job", "worker-1", std::time::Duration::from_secs(5));
    assert!(lock.acquire().await.unwrap());
    assert!(!cache
        .lock("job", "worker-2", std::time::Duration::from_secs(5))
        .acquire()
        .await
        .unwrap());
    assert!(lock.release().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_redis_fails() {
    let config = StoreConfig::redis(RedisConfig {
        url: "redis://127.0.0.1:1".to_string(),
        connection_timeout_ms: 500,
    });
    assert!(StoreFactory::from_config(&config).await.is_err());
}
