//! Store contract checks run against the in-process backend

use cachet_domain::{Entry, Store, Ttl, Value};
use cachet_providers::cache::{MokaStore, MokaStoreOptions};
use cachet_providers::lock::MemoryLockKind;
use std::time::Duration;

fn store_with(lock: MemoryLockKind) -> MokaStore {
    MokaStore::new(MokaStoreOptions {
        sweep_interval: None,
        lock,
        prefix: "app:".to_string(),
        ..MokaStoreOptions::default()
    })
}

fn store() -> MokaStore {
    store_with(MemoryLockKind::Map)
}

#[tokio::test]
async fn many_reports_missing_keys_in_order() {
    let store = store();
    store.forever("a", Value::from("1")).await.unwrap();
    store.forever("c", Value::from(3)).await.unwrap();

    let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let items = store.many(&keys).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_string().unwrap(), "1");
    assert!(!items[1].is_found());
    assert!(items[1].error().unwrap().is_not_found());
    assert_eq!(items[2].as_int64().unwrap(), 3);
}

#[tokio::test]
async fn put_many_writes_every_entry() {
    let store = store();
    store
        .put_many(vec![
            Entry::new("x", Value::from(1), Ttl::secs(10)),
            Entry::forever("y", Value::from(2.5)),
        ])
        .await
        .unwrap();

    assert_eq!(store.get_int64("x").await.unwrap(), 1);
    assert!((store.get_float64("y").await.unwrap() - 2.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn increment_of_missing_key_counts_from_zero() {
    let store = store();
    assert_eq!(store.increment("hits", 1).await.unwrap(), 1);
    assert_eq!(store.decrement("hits", 3).await.unwrap(), -2);
}

#[tokio::test]
async fn numeric_text_increments() {
    let store = store();
    store.forever("n", Value::from("41")).await.unwrap();
    assert_eq!(store.increment("n", 1).await.unwrap(), 42);
}

#[tokio::test]
async fn flush_clears_everything() {
    let store = store();
    store.forever("a", Value::from(1)).await.unwrap();
    store.forever("b", Value::from(2)).await.unwrap();
    store.flush().await.unwrap();
    assert!(!store.has("a").await.unwrap());
    assert!(!store.has("b").await.unwrap());
}

#[tokio::test]
async fn prefix_and_name_are_reported() {
    let store = store();
    assert_eq!(store.prefix(), "app:");
    assert_eq!(store.provider_name(), "memory");
    assert!(store.as_list_store().is_none());
}

#[tokio::test]
async fn mutex_lock_kind_keeps_locks_out_of_the_map() {
    let store = store_with(MemoryLockKind::Mutex);
    let lock = store.lock_primitive();

    assert!(lock.acquire("job", "a", Duration::from_secs(5)).await.unwrap());
    assert!(!store.has("job").await.unwrap());
    assert!(!lock.acquire("job", "b", Duration::from_secs(5)).await.unwrap());
    assert!(lock.release("job", "a").await.unwrap());
}

#[tokio::test]
async fn map_lock_kind_shares_the_map() {
    let store = store();
    let lock = store.lock_primitive();

    assert!(lock.acquire("job", "a", Duration::from_secs(5)).await.unwrap());
    assert_eq!(store.get_string("job").await.unwrap(), "a");
}
