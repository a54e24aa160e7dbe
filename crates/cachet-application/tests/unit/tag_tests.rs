//! Tag namespace resolution and tagged cache behaviour

use crate::support::{ListingStore, memory_cache};
use cachet_application::Cache;
use cachet_domain::constants::{forever_key, tag_key};
use cachet_domain::{Entry, ListStore, Store, Ttl, Value};
use sha1::{Digest, Sha1};
use std::sync::Arc;

#[tokio::test]
async fn put_then_get_through_same_tags() {
    let cache = memory_cache();
    let tagged = cache.tags(["people", "authors"]);

    tagged.put("anne", Value::from("Anne"), Ttl::secs(60)).await.unwrap();
    let item = tagged.get("anne").await.unwrap();

    assert_eq!(item.key(), "anne");
    assert_eq!(item.as_string().unwrap(), "Anne");
}

#[tokio::test]
async fn logical_key_is_not_written_directly() {
    let cache = memory_cache();
    cache
        .tags(["people"])
        .put("anne", Value::from("Anne"), Ttl::secs(60))
        .await
        .unwrap();

    assert!(!cache.has("anne").await.unwrap());
}

#[tokio::test]
async fn resetting_one_tag_hides_entries() {
    let cache = memory_cache();
    let tagged = cache.tags(["people", "authors"]);
    tagged.put("anne", Value::from("Anne"), Ttl::secs(60)).await.unwrap();
    let old_key = tagged.tagged_item_key("anne").await.unwrap();

    tagged.tag_set().reset_tag("authors").await.unwrap();

    assert!(tagged.get("anne").await.unwrap_err().is_not_found());
    // The physical entry is untouched, only unreachable
    assert!(cache.has(&old_key).await.unwrap());
}

#[tokio::test]
async fn disjoint_tag_sets_do_not_collide() {
    let cache = memory_cache();
    let first = cache.tags(["a"]);
    let second = cache.tags(["b"]);

    first.forever("k", Value::from(1)).await.unwrap();
    second.forever("k", Value::from(2)).await.unwrap();

    assert_ne!(
        first.tagged_item_key("k").await.unwrap(),
        second.tagged_item_key("k").await.unwrap()
    );
    assert_eq!(first.get_int64("k").await.unwrap(), 1);
    assert_eq!(second.get_int64("k").await.unwrap(), 2);
}

#[tokio::test]
async fn tag_tokens_are_minted_once_and_persisted() {
    let cache = memory_cache();
    let tags = cache.tags(["a", "b"]);

    let first = tags.tag_set().namespace().await.unwrap();
    let second = tags.tag_set().namespace().await.unwrap();
    assert_eq!(first, second);

    let a = cache.get_string(&tag_key("a")).await.unwrap();
    let b = cache.get_string(&tag_key("b")).await.unwrap();
    assert_eq!(first, format!("{a}|{b}"));
}

#[tokio::test]
async fn tagged_key_layout() {
    let store = Arc::new(ListingStore::new("app:"));
    let cache = Cache::new(store);
    let tagged = cache.tags(["a"]);

    let namespace = tagged.tag_set().namespace().await.unwrap();
    let expected = format!("app:{}:k", hex::encode(Sha1::digest(namespace.as_bytes())));
    assert_eq!(tagged.tagged_item_key("k").await.unwrap(), expected);
}

#[tokio::test]
async fn tag_order_changes_namespace() {
    let cache = memory_cache();
    let ab = cache.tags(["a", "b"]).tag_set().namespace().await.unwrap();
    let ba = cache.tags(["b", "a"]).tag_set().namespace().await.unwrap();
    assert_ne!(ab, ba);
}

#[tokio::test]
async fn many_and_put_many_use_logical_keys() {
    let cache = memory_cache();
    let tagged = cache.tags(["batch"]);
    tagged
        .put_many(vec![
            Entry::new("x", Value::from(1), Ttl::secs(60)),
            Entry::forever("y", Value::from("why")),
        ])
        .await
        .unwrap();

    let keys = vec!["x".to_string(), "y".to_string(), "z".to_string()];
    let items = tagged.many(&keys).await.unwrap();

    assert_eq!(items[0].key(), "x");
    assert_eq!(items[0].as_int64().unwrap(), 1);
    assert_eq!(items[1].as_string().unwrap(), "why");
    assert!(!items[2].is_found());
}

#[tokio::test]
async fn tagged_counters() {
    let cache = memory_cache();
    let tagged = cache.tags(["counters"]);
    assert_eq!(tagged.increment("c", 4).await.unwrap(), 4);
    assert_eq!(tagged.decrement("c", 1).await.unwrap(), 3);
    assert!(tagged.forget("c").await.unwrap());
}

#[tokio::test]
async fn flush_tags_rotates_without_lists() {
    let cache = memory_cache();
    let tagged = cache.tags(["a", "b"]);
    tagged.forever("y", Value::from("v")).await.unwrap();
    let before = tagged.tag_set().namespace().await.unwrap();

    tagged.flush_tags().await.unwrap();

    assert_ne!(tagged.tag_set().namespace().await.unwrap(), before);
    assert!(tagged.get("y").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn forever_entries_are_indexed_per_segment() {
    let store = Arc::new(ListingStore::new("app:"));
    let cache = Cache::new(store.clone());
    let tagged = cache.tags(["a", "b"]);

    tagged.forever("y", Value::from("v")).await.unwrap();
    let physical = tagged.tagged_item_key("y").await.unwrap();

    for segment in tagged.tag_set().tag_ids().await.unwrap() {
        let listed = store.list_range(&forever_key("app:", &segment)).await.unwrap();
        assert_eq!(listed, vec![physical.clone()]);
    }
}

#[tokio::test]
async fn timed_entries_are_not_indexed() {
    let store = Arc::new(ListingStore::new(""));
    let cache = Cache::new(store.clone());
    let tagged = cache.tags(["a"]);

    tagged.put("t", Value::from(1), Ttl::secs(60)).await.unwrap();

    let segment = tagged.tag_set().tag_id("a").await.unwrap();
    assert!(store.list_range(&forever_key("", &segment)).await.unwrap().is_empty());
}

#[tokio::test]
async fn flush_tags_deletes_forever_entries() {
    let store = Arc::new(ListingStore::new(""));
    let cache = Cache::new(store.clone());
    let tagged = cache.tags(["a", "b"]);

    tagged.forever("y", Value::from("v")).await.unwrap();
    let physical = tagged.tagged_item_key("y").await.unwrap();
    let segments = tagged.tag_set().tag_ids().await.unwrap();

    tagged.flush_tags().await.unwrap();

    assert!(!store.raw_has(&tag_key("a")).await);
    assert!(!store.raw_has(&physical).await);
    for segment in segments {
        assert!(store.list_range(&forever_key("", &segment)).await.unwrap().is_empty());
    }
    assert!(cache.tags(["a", "b"]).get("y").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn untimed_add_is_indexed_and_flushed() {
    let store = Arc::new(ListingStore::new(""));
    let cache = Cache::new(store.clone());
    let tagged = cache.tags(["a"]);

    assert!(tagged.add("y", Value::from("v"), Ttl::Forever).await.unwrap());
    assert!(!tagged.add("y", Value::from("w"), Ttl::Forever).await.unwrap());
    let physical = tagged.tagged_item_key("y").await.unwrap();
    let segment = tagged.tag_set().tag_id("a").await.unwrap();
    assert_eq!(
        store.list_range(&forever_key("", &segment)).await.unwrap(),
        vec![physical.clone()]
    );

    tagged.flush_tags().await.unwrap();

    assert!(!store.raw_has(&physical).await);
}

#[tokio::test]
async fn tagged_flush_clears_whole_store() {
    let cache = memory_cache();
    cache.forever("plain", Value::from(1)).await.unwrap();
    cache.tags(["a"]).flush().await.unwrap();
    assert!(!cache.has("plain").await.unwrap());
}
