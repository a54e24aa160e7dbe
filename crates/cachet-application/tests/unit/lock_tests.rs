//! Lock orchestration over the in-process primitives

use crate::support::memory_cache;
use async_trait::async_trait;
use cachet_application::Lock;
use cachet_domain::LockPrimitive;
use cachet_domain::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const TTL: Duration = Duration::from_secs(10);

#[tokio::test]
async fn only_one_owner_acquires() {
    let cache = memory_cache();
    let first = cache.lock("report", "owner-a", TTL);
    let second = cache.lock("report", "owner-b", TTL);

    assert!(first.acquire().await.unwrap());
    assert!(!second.acquire().await.unwrap());
    assert_eq!(second.current_owner().await.unwrap().as_deref(), Some("owner-a"));
}

#[tokio::test]
async fn same_owner_is_not_reentrant() {
    let cache = memory_cache();
    let lock = cache.lock("report", "owner-a", TTL);
    assert!(lock.acquire().await.unwrap());
    assert!(!lock.acquire().await.unwrap());
}

#[tokio::test]
async fn get_runs_action_and_releases() {
    let cache = memory_cache();
    let lock = cache.lock("job", "me", TTL);

    let outcome = lock.get(|| async { Ok(42) }).await;

    assert!(outcome.acquired);
    assert_eq!(outcome.result.unwrap(), Some(42));
    assert_eq!(lock.current_owner().await.unwrap(), None);
}

#[tokio::test]
async fn get_skips_action_when_held() {
    let cache = memory_cache();
    cache.lock("job", "other", TTL).acquire().await.unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let outcome = cache
        .lock("job", "me", TTL)
        .get(|| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

    assert!(!outcome.acquired);
    assert!(outcome.result.unwrap().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failing_action_still_releases() {
    let cache = memory_cache();
    let lock = cache.lock("job", "me", TTL);

    let outcome = lock
        .get(|| async { Err::<(), _>(Error::backend("action failed")) })
        .await;

    assert!(outcome.acquired);
    assert!(outcome.result.is_err());
    assert!(lock.acquire().await.unwrap());
}

#[tokio::test]
async fn force_release_ignores_owner() {
    let cache = memory_cache();
    let held = cache.lock("job", "holder", TTL);
    held.acquire().await.unwrap();

    cache.lock("job", "admin", TTL).force_release().await.unwrap();

    assert_eq!(held.current_owner().await.unwrap(), None);
}

#[tokio::test]
async fn owner_token_is_a_bearer_token() {
    let cache = memory_cache();
    cache.lock("job", "shared", TTL).acquire().await.unwrap();
    // A different handle presenting the same owner may release it
    assert!(cache.lock("job", "shared", TTL).release().await.unwrap());
}

#[tokio::test]
async fn block_times_out_on_held_lock() {
    let cache = memory_cache();
    cache.lock("job", "holder", TTL).acquire().await.unwrap();

    let started = Instant::now();
    let outcome = cache
        .lock("job", "waiter", TTL)
        .block(Duration::from_millis(100), Duration::from_millis(500), || async {
            Ok(())
        })
        .await;

    assert!(!outcome.acquired);
    assert!(outcome.result.unwrap_err().is_lock_timeout());
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn block_acquires_once_lock_expires() {
    let cache = memory_cache();
    cache
        .lock("job", "holder", Duration::from_millis(150))
        .acquire()
        .await
        .unwrap();

    let outcome = cache
        .lock("job", "waiter", TTL)
        .block(Duration::from_millis(50), Duration::from_secs(2), || async {
            Ok("done")
        })
        .await;

    assert!(outcome.acquired);
    assert_eq!(outcome.into_result().unwrap(), Some("done"));
}

#[tokio::test]
async fn new_owner_tokens_differ() {
    assert_ne!(Lock::new_owner(), Lock::new_owner());
}

/// Always grants the lock, never manages to give it back
#[derive(Debug)]
struct StuckRelease;

#[async_trait]
impl LockPrimitive for StuckRelease {
    async fn acquire(&self, _name: &str, _owner: &str, _ttl: Duration) -> Result<bool> {
        Ok(true)
    }

    async fn release(&self, _name: &str, _owner: &str) -> Result<bool> {
        Err(Error::backend("release failed"))
    }

    async fn force_release(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn current_owner(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn stuck_lock() -> Lock {
    Lock::new(Arc::new(StuckRelease), "job", "me", TTL)
}

fn backend_message(error: &Error) -> &str {
    match error {
        Error::Backend { message, .. } => message,
        other => panic!("expected a backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn release_failure_is_reported_after_successful_action() {
    let outcome = stuck_lock().get(|| async { Ok(7) }).await;

    assert!(outcome.acquired);
    let error = outcome.result.unwrap_err();
    assert_eq!(backend_message(&error), "release failed");
}

#[tokio::test]
async fn action_and_release_failures_are_aggregated_in_order() {
    let outcome = stuck_lock()
        .get(|| async { Err::<(), _>(Error::backend("action failed")) })
        .await;

    assert!(outcome.acquired);
    match outcome.result.unwrap_err() {
        Error::Aggregate { errors } => {
            assert_eq!(errors.len(), 2);
            assert_eq!(backend_message(&errors[0]), "action failed");
            assert_eq!(backend_message(&errors[1]), "release failed");
        }
        other => panic!("expected an aggregate error, got {other:?}"),
    }
}

#[tokio::test]
async fn block_reports_release_failure() {
    let outcome = stuck_lock()
        .block(Duration::from_millis(10), Duration::from_millis(100), || async {
            Ok("done")
        })
        .await;

    assert!(outcome.acquired);
    assert!(outcome.result.is_err());
}
