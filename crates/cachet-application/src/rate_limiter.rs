//! Fixed-window rate limiter
//!
//! Built only from the store contract, so it behaves the same on every
//! backend. Each limited identity `key` owns two entries with the same
//! lifetime:
//!
//! | Key | Holds |
//! |-----|-------|
//! | `key` | Hit counter for the current window |
//! | `key:timer` | Unix time in milliseconds at which the window ends |
//!
//! Both are created with `add`, so concurrent first hits share one window.

use cachet_domain::constants::rate_limit_timer_key;
use cachet_domain::error::{Error, Result};
use cachet_domain::{Store, Ttl, Value};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Unix milliseconds at which a window of length `decay` starting at `now` ends
fn window_ends_at(now: i64, decay: Duration) -> i64 {
    now.saturating_add(i64::try_from(decay.as_millis()).unwrap_or(i64::MAX))
}

/// Result of [`RateLimiter::throttle`]
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleResponse<T> {
    /// Whether the call was refused
    pub throttled: bool,
    /// Attempts left in the window, counted before this call's hit
    pub remaining: i64,
    /// Time until the window ends; zero when not throttled
    pub retry_after: Duration,
    /// The action's value when it ran
    pub value: Option<T>,
}

impl<T> ThrottleResponse<T> {
    fn throttled(retry_after: Duration) -> Self {
        Self {
            throttled: true,
            remaining: 0,
            retry_after,
            value: None,
        }
    }
}

/// Rate limiter bound to a store
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn Store>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record one hit and return the hit count of the current window
    pub async fn hit(&self, key: &str, decay: Duration) -> Result<i64> {
        let ttl = Ttl::from(decay);
        let window_ends = window_ends_at(Utc::now().timestamp_millis(), decay);

        self.store
            .add(&rate_limit_timer_key(key), Value::from(window_ends), ttl)
            .await?;
        self.store.add(key, Value::from(0), ttl).await?;
        // The increment is the only write to an existing counter; an untimed
        // one is cleared by `attempts_left` once its timer is gone
        let hits = self.store.increment(key, 1).await?;

        debug!(key = key, hits = hits, "Rate limiter hit");
        Ok(hits)
    }

    /// Hits recorded in the current window; zero when there is no window
    pub async fn attempts(&self, key: &str) -> Result<i64> {
        match self.store.get_int64(key).await {
            Ok(hits) => Ok(hits),
            Err(Error::NotFound { .. }) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Attempts left before `max_attempts` is reached
    ///
    /// A counter whose timer already expired is cleared and the full
    /// allowance returned.
    pub async fn attempts_left(&self, key: &str, max_attempts: i64) -> Result<i64> {
        let left = max_attempts - self.attempts(key).await?;
        if left > 0 {
            return Ok(left);
        }

        if self.store.has(&rate_limit_timer_key(key)).await? {
            return Ok(0);
        }

        warn!(key = key, "Rate limiter counter outlived its timer, clearing");
        self.clear(key).await?;
        Ok(max_attempts.max(0))
    }

    /// Whether the window is exhausted
    pub async fn too_many_attempts(&self, key: &str, max_attempts: i64) -> Result<bool> {
        Ok(self.attempts_left(key, max_attempts).await? == 0)
    }

    /// Time until the current window ends
    pub async fn available_in(&self, key: &str) -> Result<Duration> {
        let window_ends = match self.store.get_int64(&rate_limit_timer_key(key)).await {
            Ok(at) => at,
            Err(Error::NotFound { .. }) => return Ok(Duration::ZERO),
            Err(e) => return Err(e),
        };
        let remaining = window_ends - Utc::now().timestamp_millis();
        Ok(Duration::from_millis(u64::try_from(remaining).unwrap_or(0)))
    }

    /// Reset the counter, keeping the window timer
    pub async fn reset_attempts(&self, key: &str) -> Result<bool> {
        self.store.forget(key).await
    }

    /// Remove both the counter and the timer
    pub async fn clear(&self, key: &str) -> Result<()> {
        self.store.forget(key).await?;
        self.store.forget(&rate_limit_timer_key(key)).await?;
        Ok(())
    }

    /// Run `action` unless `key` already made `max_calls` calls this window
    pub async fn throttle<F, Fut, T>(
        &self,
        key: &str,
        max_calls: i64,
        decay: Duration,
        action: F,
    ) -> Result<ThrottleResponse<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.too_many_attempts(key, max_calls).await? {
            return Ok(ThrottleResponse::throttled(self.available_in(key).await?));
        }

        if self.hit(key, decay).await? > max_calls {
            return Ok(ThrottleResponse::throttled(self.available_in(key).await?));
        }

        let value = action().await?;
        let remaining = self.attempts_left(key, max_calls).await? + 1;
        Ok(ThrottleResponse {
            throttled: false,
            remaining,
            retry_after: Duration::ZERO,
            value: Some(value),
        })
    }
}
