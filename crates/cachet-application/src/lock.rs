//! Lock orchestration
//!
//! A [`Lock`] is a (name, owner, ttl) triple bound to one backend's
//! [`LockPrimitive`]. The primitive does the atomic work; this module adds
//! the two call patterns on top of it:
//!
//! - [`Lock::get`]: one attempt; the action runs only if the lock was taken.
//! - [`Lock::block`]: poll at a fixed interval until taken or out of time.
//!
//! In both cases a taken lock is always released after the action, whether
//! or not the action succeeded. Locks are not re-entrant.

use cachet_domain::LockPrimitive;
use cachet_domain::error::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// What happened to a lock-guarded action
///
/// `acquired` reports the acquisition only. When it is `false` the action
/// never ran and `result` is `Ok(None)`, unless acquiring itself failed.
#[derive(Debug)]
pub struct LockOutcome<T> {
    /// Whether the lock was taken
    pub acquired: bool,
    /// The action's value, or the action/release/backend error
    pub result: Result<Option<T>>,
}

impl<T> LockOutcome<T> {
    fn not_acquired() -> Self {
        Self {
            acquired: false,
            result: Ok(None),
        }
    }

    fn failed(error: Error) -> Self {
        Self {
            acquired: false,
            result: Err(error),
        }
    }

    /// Drop the acquisition flag and keep the result
    pub fn into_result(self) -> Result<Option<T>> {
        self.result
    }
}

/// A named lock held on behalf of an owner token
#[derive(Debug, Clone)]
pub struct Lock {
    primitive: Arc<dyn LockPrimitive>,
    name: String,
    owner: String,
    ttl: Duration,
}

impl Lock {
    /// Bind a lock to a primitive
    ///
    /// A zero `ttl` means the lock never expires on its own.
    pub fn new(
        primitive: Arc<dyn LockPrimitive>,
        name: impl Into<String>,
        owner: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            primitive,
            name: name.into(),
            owner: owner.into(),
            ttl,
        }
    }

    /// A fresh random owner token
    pub fn new_owner() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Try once to take the lock
    pub async fn acquire(&self) -> Result<bool> {
        let acquired = self
            .primitive
            .acquire(&self.name, &self.owner, self.ttl)
            .await?;
        debug!(lock = %self.name, owner = %self.owner, acquired = acquired, "Lock acquire");
        Ok(acquired)
    }

    /// Release the lock if this owner holds it
    pub async fn release(&self) -> Result<bool> {
        let released = self.primitive.release(&self.name, &self.owner).await?;
        if !released {
            warn!(lock = %self.name, owner = %self.owner, "Lock was not held by this owner at release");
        }
        Ok(released)
    }

    /// Release the lock whoever holds it
    pub async fn force_release(&self) -> Result<()> {
        self.primitive.force_release(&self.name).await
    }

    /// Owner token of the current holder
    pub async fn current_owner(&self) -> Result<Option<String>> {
        self.primitive.current_owner(&self.name).await
    }

    /// Run `action` if the lock can be taken right now
    pub async fn get<F, Fut, T>(&self, action: F) -> LockOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.acquire().await {
            Ok(true) => self.run_and_release(action).await,
            Ok(false) => LockOutcome::not_acquired(),
            Err(e) => LockOutcome::failed(e),
        }
    }

    /// Wait up to `wait` for the lock, polling every `interval`, then run `action`
    pub async fn block<F, Fut, T>(&self, interval: Duration, wait: Duration, action: F) -> LockOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.block_acquire(interval, wait).await {
            Ok(()) => self.run_and_release(action).await,
            Err(e) => LockOutcome::failed(e),
        }
    }

    /// Wait up to `wait` for the lock, polling every `interval`
    ///
    /// Fails with [`Error::LockWaitTimeout`] when the budget runs out; the
    /// caller is responsible for releasing a lock taken this way.
    pub async fn block_acquire(&self, interval: Duration, wait: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.acquire().await? {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= wait {
                warn!(lock = %self.name, waited = ?waited, "Lock wait timed out");
                return Err(Error::lock_wait_timeout(&self.name, waited));
            }
            tokio::time::sleep(interval.min(wait - waited)).await;
        }
    }

    async fn run_and_release<F, Fut, T>(&self, action: F) -> LockOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = action().await;
        let released = self.release().await;

        let result = match (outcome, released) {
            (Ok(value), Ok(_)) => Ok(Some(value)),
            (Err(action_error), Ok(_)) => Err(action_error),
            (Ok(_), Err(release_error)) => Err(release_error),
            (Err(action_error), Err(release_error)) => {
                Err(Error::aggregate(vec![action_error, release_error]))
            }
        };
        LockOutcome {
            acquired: true,
            result,
        }
    }
}
