//! Entry lifetime
//!
//! Backends disagree on how "never expire" is spelled (no TTL argument, zero,
//! minus one). [`Ttl::Forever`] is the single sentinel callers use; each
//! adapter translates it to its own convention.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long an entry lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Ttl {
    /// The entry never expires
    #[default]
    Forever,
    /// The entry expires after the given duration
    After(Duration),
}

impl Ttl {
    /// Expiry after a number of seconds; zero means forever
    pub fn secs(secs: u64) -> Self {
        Duration::from_secs(secs).into()
    }

    /// Expiry after a number of milliseconds; zero means forever
    pub fn millis(millis: u64) -> Self {
        Duration::from_millis(millis).into()
    }

    /// The finite duration, if any
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Forever => None,
            Self::After(d) => Some(*d),
        }
    }

    /// Whether this is the never-expire sentinel
    pub fn is_forever(&self) -> bool {
        matches!(self, Self::Forever)
    }

    /// Whole seconds, rounded up so sub-second lifetimes never become zero
    pub fn as_secs_ceil(&self) -> Option<u64> {
        self.duration().map(|d| {
            let secs = d.as_secs();
            if d.subsec_nanos() > 0 { secs + 1 } else { secs }
        })
    }

    /// Whole milliseconds, at least one
    pub fn as_millis_ceil(&self) -> Option<u64> {
        self.duration()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX).max(1))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Forever
        } else {
            Self::After(duration)
        }
    }
}

impl From<Option<Duration>> for Ttl {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Self::Forever, Self::from)
    }
}
