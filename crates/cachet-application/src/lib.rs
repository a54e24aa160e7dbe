//! Application Layer - cachet
//!
//! The backend-independent core. Everything here talks to a backend only
//! through the `Store` port, so the same tag, lock and rate-limit logic runs
//! unchanged over the in-process map, Redis or Memcached.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Cache`] | Shared store handle; entry point for tags, locks and rate limiting |
//! | [`TagSet`] | Resolves a tag list to its current namespace |
//! | [`TaggedCache`] | Store view with every key remapped through a namespace |
//! | [`Lock`] | `get` / `block` orchestration over a backend lock primitive |
//! | [`RateLimiter`] | Fixed-window counter built from `add` and `increment` |

pub mod cache;
pub mod lock;
pub mod rate_limiter;
pub mod tags;

pub use cache::Cache;
pub use lock::{Lock, LockOutcome};
pub use rate_limiter::{RateLimiter, ThrottleResponse};
pub use tags::{TagSet, TaggedCache};
