//! Tag-based invalidation
//!
//! Invalidation is namespace rotation, not key deletion. A tag set resolves
//! to the `|`-joined version tokens of its tags; tagged keys are derived from
//! a hash of that namespace. Resetting any tag changes the namespace, so
//! every key written under the old one becomes unreachable at once.

pub mod tag_set;
pub mod tagged;

pub use tag_set::TagSet;
pub use tagged::TaggedCache;
