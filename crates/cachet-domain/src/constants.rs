//! Domain constants
//!
//! Persisted key layouts. These must stay bit-exact to interoperate with
//! data already written by other clients.

/// Prefix of the key holding a tag's version token (`tag:<name>:key`)
pub const TAG_KEY_PREFIX: &str = "tag:";

/// Suffix of the key holding a tag's version token
pub const TAG_KEY_SUFFIX: &str = ":key";

/// Separator between version tokens inside a namespace
pub const NAMESPACE_SEPARATOR: char = '|';

/// Separator between the hashed namespace and the logical key
pub const TAGGED_KEY_SEPARATOR: &str = ":";

/// Suffix of the per-segment forever-key index list
pub const FOREVER_KEY_SUFFIX: &str = ":forever";

/// Suffix appended to a rate-limited identity for its window timer
pub const RATE_LIMIT_TIMER_SUFFIX: &str = ":timer";

/// Largest relative expiry memcached accepts; larger values are unix timestamps
pub const MEMCACHED_MAX_RELATIVE_TTL_SECS: u64 = 60 * 60 * 24 * 30;

/// Build the key that stores a tag's current version token
pub fn tag_key(name: &str) -> String {
    format!("{TAG_KEY_PREFIX}{name}{TAG_KEY_SUFFIX}")
}

/// Build the forever-key index list key for one namespace segment
pub fn forever_key(prefix: &str, segment: &str) -> String {
    format!("{prefix}{segment}{FOREVER_KEY_SUFFIX}")
}

/// Build the window timer key for a rate-limited identity
pub fn rate_limit_timer_key(key: &str) -> String {
    format!("{key}{RATE_LIMIT_TIMER_SUFFIX}")
}
