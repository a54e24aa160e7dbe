//! Store configuration types
//!
//! One section per backend kind. At most one section may be present and it
//! must match `kind`; the in-process backend falls back to defaults when its
//! section is omitted.

use crate::constants::{
    DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_MEMORY_MAX_CAPACITY, DEFAULT_SWEEP_INTERVAL_MS,
};
use cachet_domain::Encoder;
use cachet_domain::error::{Error, Result};
use cachet_providers::constants::{MEMCACHED_DEFAULT_URL, REDIS_DEFAULT_URL};
use cachet_providers::encoding::{JsonEncoder, MessagePackEncoder};
use cachet_providers::lock::MemoryLockKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process map (Moka)
    #[default]
    Memory,
    /// Remote key/value service (Redis)
    Redis,
    /// Remote slab cache (Memcached)
    Memcached,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::Memcached => "memcached",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value encodings for the network backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    #[default]
    Json,
    Msgpack,
}

impl EncoderKind {
    /// Build the encoder
    pub fn encoder(&self) -> Arc<dyn Encoder> {
        match self {
            Self::Json => Arc::new(JsonEncoder),
            Self::Msgpack => Arc::new(MessagePackEncoder),
        }
    }
}

/// In-process store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum number of entries
    pub max_capacity: u64,

    /// Expiry sweep interval in milliseconds; 0 disables the sweep
    pub sweep_interval_ms: u64,

    /// Lock primitive flavour
    pub lock: MemoryLockKind,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MEMORY_MAX_CAPACITY,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            lock: MemoryLockKind::default(),
        }
    }
}

impl MemoryConfig {
    /// Sweep interval, `None` when disabled
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }
}

/// Redis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL
    pub url: String,

    /// Connect timeout in milliseconds
    pub connection_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: REDIS_DEFAULT_URL.to_string(),
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
        }
    }
}

/// Memcached settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcachedConfig {
    /// Server address
    pub url: String,

    /// Connect timeout in milliseconds
    pub connection_timeout_ms: u64,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        Self {
            url: MEMCACHED_DEFAULT_URL.to_string(),
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
        }
    }
}

/// Settings of exactly one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Memory(MemoryConfig),
    Redis(RedisConfig),
    Memcached(MemcachedConfig),
}

impl BackendConfig {
    /// The backend kind these settings belong to
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory(_) => BackendKind::Memory,
            Self::Redis(_) => BackendKind::Redis,
            Self::Memcached(_) => BackendKind::Memcached,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend to use
    pub kind: BackendKind,

    /// Prefix for tagged-item and forever-index keys
    pub prefix: String,

    /// Encoding for non-numeric values on network backends
    pub encoder: EncoderKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memcached: Option<MemcachedConfig>,
}

impl StoreConfig {
    /// Configuration for the in-process store
    pub fn memory(config: MemoryConfig) -> Self {
        Self {
            kind: BackendKind::Memory,
            memory: Some(config),
            ..Self::default()
        }
    }

    /// Configuration for a Redis store
    pub fn redis(config: RedisConfig) -> Self {
        Self {
            kind: BackendKind::Redis,
            redis: Some(config),
            ..Self::default()
        }
    }

    /// Configuration for a Memcached store
    pub fn memcached(config: MemcachedConfig) -> Self {
        Self {
            kind: BackendKind::Memcached,
            memcached: Some(config),
            ..Self::default()
        }
    }

    /// Kinds whose section is present
    pub fn configured_kinds(&self) -> Vec<BackendKind> {
        let mut kinds = Vec::new();
        if self.memory.is_some() {
            kinds.push(BackendKind::Memory);
        }
        if self.redis.is_some() {
            kinds.push(BackendKind::Redis);
        }
        if self.memcached.is_some() {
            kinds.push(BackendKind::Memcached);
        }
        kinds
    }

    /// The settings of the selected backend
    pub fn backend_config(&self) -> Result<BackendConfig> {
        match self.kind {
            BackendKind::Memory => Ok(BackendConfig::Memory(
                self.memory.clone().unwrap_or_default(),
            )),
            BackendKind::Redis => self
                .redis
                .clone()
                .map(BackendConfig::Redis)
                .ok_or_else(|| missing_section(self.kind)),
            BackendKind::Memcached => self
                .memcached
                .clone()
                .map(BackendConfig::Memcached)
                .ok_or_else(|| missing_section(self.kind)),
        }
    }
}

fn missing_section(kind: BackendKind) -> Error {
    Error::configuration(format!(
        "Store kind is {kind} but no [store.{kind}] section is configured"
    ))
}
