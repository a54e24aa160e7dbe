//! Configuration types module

pub mod app;
pub mod logging;
pub mod store;

// Re-export main types
pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use store::{
    BackendConfig, BackendKind, EncoderKind, MemcachedConfig, MemoryConfig, RedisConfig,
    StoreConfig,
};
