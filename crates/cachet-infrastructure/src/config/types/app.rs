//! Top-level configuration

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Complete cachet configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend selection and settings
    pub store: StoreConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}
