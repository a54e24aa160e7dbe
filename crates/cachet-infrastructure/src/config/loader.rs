//! Configuration loader
//!
//! Handles loading configuration from default values, a TOML file and
//! environment variables, then validates the result before anything
//! connects.

use crate::config::{AppConfig, BackendConfig, LoggingConfig, StoreConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use cachet_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default location found)
    /// 3. Environment variables, e.g. `CACHET_STORE__KIND=redis`
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).serialization_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join("config")
                .join(DEFAULT_CONFIG_FILENAME),
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|path| path.is_file())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_store_config(&config.store)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validate the store section
///
/// At most one backend section may be present, it must match `kind`, and
/// network backends need a non-empty URL and a non-zero timeout.
pub fn validate_store_config(config: &StoreConfig) -> Result<()> {
    let configured = config.configured_kinds();
    if configured.len() > 1 {
        return Err(Error::configuration(format!(
            "Exactly one backend section may be configured, found {configured:?}"
        )));
    }
    if let Some(other) = configured.first() {
        if *other != config.kind {
            return Err(Error::configuration(format!(
                "Store kind is {} but the [store.{other}] section is configured",
                config.kind
            )));
        }
    }

    match config.backend_config()? {
        BackendConfig::Memory(memory) => {
            if memory.max_capacity == 0 {
                return Err(Error::configuration("Memory store capacity cannot be 0"));
            }
        }
        BackendConfig::Redis(redis) => {
            validate_remote("redis", &redis.url, redis.connection_timeout_ms)?;
        }
        BackendConfig::Memcached(memcached) => {
            validate_remote("memcached", &memcached.url, memcached.connection_timeout_ms)?;
        }
    }
    Ok(())
}

fn validate_remote(backend: &str, url: &str, timeout_ms: u64) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::configuration(format!("{backend} URL cannot be empty")));
    }
    if timeout_ms == 0 {
        return Err(Error::configuration(format!(
            "{backend} connection timeout cannot be 0"
        )));
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set store configuration
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Set the key prefix
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.store.prefix = prefix.into();
        self
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
