//! Infrastructure constants
//!
//! Configuration file names, environment prefixes and defaults.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cachet.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "cachet";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CACHET";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// STORE CONSTANTS
// ============================================================================

/// Default in-process store capacity (entries)
pub const DEFAULT_MEMORY_MAX_CAPACITY: u64 = 100_000;

/// Default in-process expiry sweep interval in milliseconds
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Default connect timeout for network backends in milliseconds
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "CACHET_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "cachet";
