// Clippy allows for nested config checks
#![allow(clippy::collapsible_if)]

//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the cachet core: loading and
//! validating configuration, initialising logging and turning a validated
//! configuration into a connected store.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`factory`] | Store construction from a backend kind and its config |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers for foreign errors |
//! | [`constants`] | Configuration defaults |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use factory::{StoreFactory, StoreOptions};
