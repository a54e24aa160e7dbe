//! Configuration
//!
//! Typed configuration records, the figment-based loader and validation.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
