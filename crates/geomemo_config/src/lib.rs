//! Parsing and validation of `geomemo.toml` cache configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`GeomemoConfig`] whose [`CacheConfig`] names the store directory and
//! whether caching is enabled.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, CONFIG_FILE};
pub use types::{CacheConfig, GeomemoConfig, DEFAULT_CACHE_DIR};
