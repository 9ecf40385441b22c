//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::GeomemoConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "geomemo.toml";

/// Loads and validates a `geomemo.toml` configuration from a project directory.
///
/// Reads `<project_dir>/geomemo.toml`, parses it, and validates it.
pub fn load_config(project_dir: &Path) -> Result<GeomemoConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Like [`load_config`], but returns the default configuration when the
/// project has no `geomemo.toml`.
pub fn load_config_or_default(project_dir: &Path) -> Result<GeomemoConfig, ConfigError> {
    match load_config(project_dir) {
        Err(ConfigError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(GeomemoConfig::default())
        }
        other => other,
    }
}

/// Parses and validates a `geomemo.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<GeomemoConfig, ConfigError> {
    let config: GeomemoConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GeomemoConfig) -> Result<(), ConfigError> {
    if config.cache.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.dir must not be empty".to_string(),
        ));
    }
    Ok(())
}
