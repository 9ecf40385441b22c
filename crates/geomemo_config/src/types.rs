//! Configuration types deserialized from `geomemo.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Store directory used when none is configured.
pub const DEFAULT_CACHE_DIR: &str = ".geometry_cache";

/// The top-level configuration parsed from `geomemo.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct GeomemoConfig {
    /// Settings for the on-disk artifact cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Settings for one artifact cache instance.
///
/// When `enabled` is false, reads always miss and writes are skipped, but
/// invalidation and clearing still act on whatever is already on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Directory holding the cache entries.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Whether reads and writes go to disk.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            enabled: default_enabled(),
        }
    }
}

impl CacheConfig {
    /// Creates an enabled configuration rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// Returns this configuration with the enabled flag set to `enabled`.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the store directory, resolving a relative `dir` against
    /// `project_dir`.
    pub fn resolve_dir(&self, project_dir: &Path) -> PathBuf {
        if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            project_dir.join(&self.dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.dir, PathBuf::from(".geometry_cache"));
        assert!(config.enabled);
    }

    #[test]
    fn builder_sets_fields() {
        let config = CacheConfig::new("/var/cache/geo").with_enabled(false);
        assert_eq!(config.dir, PathBuf::from("/var/cache/geo"));
        assert!(!config.enabled);
    }

    #[test]
    fn resolve_relative_dir() {
        let config = CacheConfig::default();
        let resolved = config.resolve_dir(Path::new("/work/sim"));
        assert_eq!(resolved, PathBuf::from("/work/sim/.geometry_cache"));
    }

    #[test]
    fn resolve_absolute_dir_unchanged() {
        let dir = std::env::temp_dir().join("geo-cache");
        let config = CacheConfig::new(&dir);
        assert_eq!(config.resolve_dir(Path::new("/work/sim")), dir);
    }

    #[test]
    fn empty_table_uses_defaults() {
        let config: GeomemoConfig = toml::from_str("[cache]\n").unwrap();
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn unknown_cache_field_rejected() {
        let result = toml::from_str::<GeomemoConfig>("[cache]\nmax_size = 10\n");
        assert!(result.is_err());
    }
}
