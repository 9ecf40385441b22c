//! Shared helpers for CLI commands: locating the configuration and opening
//! the cache it describes.

use std::path::{Path, PathBuf};

use geomemo_cache::ArtifactCache;
use geomemo_config::{load_config_or_default, CacheConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `geomemo.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolves the project directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `geomemo.toml`,
/// falling back to the current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        let cwd = std::env::current_dir()?;
        Ok(find_project_root(&cwd).unwrap_or(cwd))
    }
}

/// Builds the cache configuration for `project_dir`, applying `--dir`.
pub fn resolve_cache_config(
    project_dir: &Path,
    dir_override: Option<&Path>,
) -> Result<CacheConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_or_default(project_dir)?.cache;
    if let Some(dir) = dir_override {
        config.dir = dir.to_path_buf();
    }
    config.dir = config.resolve_dir(project_dir);
    Ok(config)
}

/// Opens the cache selected by the global CLI args.
pub fn open_cache(global: &GlobalArgs) -> Result<ArtifactCache, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = resolve_cache_config(&project_dir, global.dir.as_deref())?;
    tracing::debug!(dir = %config.dir.display(), enabled = config.enabled, "opening cache");
    Ok(ArtifactCache::new(config)?)
}
