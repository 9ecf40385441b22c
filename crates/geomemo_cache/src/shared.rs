//! Process-wide shared cache.
//!
//! Prefer constructing an [`ArtifactCache`] at startup and passing it down.
//! This accessor exists for call sites that cannot thread a cache through.
//! The first successful initialization fixes the configuration for the life
//! of the process: re-initializing with an equal configuration returns the
//! existing instance, and re-initializing with a different one is an error.

use std::sync::OnceLock;

use geomemo_config::CacheConfig;

use crate::error::CacheError;
use crate::store::ArtifactCache;

static SHARED: OnceLock<ArtifactCache> = OnceLock::new();

/// Initializes the shared cache with `config`, or returns the existing one.
///
/// Returns [`CacheError::AlreadyConfigured`] if the shared cache already
/// exists with a different configuration, and the construction error if the
/// store directory cannot be created.
pub fn init(config: CacheConfig) -> Result<&'static ArtifactCache, CacheError> {
    if let Some(existing) = SHARED.get() {
        return ensure_same(existing, config);
    }
    let cache = ArtifactCache::new(config.clone())?;
    // A concurrent caller may have installed its own instance first.
    let installed = SHARED.get_or_init(|| cache);
    ensure_same(installed, config)
}

/// Returns the shared cache, creating it with the default configuration if
/// nothing has initialized it yet.
pub fn cache() -> Result<&'static ArtifactCache, CacheError> {
    if let Some(existing) = SHARED.get() {
        return Ok(existing);
    }
    let cache = ArtifactCache::new(CacheConfig::default())?;
    Ok(SHARED.get_or_init(|| cache))
}

/// Returns the shared cache if it has been initialized.
pub fn get() -> Option<&'static ArtifactCache> {
    SHARED.get()
}

fn ensure_same(
    existing: &'static ArtifactCache,
    requested: CacheConfig,
) -> Result<&'static ArtifactCache, CacheError> {
    if *existing.config() == requested {
        Ok(existing)
    } else {
        Err(CacheError::AlreadyConfigured {
            existing: Box::new(existing.config().clone()),
            requested: Box::new(requested),
        })
    }
}
