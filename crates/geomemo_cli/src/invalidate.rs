//! `geomemo invalidate` — remove a single cached entry.

use geomemo_cache::CacheKey;

use crate::project::open_cache;
use crate::GlobalArgs;

/// Runs the `geomemo invalidate` command.
///
/// Validates `key`, removes its entry and reports whether one existed.
/// A missing entry is not an error.
pub fn run(key: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let key: CacheKey = key.parse()?;
    let cache = open_cache(global)?;
    let removed = cache.invalidate(&key)?;
    if !global.quiet {
        if removed {
            eprintln!("    Removed {key}");
        } else {
            eprintln!("    No entry for {key}");
        }
    }
    Ok(0)
}
