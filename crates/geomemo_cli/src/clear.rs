//! `geomemo clear` — remove every cached entry.

use crate::project::open_cache;
use crate::GlobalArgs;

/// Runs the `geomemo clear` command.
///
/// Removes all entries from the configured store, even when caching is
/// disabled in the configuration. Prints the number of entries removed.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cache = open_cache(global)?;
    let removed = cache.clear()?;
    if !global.quiet {
        eprintln!("    Removed {removed} entries from {}", cache.dir().display());
    }
    Ok(0)
}
