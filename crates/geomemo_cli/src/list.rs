//! `geomemo list` — show the entries currently stored.

use serde_json::json;

use crate::project::open_cache;
use crate::{GlobalArgs, ListArgs, ReportFormat};

/// Runs the `geomemo list` command.
///
/// Prints one line per entry (key and size, plus the path with `--verbose`)
/// followed by a summary, or a JSON document with `--format json`.
pub fn run(args: &ListArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cache = open_cache(global)?;
    let entries = cache.entries()?;
    let total: u64 = entries.iter().map(|e| e.size).sum();

    match args.format {
        ReportFormat::Text => {
            for entry in &entries {
                if global.verbose {
                    println!("{}  {:>10}  {}", entry.key, entry.size, entry.path.display());
                } else {
                    println!("{}  {:>10}", entry.key, entry.size);
                }
            }
            if !global.quiet {
                eprintln!(
                    "    {} entries, {} bytes in {}{}",
                    entries.len(),
                    total,
                    cache.dir().display(),
                    if cache.is_enabled() { "" } else { " (caching disabled)" }
                );
            }
        }
        ReportFormat::Json => {
            let listed: Vec<_> = entries
                .iter()
                .map(|e| json!({ "key": e.key.to_string(), "size": e.size }))
                .collect();
            let doc = json!({
                "dir": cache.dir().display().to_string(),
                "enabled": cache.is_enabled(),
                "entries": listed,
                "total_bytes": total,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::global_for;
    use geomemo_cache::CacheKey;

    #[test]
    fn list_text_and_json() {
        let tmp = tempfile::tempdir().unwrap();
        let global = global_for(tmp.path());
        let cache = open_cache(&global).unwrap();
        cache.set(&CacheKey::from_bytes(b"a"), &[0u8; 8]);

        let text = ListArgs {
            format: ReportFormat::Text,
        };
        let json = ListArgs {
            format: ReportFormat::Json,
        };
        assert_eq!(run(&text, &global).unwrap(), 0);
        assert_eq!(run(&json, &global).unwrap(), 0);
    }

    #[test]
    fn list_empty_store() {
        let tmp = tempfile::tempdir().unwrap();
        let args = ListArgs {
            format: ReportFormat::Text,
        };
        assert_eq!(run(&args, &global_for(tmp.path())).unwrap(), 0);
    }
}
