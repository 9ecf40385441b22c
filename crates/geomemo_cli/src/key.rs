//! `geomemo key` — compute the key of a time-windowed query.

use chrono::DateTime;
use geomemo_cache::cache_key;

use crate::KeyArgs;

/// Runs the `geomemo key` command, printing the key to stdout.
pub fn run(args: &KeyArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let key = compute(args)?;
    println!("{key}");
    Ok(0)
}

fn compute(args: &KeyArgs) -> Result<String, Box<dyn std::error::Error>> {
    let start = DateTime::parse_from_rfc3339(&args.start)
        .map_err(|e| format!("invalid start timestamp '{}': {e}", args.start))?;
    let end = DateTime::parse_from_rfc3339(&args.end)
        .map_err(|e| format!("invalid end timestamp '{}': {e}", args.end))?;
    Ok(cache_key(&args.identifier, &start, &end, &args.config_hash).to_string())
}
