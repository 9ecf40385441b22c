//! Disk-backed memoization cache for geometry primitives.
//!
//! Expensive simulation results (eclipse intervals, access windows,
//! rate-vs-elevation tables) are stored one file per key in a single
//! directory. Keys are derived deterministically from call arguments, so a
//! result computed in one run is reused by the next.

#![warn(missing_docs)]

mod canonical;
mod entry;
pub mod error;
pub mod key;
pub mod memo;
pub mod shared;
pub mod store;

pub use error::CacheError;
pub use geomemo_common::CacheKey;
pub use geomemo_config::CacheConfig;
pub use key::{cache_key, key_for_call, CallArgs};
pub use memo::Memoized;
pub use store::{ArtifactCache, EntryInfo, Lookup, WriteOutcome, ENTRY_EXT};
