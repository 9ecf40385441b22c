//! File-per-key artifact store.
//!
//! The [`ArtifactCache`] keeps one file per key in a single directory. Reads
//! and writes are soft: a missing, unreadable or corrupt entry is reported as
//! a [`Lookup`] variant and a failed write as a [`WriteOutcome`], never as a
//! hard error, so a broken cache only costs a recomputation. Removal is hard:
//! [`ArtifactCache::invalidate`] and [`ArtifactCache::clear`] return errors
//! when a file cannot be deleted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use geomemo_common::CacheKey;
use geomemo_config::CacheConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entry;
use crate::error::CacheError;

/// File extension of cache entries.
pub const ENTRY_EXT: &str = "pkl";

/// Result of reading one entry.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The entry exists and decoded successfully.
    Found(T),
    /// No entry is stored for the key, or caching is disabled.
    Absent,
    /// An entry exists but could not be read or decoded.
    ReadError(CacheError),
}

impl<T> Lookup<T> {
    /// Returns `true` for [`Lookup::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into an `Option`, treating read errors as misses.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::ReadError(_) => None,
        }
    }
}

/// Result of writing one entry.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The entry was written to disk.
    Written,
    /// Caching is disabled; nothing was written.
    Skipped,
    /// The write failed; a later read of the key will miss.
    Failed(CacheError),
}

impl WriteOutcome {
    /// Returns `true` for [`WriteOutcome::Written`].
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

/// An entry found on disk by [`ArtifactCache::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// The entry's key.
    pub key: CacheKey,
    /// Full path of the entry file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// Disk-backed key/value cache holding one file per key.
///
/// Entries live at `<dir>/<key>.pkl`. There is no index besides the directory
/// listing, no eviction and no locking: processes sharing a directory share
/// its entries without coordination.
#[derive(Debug)]
pub struct ArtifactCache {
    config: CacheConfig,
}

impl ArtifactCache {
    /// Creates a cache for `config`.
    ///
    /// When caching is enabled the store directory is created (recursively,
    /// idempotently); failure to create it is returned as an error. A
    /// disabled cache never creates the directory.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let cache = Self { config };
        if cache.config.enabled {
            cache.ensure_dir()?;
        }
        Ok(cache)
    }

    /// Returns the configuration this cache was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Returns whether reads and writes go to disk.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns the file path for the entry with the given key.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.config.dir.join(format!("{key}.{ENTRY_EXT}"))
    }

    fn ensure_dir(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.config.dir)
            .map_err(|e| CacheError::io(&self.config.dir, e))
    }

    /// Reads the value stored under `key`.
    ///
    /// Returns [`Lookup::Absent`] without touching disk when caching is
    /// disabled. Read and decode failures are logged at warn level and
    /// returned as [`Lookup::ReadError`].
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Lookup<T> {
        if !self.config.enabled {
            return Lookup::Absent;
        }

        let path = self.entry_path(key);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(%key, "cache miss");
                return Lookup::Absent;
            }
            Err(e) => return read_failed(key, CacheError::io(path, e)),
        };

        match entry::decode(&path, &raw) {
            Ok(value) => {
                tracing::debug!(%key, "cache hit");
                Lookup::Found(value)
            }
            Err(e) => read_failed(key, e),
        }
    }

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// Does nothing when caching is disabled. Encode and write failures are
    /// logged at warn level and returned as [`WriteOutcome::Failed`].
    ///
    /// Entries are bincode, which is not self-describing: types whose
    /// `Deserialize` impl needs `deserialize_any` (`serde_json::Value`,
    /// `#[serde(untagged)]` enums, `#[serde(flatten)]` fields) are written
    /// but every later [`ArtifactCache::get`] reports them as
    /// [`Lookup::ReadError`].
    pub fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> WriteOutcome {
        if !self.config.enabled {
            return WriteOutcome::Skipped;
        }

        match self.write_entry(key, value) {
            Ok(()) => {
                tracing::debug!(%key, "cache entry written");
                WriteOutcome::Written
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to write cache entry");
                WriteOutcome::Failed(e)
            }
        }
    }

    fn write_entry<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        let bytes = entry::encode(value)?;
        // The directory may have been removed since construction.
        self.ensure_dir()?;
        let path = self.entry_path(key);
        std::fs::write(&path, bytes).map_err(|e| CacheError::io(path, e))
    }

    /// Returns whether an entry file exists for `key`, regardless of whether
    /// caching is enabled.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entry_path(key).is_file()
    }

    /// Removes the entry for `key`.
    ///
    /// Returns `true` if a file was removed and `false` if none existed.
    /// Acts on disk even when caching is disabled.
    pub fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(%key, "cache entry invalidated");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    /// Removes every entry in the store directory and returns how many were
    /// removed.
    ///
    /// Only files with the entry extension are touched. A store directory
    /// that does not exist holds no entries. Acts on disk even when caching
    /// is disabled.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for path in self.entry_files()? {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(path, e)),
            }
        }
        tracing::debug!(dir = %self.config.dir.display(), removed, "cache cleared");
        Ok(removed)
    }

    /// Lists the entries currently on disk, sorted by key.
    ///
    /// Files with the entry extension whose stem is not a valid key are
    /// skipped.
    pub fn entries(&self) -> Result<Vec<EntryInfo>, CacheError> {
        let mut entries = Vec::new();
        for path in self.entry_files()? {
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<CacheKey>().ok())
            else {
                continue;
            };
            let size = std::fs::metadata(&path)
                .map_err(|e| CacheError::io(&path, e))?
                .len();
            entries.push(EntryInfo { key, path, size });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Collects the paths of all files carrying the entry extension.
    fn entry_files(&self) -> Result<Vec<PathBuf>, CacheError> {
        let dir = &self.config.dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let listing = std::fs::read_dir(dir).map_err(|e| CacheError::io(dir, e))?;
        for item in listing {
            let item = item.map_err(|e| CacheError::io(dir, e))?;
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXT) && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn read_failed<T>(key: &CacheKey, error: CacheError) -> Lookup<T> {
    tracing::warn!(%key, error = %error, "failed to read cache entry, treating as miss");
    Lookup::ReadError(error)
}
