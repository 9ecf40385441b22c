//! Error types for cache operations.

use std::path::PathBuf;

use geomemo_config::CacheConfig;

/// Errors that can occur during cache operations.
///
/// Reads and writes never return these directly: they are carried inside
/// [`Lookup::ReadError`](crate::Lookup::ReadError) and
/// [`WriteOutcome::Failed`](crate::WriteOutcome::Failed) so a broken entry
/// degrades to a recomputation. Construction, invalidation and clearing
/// return them as hard errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading, writing or removing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry file has an invalid or missing header.
    #[error("invalid entry header in {path}: {reason}")]
    InvalidHeader {
        /// The entry file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the checksum of the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: String,
        /// The checksum computed from the payload.
        actual: String,
    },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The shared cache was already initialized with a different configuration.
    #[error("shared cache already configured with {existing:?}, refusing {requested:?}")]
    AlreadyConfigured {
        /// Configuration the shared cache was created with.
        existing: Box<CacheConfig>,
        /// Configuration passed to the rejected call.
        requested: Box<CacheConfig>,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
