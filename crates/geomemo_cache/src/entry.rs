//! On-disk entry format.
//!
//! Each entry file is a 4-byte little-endian header length, a bincode header
//! carrying magic bytes and a checksum of the payload, then the bincode
//! payload itself. The header lets a truncated or overwritten file surface as
//! a read error instead of decoding into garbage.

use std::path::Path;

use geomemo_common::CacheKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Magic bytes identifying a geomemo cache entry.
const ENTRY_MAGIC: [u8; 4] = *b"GMEM";

/// Header prepended to every entry for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EntryHeader {
    /// Magic bytes: must be `b"GMEM"`.
    pub magic: [u8; 4],

    /// Truncated SHA-256 of the payload bytes.
    pub checksum: CacheKey,
}

/// Encodes `value` into the full entry byte layout.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CacheError> {
    let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
    frame(ENTRY_MAGIC, &payload)
}

/// Wraps `payload` with a header using the given magic bytes.
fn frame(magic: [u8; 4], payload: &[u8]) -> Result<Vec<u8>, CacheError> {
    let header = EntryHeader {
        magic,
        checksum: CacheKey::from_bytes(payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(payload);
    Ok(output)
}

/// Validates the header of `raw` (read from `path`) and decodes the payload.
pub(crate) fn decode<T: DeserializeOwned>(path: &Path, raw: &[u8]) -> Result<T, CacheError> {
    let invalid = |reason: &str| CacheError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if raw.len() < 4 {
        return Err(invalid("file shorter than header length prefix"));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&raw[..4]);
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    if raw.len() - 4 < header_len {
        return Err(invalid("header length exceeds file size"));
    }

    let (header, _): (EntryHeader, usize) =
        bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
            .map_err(|e| invalid(&e.to_string()))?;

    if header.magic != ENTRY_MAGIC {
        return Err(invalid("missing magic bytes"));
    }

    let payload = &raw[4 + header_len..];
    let actual = CacheKey::from_bytes(payload);
    if actual != header.checksum {
        return Err(CacheError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: header.checksum.to_string(),
            actual: actual.to_string(),
        });
    }

    let (value, _) = bincode::serde::decode_from_slice(payload, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
    Ok(value)
}
