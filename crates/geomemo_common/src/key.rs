//! Cache keys derived from SHA-256 digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Number of digest bytes kept in a key (128 bits, 32 hex characters).
const KEY_BYTES: usize = 16;

/// Length of a key's textual form.
pub const KEY_HEX_LEN: usize = KEY_BYTES * 2;

/// A 128-bit key addressing one cache entry.
///
/// Computed as the leading 16 bytes of a SHA-256 digest and rendered as 32
/// lowercase hexadecimal characters. The textual form doubles as the entry's
/// filename stem, so it is stable across processes and platforms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey([u8; KEY_BYTES]);

impl CacheKey {
    /// Hashes `data` with SHA-256 and truncates the digest to 128 bits.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; KEY_BYTES];
        bytes.copy_from_slice(&digest[..KEY_BYTES]);
        Self(bytes)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    /// Returns the 32-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Error returned when a string is not a valid [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    /// The string does not have exactly 32 characters.
    #[error("cache key must be 32 hex characters, got {0}")]
    InvalidLength(usize),

    /// The string contains non-hexadecimal characters.
    #[error("cache key must contain only hex digits: {0}")]
    InvalidHex(String),
}

impl FromStr for CacheKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != KEY_HEX_LEN {
            return Err(ParseKeyError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; KEY_BYTES];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deterministic() {
        let a = CacheKey::from_bytes(b"hello world");
        let b = CacheKey::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = CacheKey::from_bytes(b"hello");
        let b = CacheKey::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_truncated_sha256() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad
        let key = CacheKey::from_bytes(b"abc");
        assert_eq!(key.to_string(), "ba7816bf8f01cfea414140de5dae2223");
        assert_eq!(key.to_hex(), key.to_string());
    }

    #[test]
    fn display_matches_to_hex() {
        let inputs: [&[u8]; 3] = [b"", b"abc", b"\x00\xff"];
        for data in inputs {
            let key = CacheKey::from_bytes(data);
            assert_eq!(format!("{key}"), key.to_hex());
            assert_eq!(format!("{key}"), hex::encode(key.as_bytes()));
        }
    }

    #[test]
    fn display_format() {
        let s = CacheKey::from_bytes(b"test").to_string();
        assert_eq!(s.len(), KEY_HEX_LEN);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", CacheKey::from_bytes(b"test"));
        assert!(s.starts_with("CacheKey("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn parse_accepts_uppercase() {
        let key: CacheKey = "BA7816BF8F01CFEA414140DE5DAE2223".parse().unwrap();
        assert_eq!(key, CacheKey::from_bytes(b"abc"));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "abc123".parse::<CacheKey>().unwrap_err();
        assert_eq!(err, ParseKeyError::InvalidLength(6));
        assert!(err.to_string().contains("32 hex characters"));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = "zz7816bf8f01cfea414140de5dae2223"
            .parse::<CacheKey>()
            .unwrap_err();
        assert!(matches!(err, ParseKeyError::InvalidHex(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let key = CacheKey::from_bytes(b"serde test");
        let json = serde_json::to_string(&key).unwrap();
        let back: CacheKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    proptest! {
        #[test]
        fn display_parses_back(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let key = CacheKey::from_bytes(&data);
            let parsed: CacheKey = key.to_string().parse().unwrap();
            prop_assert_eq!(parsed, key);
        }
    }
}
