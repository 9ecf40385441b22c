//! Shared foundational types for the geomemo geometry cache.
//!
//! This crate provides the [`CacheKey`] type that addresses cache entries on
//! disk, along with its parse error.

#![warn(missing_docs)]

pub mod key;

pub use key::{CacheKey, ParseKeyError};
