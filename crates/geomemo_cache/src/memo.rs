//! Memoizing wrapper around arbitrary computations.

use std::fmt;

use geomemo_common::CacheKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::key::key_for_call;
use crate::store::{ArtifactCache, Lookup};

impl ArtifactCache {
    /// Returns the value stored under `key`, or computes, stores and returns it.
    ///
    /// Unreadable entries are recomputed and overwritten. A failed store is
    /// logged by [`ArtifactCache::set`] and otherwise ignored: the computed
    /// value is returned either way.
    pub fn get_or_compute<R, F>(&self, key: &CacheKey, compute: F) -> R
    where
        R: Serialize + DeserializeOwned,
        F: FnOnce() -> R,
    {
        if let Lookup::Found(value) = self.get(key) {
            return value;
        }
        let value = compute();
        self.set(key, &value);
        value
    }

    /// Wraps `func` so that results are cached under `name` and the input.
    ///
    /// Results must round-trip through bincode; see [`ArtifactCache::set`]
    /// for the types that do not, which are recomputed on every call.
    ///
    /// ```no_run
    /// use geomemo_cache::{ArtifactCache, CacheConfig};
    ///
    /// let cache = ArtifactCache::new(CacheConfig::default())?;
    /// let eclipses = cache.memoize("eclipse_intervals", |(sat, orbits): (&str, u32)| {
    ///     vec![(sat.len() as f64, f64::from(orbits))]
    /// });
    /// let first = eclipses.call(("SAT-1", 3));
    /// let second = eclipses.call(("SAT-1", 3)); // served from disk
    /// assert_eq!(first, second);
    /// # Ok::<(), geomemo_cache::CacheError>(())
    /// ```
    pub fn memoize<F>(&self, name: impl Into<String>, func: F) -> Memoized<'_, F> {
        Memoized {
            cache: self,
            name: name.into(),
            func,
        }
    }
}

/// A computation whose results are cached in an [`ArtifactCache`].
///
/// Created by [`ArtifactCache::memoize`]. Calling it with an input that was
/// seen before (in this or an earlier process) returns the stored result
/// without running the computation.
pub struct Memoized<'c, F> {
    cache: &'c ArtifactCache,
    name: String,
    func: F,
}

impl<'c, F> Memoized<'c, F> {
    /// Returns the name the results are keyed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key `input` is cached under.
    pub fn key_for<A: Serialize + fmt::Debug>(&self, input: &A) -> CacheKey {
        key_for_call(&self.name, input)
    }

    /// Runs the computation for `input`, or returns its cached result.
    pub fn call<A, R>(&self, input: A) -> R
    where
        F: Fn(A) -> R,
        A: Serialize + fmt::Debug,
        R: Serialize + DeserializeOwned,
    {
        let key = self.key_for(&input);
        self.cache.get_or_compute(&key, || (self.func)(input))
    }
}

impl<F> fmt::Debug for Memoized<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("dir", &self.cache.dir())
            .finish()
    }
}
