//! Deterministic key derivation from call arguments.
//!
//! Two forms are provided. The generic form hashes an ordered list of
//! positional values plus a set of named values; the domain form hashes the
//! identity of a time-windowed geometry query (target identifier, window
//! bounds and configuration hash). Both render a canonical JSON text with
//! every object's keys sorted, hash its UTF-8 bytes with SHA-256, and keep the
//! first 32 hex characters.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone};
use geomemo_common::CacheKey;
use serde::Serialize;
use serde_json::{json, Value};

use crate::canonical;

/// Positional and named arguments of one call, ready to be hashed.
///
/// Named arguments are kept sorted by name, so the order in which they are
/// added never affects the key. Adding the same name twice keeps the last
/// value.
///
/// ```
/// use geomemo_cache::CallArgs;
///
/// let a = CallArgs::new().arg("SAT-1").kwarg("step_s", 60).kwarg("min_el", 10.0);
/// let b = CallArgs::new().arg("SAT-1").kwarg("min_el", 10.0).kwarg("step_s", 60);
/// assert_eq!(a.key(), b.key());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    ///
    /// Maps are written with sorted keys (non-string keys as their JSON
    /// text) and non-finite floats as `"NaN"`, `"Infinity"` or `"-Infinity"`.
    /// A value whose `Serialize` impl fails is coerced to its `Debug` text.
    pub fn arg<T: Serialize + fmt::Debug>(mut self, value: T) -> Self {
        self.args.push(canonical_value(&value));
        self
    }

    /// Appends a positional argument using its `Display` text.
    pub fn arg_display(mut self, value: impl fmt::Display) -> Self {
        self.args.push(Value::String(value.to_string()));
        self
    }

    /// Sets a named argument.
    pub fn kwarg<T: Serialize + fmt::Debug>(mut self, name: impl Into<String>, value: T) -> Self {
        self.kwargs.insert(name.into(), canonical_value(&value));
        self
    }

    /// Sets a named argument using its `Display` text.
    pub fn kwarg_display(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.kwargs
            .insert(name.into(), Value::String(value.to_string()));
        self
    }

    /// Returns the canonical text that is hashed into the key.
    pub fn canonical(&self) -> String {
        json!({ "args": self.args, "kwargs": self.kwargs }).to_string()
    }

    /// Derives the cache key for these arguments.
    pub fn key(&self) -> CacheKey {
        CacheKey::from_bytes(self.canonical().as_bytes())
    }
}

fn canonical_value<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Value {
    canonical::to_value(value).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}

/// Derives the key for calling the computation `name` with `input`.
///
/// The key covers the computation's name as the first positional argument and
/// `input` as the second, so two computations fed the same input never share
/// an entry.
pub fn key_for_call<A: Serialize + fmt::Debug + ?Sized>(name: &str, input: &A) -> CacheKey {
    CallArgs::new().arg(name).arg(input).key()
}

/// Derives the key of a time-windowed query for `identifier`.
///
/// Both bounds are rendered as RFC 3339 timestamps, so the same instants in
/// different time zones produce different keys. `config_hash` identifies the
/// simulation configuration the result depends on.
pub fn cache_key<Tz: TimeZone>(
    identifier: &str,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    config_hash: &str,
) -> CacheKey
where
    Tz::Offset: fmt::Display,
{
    CacheKey::from_bytes(identity_canonical(identifier, start, end, config_hash).as_bytes())
}

fn identity_canonical<Tz: TimeZone>(
    identifier: &str,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    config_hash: &str,
) -> String
where
    Tz::Offset: fmt::Display,
{
    json!({
        "identifier": identifier,
        "start": start.to_rfc3339(),
        "end": end.to_rfc3339(),
        "config_hash": config_hash,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn canonical_text_layout() {
        let args = CallArgs::new()
            .arg(1)
            .arg("x")
            .kwarg("b", 2.5)
            .kwarg("a", true);
        assert_eq!(
            args.canonical(),
            r#"{"args":[1,"x"],"kwargs":{"a":true,"b":2.5}}"#
        );
    }

    #[test]
    fn empty_args_canonical() {
        assert_eq!(CallArgs::new().canonical(), r#"{"args":[],"kwargs":{}}"#);
    }

    #[test]
    fn kwarg_order_does_not_matter() {
        let a = CallArgs::new().kwarg("step", 60).kwarg("band", "S");
        let b = CallArgs::new().kwarg("band", "S").kwarg("step", 60);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn nested_maps_are_sorted() {
        let mut first = HashMap::new();
        first.insert("lat", 51.5);
        first.insert("lon", -0.1);
        first.insert("alt", 0.03);
        let a = CallArgs::new().arg(&first);
        let b = CallArgs::new().arg(&first.clone());
        assert_eq!(a.canonical(), b.canonical());
        assert!(a.canonical().contains(r#"{"alt":0.03,"lat":51.5,"lon":-0.1}"#));
    }

    #[test]
    fn positional_order_matters() {
        let a = CallArgs::new().arg(1).arg(2);
        let b = CallArgs::new().arg(2).arg(1);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn kwarg_name_matters() {
        let a = CallArgs::new().kwarg("min_el", 10);
        let b = CallArgs::new().kwarg("max_el", 10);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn positional_and_named_are_distinct() {
        let a = CallArgs::new().arg(10);
        let b = CallArgs::new().kwarg("0", 10);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn last_kwarg_wins() {
        let a = CallArgs::new().kwarg("step", 30).kwarg("step", 60);
        let b = CallArgs::new().kwarg("step", 60);
        assert_eq!(a, b);
    }

    #[test]
    fn non_string_map_keys_are_sorted_json_text() {
        let mut grid = BTreeMap::new();
        grid.insert((0u8, 1u8), 7u8);
        let args = CallArgs::new().arg(&grid);
        assert_eq!(args.canonical(), r#"{"args":[{"[0,1]":7}],"kwargs":{}}"#);
    }

    #[test]
    fn equal_hash_maps_share_a_key() {
        for _ in 0..20 {
            let pairs: Vec<((u32, u32), u32)> = (0..16).map(|i| ((i, 16 - i), i * i)).collect();
            let a: HashMap<_, _> = pairs.iter().copied().collect();
            let b: HashMap<_, _> = pairs.iter().rev().copied().collect();
            assert_eq!(CallArgs::new().arg(&a).key(), CallArgs::new().arg(&b).key());
        }
    }

    #[test]
    fn non_finite_floats_get_distinct_keys() {
        let keys = [
            CallArgs::new().arg(f64::NAN).key(),
            CallArgs::new().arg(f64::INFINITY).key(),
            CallArgs::new().arg(f64::NEG_INFINITY).key(),
            CallArgs::new().arg(None::<f64>).key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            CallArgs::new().kwarg("min_el", f64::NAN).canonical(),
            r#"{"args":[],"kwargs":{"min_el":"NaN"}}"#
        );
    }

    #[test]
    fn failing_serialize_falls_back_to_debug() {
        #[derive(Debug)]
        struct Opaque(u8);

        impl Serialize for Opaque {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("no serde form"))
            }
        }

        let args = CallArgs::new().arg(Opaque(3));
        assert_eq!(args.canonical(), r#"{"args":["Opaque(3)"],"kwargs":{}}"#);
    }

    #[test]
    fn display_coercion() {
        let args = CallArgs::new()
            .arg_display(std::net::Ipv4Addr::LOCALHOST)
            .kwarg_display("epoch", t(0));
        assert_eq!(
            args.canonical(),
            r#"{"args":["127.0.0.1"],"kwargs":{"epoch":"2024-03-01 00:00:00 UTC"}}"#
        );
    }

    #[test]
    fn key_is_32_lowercase_hex() {
        let s = CallArgs::new().arg("SAT-1").key().to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn key_for_call_includes_name() {
        assert_ne!(
            key_for_call("eclipse_intervals", &("SAT-1", 60)),
            key_for_call("access_windows", &("SAT-1", 60))
        );
        assert_eq!(
            key_for_call("eclipse_intervals", &("SAT-1", 60)),
            CallArgs::new()
                .arg("eclipse_intervals")
                .arg(("SAT-1", 60))
                .key()
        );
    }

    #[test]
    fn identity_canonical_layout() {
        assert_eq!(
            identity_canonical("SAT-1", &t(0), &t(1), "cfgA"),
            concat!(
                r#"{"config_hash":"cfgA","end":"2024-03-01T01:00:00+00:00","#,
                r#""identifier":"SAT-1","start":"2024-03-01T00:00:00+00:00"}"#
            )
        );
    }

    #[test]
    fn cache_key_is_stable() {
        let a = cache_key("SAT-1", &t(0), &t(1), "cfgA");
        let b = cache_key("SAT-1", &t(0), &t(1), "cfgA");
        assert_eq!(a, b);
        assert_eq!(a.to_string().len(), 32);
    }

    #[test]
    fn cache_key_changes_with_config() {
        assert_ne!(
            cache_key("SAT-1", &t(0), &t(1), "cfgA"),
            cache_key("SAT-1", &t(0), &t(1), "cfgB")
        );
    }

    #[test]
    fn cache_key_changes_with_window_and_identifier() {
        let base = cache_key("SAT-1", &t(0), &t(1), "cfgA");
        assert_ne!(base, cache_key("SAT-2", &t(0), &t(1), "cfgA"));
        assert_ne!(base, cache_key("SAT-1", &t(0), &t(2), "cfgA"));
        assert_ne!(base, cache_key("SAT-1", &t(1), &t(0), "cfgA"));
    }

    #[test]
    fn cache_key_offset_is_part_of_identity() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = t(0).with_timezone(&plus_two);
        let end = t(1).with_timezone(&plus_two);
        assert_ne!(
            cache_key("SAT-1", &start, &end, "cfgA"),
            cache_key("SAT-1", &t(0), &t(1), "cfgA")
        );
    }

    proptest! {
        #[test]
        fn kwargs_insertion_order_is_irrelevant(
            entries in prop::collection::btree_map("[a-z_]{1,8}", any::<i64>(), 0..8)
        ) {
            let forward = entries
                .iter()
                .fold(CallArgs::new(), |acc, (k, v)| acc.kwarg(k.clone(), *v));
            let backward = entries
                .iter()
                .rev()
                .fold(CallArgs::new(), |acc, (k, v)| acc.kwarg(k.clone(), *v));
            prop_assert_eq!(forward.key(), backward.key());
        }

        #[test]
        fn different_positional_values_give_different_keys(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(a != b);
            prop_assert_ne!(CallArgs::new().arg(a).key(), CallArgs::new().arg(b).key());
        }
    }
}
