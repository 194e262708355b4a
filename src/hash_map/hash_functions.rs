//! Digest functions for chained hash maps
//!
//! A digest is computed in two steps. The key is first turned into a canonical
//! string: its JSON form with every object's keys sorted, so structurally equal
//! values produce the same text regardless of field or insertion order. The
//! string is then folded into a `u32` with the polynomial accumulator
//! `h = h * 31 + unit` over its UTF-16 code units, using wrapping arithmetic.
//!
//! The digest is deterministic and unseeded. Collisions are expected and are
//! resolved by chaining in the map.
//!
//! # Usage
//!
//! ```rust
//! use chainmap::hash_map::{canonicalize, DigestFunction, JsonDigest};
//!
//! assert_eq!(canonicalize(&"a").unwrap(), "\"a\"");
//! assert_eq!(JsonDigest.digest(&"a").unwrap(), 35715);
//! ```

use crate::error::{ChainMapError, Result};
use serde::Serialize;
use serde_json::Value;

/// Multiplier of the string folding accumulator
pub const STRING_HASH_MULTIPLIER: u32 = 31;

/// Deepest nesting of arrays and objects accepted in a canonical form
pub const MAX_CANONICAL_DEPTH: usize = 128;

/// Pluggable key digest
///
/// Implementations must be pure and deterministic: the same value always maps
/// to the same digest for the lifetime of a map.
///
/// Keys that compare equal must produce identical `Serialize` output, otherwise
/// they land in different buckets and lookups miss. Only object keys are put
/// in a fixed order; sequences keep the order the key serializes them in. Use
/// ordered collections such as `BTreeSet` and `BTreeMap` inside keys rather than
/// `HashSet`, whose element order varies between equal instances.
pub trait DigestFunction {
    /// Compute the digest of `value`
    ///
    /// Fails with [`ChainMapError::Unserializable`] when the value has no
    /// canonical form.
    fn digest<T: Serialize + ?Sized>(&self, value: &T) -> Result<u32>;
}

/// Default digest: canonical JSON folded with [`fold_str_hash`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonDigest;

impl DigestFunction for JsonDigest {
    #[inline]
    fn digest<T: Serialize + ?Sized>(&self, value: &T) -> Result<u32> {
        Ok(fold_str_hash(&canonicalize(value)?))
    }
}

/// Serialize a key to its canonical JSON text
///
/// Object keys are emitted in ascending order at every nesting level.
/// Sequence order is kept as serialized. Non-finite floats serialize as
/// `null`. Nesting deeper than [`MAX_CANONICAL_DEPTH`] is rejected.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    canonical_text(value, ChainMapError::unserializable)
}

/// Serialize a stored value to its canonical JSON text
///
/// Same form as [`canonicalize`]; failures are reported against the value.
pub fn canonicalize_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    canonical_text(value, ChainMapError::unserializable_value)
}

fn canonical_text<T, E>(value: &T, error: E) -> Result<String>
where
    T: Serialize + ?Sized,
    E: Fn(String) -> ChainMapError,
{
    let tree = serde_json::to_value(value).map_err(|e| error(e.to_string()))?;
    let sorted = sort_object_keys(tree, 0).map_err(&error)?;
    serde_json::to_string(&sorted).map_err(|e| error(e.to_string()))
}

// Rebuilding objects in sorted order keeps the output stable even when
// serde_json is compiled with `preserve_order`.
fn sort_object_keys(value: Value, depth: usize) -> std::result::Result<Value, String> {
    let nested = matches!(value, Value::Object(_) | Value::Array(_));
    if nested && depth >= MAX_CANONICAL_DEPTH {
        return Err(format!("nesting exceeds {} levels", MAX_CANONICAL_DEPTH));
    }
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = serde_json::Map::new();
            for (key, inner) in entries {
                sorted.insert(key, sort_object_keys(inner, depth + 1)?);
            }
            Ok(Value::Object(sorted))
        }
        Value::Array(items) => items
            .into_iter()
            .map(|inner| sort_object_keys(inner, depth + 1))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

/// Fold a string into a `u32` over its UTF-16 code units
#[inline]
pub fn fold_str_hash(s: &str) -> u32 {
    s.encode_utf16().fold(0u32, |hash, unit| {
        hash.wrapping_mul(STRING_HASH_MULTIPLIER).wrapping_add(u32::from(unit))
    })
}
