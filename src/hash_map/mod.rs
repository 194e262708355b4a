//! Chained hash map and its digest functions
//!
//! - `ChainedHashMap`: separate-chaining map iterated in ascending digest order
//! - `JsonDigest`: canonical-JSON digest used by default, behind the
//!   `DigestFunction` trait so callers can plug in their own

mod chained_hash_map;
mod hash_functions;

pub use chained_hash_map::{Bucket, BucketTable, ChainStats, ChainedHashMap, Entry, Iter};

pub use hash_functions::{
    canonicalize, canonicalize_value, fold_str_hash, DigestFunction, JsonDigest,
    MAX_CANONICAL_DEPTH, STRING_HASH_MULTIPLIER,
};
