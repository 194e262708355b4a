//! # Chainmap: Separate-Chaining Hash Map with Deterministic Iteration
//!
//! This crate provides a hash map that resolves collisions by chaining and
//! iterates in a reproducible order.
//!
//! ## Key Features
//!
//! - **Canonical Digests**: Keys are hashed from a canonical JSON form, so
//!   structurally equal keys always land in the same bucket
//! - **Pluggable Hashing**: Any [`DigestFunction`] can replace the default
//! - **Deterministic Iteration**: Buckets are visited in ascending digest order
//!   through an [`OrderedIndexSet`] of occupied digests
//! - **Total Operations**: Missing keys are reported as `None`/`false`; the only
//!   error is a key that cannot be serialized
//!
//! ## Quick Start
//!
//! ```rust
//! use chainmap::ChainedHashMap;
//!
//! let mut map = ChainedHashMap::new();
//! map.set("a", 1).unwrap();
//! map.set("b", 2).unwrap();
//! map.set("a", 3).unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&"a").unwrap(), Some(&3));
//! assert!(map.delete(&"b").unwrap());
//!
//! map.for_each(|entry, _table| {
//!     println!("{} => {}", entry.key(), entry.value());
//! });
//! assert_eq!(map.render().unwrap(), "{\n  { \"a\" => 3 }\n}");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod containers;
pub mod error;
pub mod hash_map;

// Re-export core types
pub use config::{ChainedHashMapConfig, Config};
pub use containers::OrderedIndexSet;
pub use error::{ChainMapError, Result};
pub use hash_map::{BucketTable, ChainStats, ChainedHashMap, DigestFunction, Entry, JsonDigest};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing chainmap v{}", VERSION);
}
