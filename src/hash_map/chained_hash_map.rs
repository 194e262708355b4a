//! ChainedHashMap - separate-chaining hash map with deterministic iteration
//!
//! Keys are mapped to a `u32` digest by a pluggable [`DigestFunction`]. All
//! entries sharing a digest live in one bucket (a collision chain) scanned
//! linearly with key equality. A sorted [`OrderedIndexSet`] remembers which
//! digests have been occupied so that iteration visits buckets in ascending
//! digest order. The table never resizes.
//!
//! # Examples
//!
//! ```rust
//! use chainmap::hash_map::ChainedHashMap;
//!
//! let mut map = ChainedHashMap::new();
//! map.set("a", 1).unwrap();
//! map.set("b", 2).unwrap();
//! map.set("a", 3).unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&"a").unwrap(), Some(&3));
//! assert!(!map.has(&"c").unwrap());
//! assert_eq!(map.pop(&"b").unwrap(), Some(2));
//! ```

use crate::config::{ChainedHashMapConfig, Config};
use crate::containers::OrderedIndexSet;
use crate::error::Result;
use crate::hash_map::hash_functions::{canonicalize, canonicalize_value, DigestFunction, JsonDigest};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FusedIterator;

/// A key-value pair stored in a collision chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The entry's key
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's value
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Split the entry into its key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Chain of entries sharing one digest, in insertion order
pub type Bucket<K, V> = Vec<Entry<K, V>>;

/// Sparse digest to bucket table
///
/// Only digests that currently hold entries have a slot; a slot is removed as
/// soon as its last entry is. Storage order is ascending by digest.
#[derive(Debug, Clone)]
pub struct BucketTable<K, V> {
    slots: BTreeMap<u32, Bucket<K, V>>,
}

impl<K, V> BucketTable<K, V> {
    fn new() -> Self {
        Self { slots: BTreeMap::new() }
    }

    /// The chain stored at `digest`, if any
    #[inline]
    pub fn bucket(&self, digest: u32) -> Option<&[Entry<K, V>]> {
        self.slots.get(&digest).map(Vec::as_slice)
    }

    /// Number of non-empty buckets
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no bucket is present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of entries across all buckets
    pub fn entry_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Buckets in storage order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Entry<K, V>])> + '_ {
        self.slots.iter().map(|(&digest, chain)| (digest, chain.as_slice()))
    }
}

/// Occupancy statistics for a [`ChainedHashMap`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    /// Live entries
    pub entries: usize,
    /// Non-empty buckets
    pub buckets: usize,
    /// Digests recorded in the occupied set
    pub occupied_digests: usize,
    /// Occupied digests whose bucket has been removed
    pub vacated_digests: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Entries sharing their bucket with at least one other entry
    pub chained_entries: usize,
}

/// Separate-chaining hash map with ascending-digest iteration
///
/// # Performance Characteristics
///
/// - **Lookup/Insert/Remove**: O(log b + c) for `b` buckets and chain length `c`
/// - **Iteration**: ascending digest order, chain order within a bucket
/// - **Growth**: none; colliding keys extend their chain
///
/// # Key Requirements
///
/// Equal keys must serialize identically, since the digest is computed from
/// the serialized form. Keys containing unordered collections such as
/// `HashSet` break this and must use `BTreeSet`/`BTreeMap` instead; object
/// keys of maps are sorted, but sequence order is kept as serialized.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<K, V, D = JsonDigest> {
    table: BucketTable<K, V>,
    occupied: OrderedIndexSet<u32>,
    len: usize,
    digest: D,
    config: ChainedHashMapConfig,
}

impl<K, V> ChainedHashMap<K, V, JsonDigest> {
    /// Create an empty map using the JSON digest and default configuration
    pub fn new() -> Self {
        Self::with_digest(JsonDigest)
    }

    /// Create an empty map with a validated configuration
    pub fn with_config(config: ChainedHashMapConfig) -> Result<Self> {
        Self::with_digest_and_config(JsonDigest, config)
    }
}

impl<K, V> Default for ChainedHashMap<K, V, JsonDigest> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, D> ChainedHashMap<K, V, D> {
    /// Create an empty map using a custom digest function
    pub fn with_digest(digest: D) -> Self {
        Self {
            table: BucketTable::new(),
            occupied: OrderedIndexSet::new(),
            len: 0,
            digest,
            config: ChainedHashMapConfig::default(),
        }
    }

    /// Create an empty map with a custom digest function and configuration
    pub fn with_digest_and_config(digest: D, config: ChainedHashMapConfig) -> Result<Self> {
        config.validate()?;
        log::debug!("Creating chained hash map with config: {:?}", config);
        Ok(Self {
            table: BucketTable::new(),
            occupied: OrderedIndexSet::new(),
            len: 0,
            digest,
            config,
        })
    }

    /// Number of live entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the map holds no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configuration in use
    pub fn config(&self) -> &ChainedHashMapConfig {
        &self.config
    }

    /// Digests that have been occupied, ascending
    ///
    /// With `retain_vacated_digests` this may include digests whose bucket
    /// has since been removed.
    pub fn occupied_digests(&self) -> &OrderedIndexSet<u32> {
        &self.occupied
    }

    /// Read-only view of the bucket table
    pub fn table(&self) -> &BucketTable<K, V> {
        &self.table
    }

    /// Remove every entry and forget all occupied digests
    pub fn clear(&mut self) {
        log::debug!(
            "Clearing chained hash map: {} entries in {} buckets",
            self.len,
            self.table.len()
        );
        self.table.slots.clear();
        self.occupied.clear();
        self.len = 0;
    }

    /// Call `callback` for every entry in ascending digest order
    ///
    /// Buckets are located through the occupied digest set; digests whose
    /// bucket is gone are skipped. Within a bucket, entries are visited in
    /// insertion order. The callback also receives the whole table.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(&Entry<K, V>, &BucketTable<K, V>),
    {
        for &digest in &self.occupied {
            if let Some(chain) = self.table.bucket(digest) {
                for entry in chain {
                    callback(entry, &self.table);
                }
            }
        }
    }

    /// Iterator over `(key, value)` pairs in the same order as [`for_each`](Self::for_each)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: &self.table,
            digests: self.occupied.iter(),
            chain: Default::default(),
            remaining: self.len,
        }
    }

    /// Iterator over keys in ascending digest order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterator over values in ascending digest order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Occupancy statistics
    pub fn stats(&self) -> ChainStats {
        let mut stats = ChainStats {
            entries: self.len,
            buckets: self.table.len(),
            occupied_digests: self.occupied.len(),
            vacated_digests: self.occupied.len().saturating_sub(self.table.len()),
            ..ChainStats::default()
        };
        for chain in self.table.slots.values() {
            stats.longest_chain = stats.longest_chain.max(chain.len());
            if chain.len() > 1 {
                stats.chained_entries += chain.len();
            }
        }
        stats
    }

    /// Render the map as `{ key => value }` lines
    ///
    /// Buckets are read straight from table storage, not through the occupied
    /// digest set. Keys and values use the canonical serialization the digest
    /// is computed from. An empty map renders as `"{\n}"`.
    pub fn render(&self) -> Result<String>
    where
        K: Serialize,
        V: Serialize,
    {
        let mut out = String::from("{\n");
        for (_, chain) in self.table.iter() {
            for entry in chain {
                out.push_str(&format!(
                    "  {{ {} => {} }}\n",
                    canonicalize(&entry.key)?,
                    canonicalize_value(&entry.value)?
                ));
            }
        }
        out.push('}');
        Ok(out)
    }
}

impl<K, V, D> ChainedHashMap<K, V, D>
where
    K: Serialize + Eq,
    D: DigestFunction,
{
    /// Digest `key` maps to
    #[inline]
    pub fn digest_of<Q>(&self, key: &Q) -> Result<u32>
    where
        Q: Serialize + ?Sized,
    {
        self.digest.digest(key)
    }

    /// Insert `value` under `key`, overwriting the value of an equal key
    ///
    /// Overwriting leaves the length unchanged. Fails without touching the map
    /// if the key cannot be serialized.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        let digest = self.digest.digest(&key)?;
        self.occupied.add(digest);

        let capacity = self.config.initial_chain_capacity;
        let chain = self
            .table
            .slots
            .entry(digest)
            .or_insert_with(|| Vec::with_capacity(capacity));

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            entry.value = value;
            return Ok(());
        }

        if !chain.is_empty() {
            log::trace!("Digest {:#010x} collision, chaining entry {}", digest, chain.len() + 1);
        }
        chain.push(Entry::new(key, value));
        if chain.len() == self.config.long_chain_threshold {
            log::debug!(
                "Chain at digest {:#010x} reached {} entries",
                digest,
                chain.len()
            );
        }
        self.len += 1;
        Ok(())
    }

    /// Value stored under `key`
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        let digest = self.digest.digest(key)?;
        Ok(self
            .table
            .slots
            .get(&digest)
            .and_then(|chain| chain.iter().find(|entry| entry.key.borrow() == key))
            .map(|entry| &entry.value))
    }

    /// Mutable reference to the value stored under `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        let digest = self.digest.digest(key)?;
        Ok(self
            .table
            .slots
            .get_mut(&digest)
            .and_then(|chain| chain.iter_mut().find(|entry| entry.key.borrow() == key))
            .map(|entry| &mut entry.value))
    }

    /// Check whether `key` is present
    pub fn has<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        Ok(self.get(key)?.is_some())
    }

    /// Remove `key`, returning whether it was present
    pub fn delete<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        Ok(self.take_entry(key)?.is_some())
    }

    /// Remove `key`, returning its value
    pub fn pop<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        Ok(self.take_entry(key)?.map(|entry| entry.value))
    }

    /// Insert every pair, stopping at the first unserializable key
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn take_entry<Q>(&mut self, key: &Q) -> Result<Option<Entry<K, V>>>
    where
        K: Borrow<Q>,
        Q: Serialize + Eq + ?Sized,
    {
        let digest = self.digest.digest(key)?;
        let mut slot = match self.table.slots.entry(digest) {
            btree_map::Entry::Occupied(slot) => slot,
            btree_map::Entry::Vacant(_) => return Ok(None),
        };

        let chain = slot.get_mut();
        let Some(pos) = chain.iter().position(|entry| entry.key.borrow() == key) else {
            return Ok(None);
        };

        // Sole entry: drop the whole bucket
        let entry = if chain.len() == 1 {
            slot.remove().swap_remove(0)
        } else {
            chain.remove(pos)
        };

        if !self.config.retain_vacated_digests && !self.table.slots.contains_key(&digest) {
            self.occupied.remove(&digest);
        }
        self.len -= 1;
        Ok(Some(entry))
    }
}

impl<'a, K, V, D> IntoIterator for &'a ChainedHashMap<K, V, D> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ChainedHashMap`] in ascending digest order
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    table: &'a BucketTable<K, V>,
    digests: std::slice::Iter<'a, u32>,
    chain: std::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            let digest = *self.digests.next()?;
            if let Some(chain) = self.table.bucket(digest) {
                self.chain = chain.iter();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
