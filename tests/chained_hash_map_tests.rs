//! Integration tests for ChainedHashMap
//!
//! Exercises the public API end to end: overwrite semantics, removal,
//! collision chains, iteration order and rendering.

use chainmap::{
    ChainMapError, ChainedHashMap, ChainedHashMapConfig, Config, DigestFunction, JsonDigest,
    Result,
};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

// =============================================================================
// TEST DIGESTS AND KEYS
// =============================================================================

/// Forces every key into a single chain
#[derive(Debug, Clone, Copy)]
struct ConstantDigest;

impl DigestFunction for ConstantDigest {
    fn digest<T: Serialize + ?Sized>(&self, _value: &T) -> Result<u32> {
        Ok(0xC0FFEE)
    }
}

/// Buckets keys by digest modulo a small number to produce mixed chains
#[derive(Debug, Clone, Copy)]
struct ModuloDigest(u32);

impl DigestFunction for ModuloDigest {
    fn digest<T: Serialize + ?Sized>(&self, value: &T) -> Result<u32> {
        Ok(JsonDigest.digest(value)? % self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Account {
    region: String,
    id: u64,
}

#[derive(Debug, PartialEq, Eq)]
struct SelfReferential;

impl Serialize for SelfReferential {
    fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("structure contains a cycle"))
    }
}

// =============================================================================
// CORE OPERATIONS
// =============================================================================

#[test]
fn test_set_then_get() {
    let mut map = ChainedHashMap::new();
    for i in 0..100u32 {
        map.set(i, format!("value-{}", i)).unwrap();
    }
    assert_eq!(map.len(), 100);
    for i in 0..100u32 {
        assert_eq!(map.get(&i).unwrap().map(String::as_str), Some(format!("value-{}", i).as_str()));
        assert!(map.has(&i).unwrap());
    }
}

#[test]
fn test_overwrite_keeps_size() {
    let mut map = ChainedHashMap::new();
    map.set("key", 1).unwrap();
    map.set("key", 2).unwrap();
    map.set("key", 3).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"key").unwrap(), Some(&3));
}

#[test]
fn test_example_scenario() {
    let mut map = ChainedHashMap::new();
    map.set("a", 1).unwrap();
    map.set("b", 2).unwrap();
    map.set("a", 3).unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&"a").unwrap(), Some(&3));
    assert_eq!(map.get(&"b").unwrap(), Some(&2));
    assert!(!map.has(&"c").unwrap());
}

#[test]
fn test_unset_keys() {
    let mut map: ChainedHashMap<String, u8> = ChainedHashMap::new();
    map.set("present".to_string(), 1).unwrap();

    assert_eq!(map.get("absent").unwrap(), None);
    assert!(!map.has("absent").unwrap());
    assert!(!map.delete("absent").unwrap());
    assert_eq!(map.pop("absent").unwrap(), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_delete_decrements_size() {
    let mut map = ChainedHashMap::new();
    map.set('x', 1).unwrap();
    map.set('y', 2).unwrap();

    assert!(map.delete(&'x').unwrap());
    assert!(!map.has(&'x').unwrap());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&'y').unwrap(), Some(&2));
}

#[test]
fn test_pop_matches_prior_get() {
    let mut map = ChainedHashMap::new();
    map.set(vec![1, 2, 3], "list").unwrap();
    let before = map.get(&vec![1, 2, 3]).unwrap().copied();

    let popped = map.pop(&vec![1, 2, 3]).unwrap();
    assert_eq!(popped, before);
    assert_eq!(map.len(), 0);
    assert!(!map.has(&vec![1, 2, 3]).unwrap());
}

#[test]
fn test_struct_keys_use_equality() {
    let mut map = ChainedHashMap::new();
    let key = Account { region: "eu".into(), id: 7 };
    map.set(key.clone(), 100).unwrap();

    // A distinct but equal instance finds the same entry
    let lookup = Account { region: "eu".into(), id: 7 };
    assert_eq!(map.get(&lookup).unwrap(), Some(&100));

    let other = Account { region: "us".into(), id: 7 };
    assert_eq!(map.get(&other).unwrap(), None);
}

#[test]
fn test_structurally_equal_map_keys_share_digest() {
    let mut forward = BTreeMap::new();
    forward.insert("b".to_string(), 2);
    forward.insert("a".to_string(), 1);
    let mut backward = BTreeMap::new();
    backward.insert("a".to_string(), 1);
    backward.insert("b".to_string(), 2);

    let mut map = ChainedHashMap::new();
    map.set(forward, "config").unwrap();
    assert_eq!(map.get(&backward).unwrap(), Some(&"config"));
    assert_eq!(map.digest_of(&backward).unwrap(), map.digest_of(map.keys().next().unwrap()).unwrap());
}

// =============================================================================
// COLLISIONS
// =============================================================================

#[test]
fn test_colliding_keys_both_retrievable() {
    let mut map = ChainedHashMap::with_digest(ConstantDigest);
    map.set("first", 1).unwrap();
    map.set("second", 2).unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&"first").unwrap(), Some(&1));
    assert_eq!(map.get(&"second").unwrap(), Some(&2));
    assert_eq!(map.table().len(), 1);
}

#[test]
fn test_collision_chain_removal() {
    let mut map = ChainedHashMap::with_digest(ConstantDigest);
    for i in 0..10 {
        map.set(i, i * i).unwrap();
    }
    assert_eq!(map.stats().longest_chain, 10);

    for i in (0..10).filter(|i| i % 2 == 0) {
        assert_eq!(map.pop(&i).unwrap(), Some(i * i));
    }
    assert_eq!(map.len(), 5);
    let remaining: Vec<_> = map.keys().copied().collect();
    assert_eq!(remaining, vec![1, 3, 5, 7, 9]);

    for i in [1, 3, 5, 7, 9] {
        assert!(map.delete(&i).unwrap());
    }
    assert!(map.is_empty());
    assert!(map.table().is_empty());
}

// =============================================================================
// ITERATION AND RENDERING
// =============================================================================

#[test]
fn test_for_each_visits_every_entry_ascending() {
    let mut map = ChainedHashMap::with_digest(ModuloDigest(13));
    for i in 0..200u32 {
        map.set(i, i).unwrap();
    }

    let mut digests = Vec::new();
    let mut seen = Vec::new();
    map.for_each(|entry, table| {
        let digest = ModuloDigest(13).digest(entry.key()).unwrap();
        assert!(table.bucket(digest).is_some());
        digests.push(digest);
        seen.push(*entry.key());
    });

    assert_eq!(seen.len(), 200);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 200);

    // Non-decreasing across entries, strictly ascending across buckets
    assert!(digests.windows(2).all(|w| w[0] <= w[1]));
    let mut buckets = digests.clone();
    buckets.dedup();
    assert!(buckets.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_iteration_order_is_reproducible() {
    let build = |keys: &[&'static str]| {
        let mut map = ChainedHashMap::new();
        for key in keys {
            map.set(*key, key.len()).unwrap();
        }
        map.keys().copied().collect::<Vec<_>>()
    };

    let forward = build(&["alpha", "beta", "gamma", "delta", "epsilon"]);
    let backward = build(&["epsilon", "delta", "gamma", "beta", "alpha"]);
    assert_eq!(forward, backward);
}

#[test]
fn test_render_empty() {
    let map: ChainedHashMap<u8, u8> = ChainedHashMap::new();
    assert_eq!(map.render().unwrap(), "{\n}");
}

#[test]
fn test_render_lists_every_entry() {
    let mut map = ChainedHashMap::new();
    map.set("a", vec![1]).unwrap();
    map.set("b", vec![]).unwrap();

    let rendered = map.render().unwrap();
    assert!(rendered.starts_with("{\n"));
    assert!(rendered.ends_with("\n}"));
    assert!(rendered.contains("  { \"a\" => [1] }\n"));
    assert!(rendered.contains("  { \"b\" => [] }\n"));
    assert_eq!(rendered.lines().count(), 4);
}

#[test]
fn test_render_and_for_each_agree_on_content() {
    let mut map = ChainedHashMap::with_digest(ModuloDigest(5));
    for i in 0..20 {
        map.set(i, -i).unwrap();
    }
    let mut expected = String::from("{\n");
    for (_, chain) in map.table().iter() {
        for entry in chain {
            expected.push_str(&format!("  {{ {} => {} }}\n", entry.key(), entry.value()));
        }
    }
    expected.push('}');
    assert_eq!(map.render().unwrap(), expected);

    let mut count = 0;
    map.for_each(|_, _| count += 1);
    assert_eq!(count, 20);
}

// =============================================================================
// ERRORS AND CONFIGURATION
// =============================================================================

#[test]
fn test_unserializable_key_fails_fast() {
    let mut map = ChainedHashMap::new();
    map.set(SelfReferential, 1).unwrap_err();

    let err = map.has(&SelfReferential).unwrap_err();
    assert!(matches!(err, ChainMapError::Unserializable { .. }));
    assert!(format!("{}", err).contains("Unserializable key"));
    assert!(map.is_empty());
    assert!(map.occupied_digests().is_empty());
}

#[test]
fn test_try_extend_stops_at_error() {
    let mut map = ChainedHashMap::new();
    map.try_extend(vec![("one", 1), ("two", 2)]).unwrap();
    assert_eq!(map.len(), 2);
    map.try_extend(vec![("two", 22), ("three", 3)]).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&"two").unwrap(), Some(&22));
}

#[test]
fn test_memory_preset_prunes_digests() {
    let mut map = ChainedHashMap::with_config(ChainedHashMapConfig::memory_preset()).unwrap();
    map.set("gone", 0).unwrap();
    map.set("kept", 1).unwrap();
    map.delete(&"gone").unwrap();

    assert_eq!(map.occupied_digests().len(), 1);
    assert_eq!(map.stats().vacated_digests, 0);
}

#[test]
fn test_default_config_retains_digests() {
    let mut map = ChainedHashMap::with_config(ChainedHashMapConfig::balanced_preset()).unwrap();
    map.set("gone", 0).unwrap();
    map.set("kept", 1).unwrap();
    map.delete(&"gone").unwrap();

    assert_eq!(map.occupied_digests().len(), 2);
    assert_eq!(map.stats().vacated_digests, 1);
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn test_long_chain_threshold_config() {
    let config = ChainedHashMapConfig { long_chain_threshold: 2, ..ChainedHashMapConfig::realtime_preset() };
    assert!(config.validate().is_ok());

    let mut map = ChainedHashMap::with_digest_and_config(ConstantDigest, config).unwrap();
    map.set(1, 1).unwrap();
    map.set(2, 2).unwrap();
    map.set(3, 3).unwrap();
    assert_eq!(map.stats().chained_entries, 3);
    assert_eq!(map.config().long_chain_threshold, 2);
}
