//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store, key builder and pattern behavior over
//! generated inputs.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::cache::{Cache, CacheStore, ManualClock};
use crate::invalidation::{KeyMatcher, KeyPattern};
use crate::keys;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,64}".prop_map(|s| json!(s)),
        prop::collection::vec(any::<u16>(), 0..8).prop_map(|v| json!(v)),
    ]
}

/// Generates a TTL of 1 to 120 seconds
fn ttl_secs_strategy() -> impl Strategy<Value = u64> {
    1u64..=120
}

fn at(start: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    start + chrono::Duration::seconds(secs as i64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any key and value, a get right after set returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set(key.clone(), value.clone(), TEST_TTL, now).unwrap();

        prop_assert_eq!(store.get(&key, now), Some(value), "Round-trip value mismatch");
    }

    // For any key, delete removes it and a second delete is harmless.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set(key.clone(), value, TEST_TTL, now).unwrap();
        prop_assert!(store.delete(&key), "Key should exist before delete");
        prop_assert!(!store.delete(&key), "Second delete should report absence");
        prop_assert_eq!(store.get(&key, now), None, "Key should not exist after delete");
    }

    // For any entry, it is readable until its TTL elapses and absent afterwards.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in ttl_secs_strategy()
    ) {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set(key.clone(), value.clone(), Duration::from_secs(ttl), now).unwrap();

        prop_assert_eq!(store.get(&key, at(now, ttl - 1)), Some(value));
        prop_assert_eq!(store.get(&key, at(now, ttl)), None);
        prop_assert_eq!(store.stats(at(now, ttl)).total_entries, 0);
    }

    // Sweeping removes exactly the expired entries and leaves the rest untouched.
    #[test]
    fn prop_sweep_removes_exactly_expired(
        entries in prop::collection::hash_map(
            valid_key_strategy(),
            (valid_value_strategy(), ttl_secs_strategy()),
            0..40
        ),
        elapsed in 0u64..=150
    ) {
        let mut store = CacheStore::new();
        let start = Utc::now();

        for (key, (value, ttl)) in &entries {
            store.set(key.clone(), value.clone(), Duration::from_secs(*ttl), start).unwrap();
        }
        let before: HashMap<String, _> = entries
            .keys()
            .map(|key| (key.clone(), store.peek(key).unwrap()))
            .collect();

        let now = at(start, elapsed);
        let expected_removed = entries.values().filter(|(_, ttl)| *ttl <= elapsed).count();

        let removed = store.sweep_expired(now);
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(store.len(), entries.len() - expected_removed);

        for (key, (_, ttl)) in &entries {
            if *ttl <= elapsed {
                prop_assert!(store.peek(key).is_none(), "Expired key '{}' survived", key);
            } else {
                let after = store.peek(key);
                prop_assert_eq!(after.as_ref(), before.get(key), "Live key changed");
            }
        }
    }

    // Stats always partition total entries into active and expired.
    #[test]
    fn prop_stats_partition(
        ttls in prop::collection::vec(ttl_secs_strategy(), 0..40),
        elapsed in 0u64..=150
    ) {
        let mut store = CacheStore::new();
        let start = Utc::now();

        for (i, ttl) in ttls.iter().enumerate() {
            store.set(format!("k{i}"), json!(i), Duration::from_secs(*ttl), start).unwrap();
        }

        let stats = store.stats(at(start, elapsed));
        prop_assert_eq!(stats.total_entries, ttls.len());
        prop_assert_eq!(stats.active_entries + stats.expired_entries, stats.total_entries);
        prop_assert_eq!(stats.expired_entries, ttls.iter().filter(|t| **t <= elapsed).count());
    }

    // Named arguments fingerprint the same regardless of insertion order.
    #[test]
    fn prop_fingerprint_order_independent(
        args in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..10)
    ) {
        let reversed: HashMap<String, i32> = args.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
        let ordered: BTreeMap<String, i32> = args.clone();

        prop_assert_eq!(
            keys::fingerprint("ns", &ordered).unwrap(),
            keys::fingerprint("ns", &reversed).unwrap()
        );
    }

    // A prefix pattern only ever matches keys carrying that literal prefix.
    #[test]
    fn prop_prefix_pattern_matches_literal_prefix(
        prefix in "[a-z]{1,8}:",
        key in valid_key_strategy()
    ) {
        let pattern = KeyPattern::parse(&format!("{prefix}*")).unwrap();
        prop_assert_eq!(pattern.matches(&key), key.starts_with(&prefix));
        let prefixed = format!("{prefix}{key}");
        prop_assert!(pattern.matches(&prefixed));
    }
}

// Shared handle properties, driven through tokio-test
proptest! {
    #![proptest_config(ProptestConfig::with_cases(25))]

    // Clear always leaves the shared cache empty.
    #[test]
    fn prop_clear_empties_cache(key_list in prop::collection::vec(valid_key_strategy(), 0..30)) {
        let cache = Cache::with_clock(Arc::new(ManualClock::new()));

        let total = tokio_test::block_on(async {
            for key in &key_list {
                cache.set(key.clone(), json!(key), TEST_TTL).await.unwrap();
            }
            cache.clear().await;
            cache.stats().await.total_entries
        });

        prop_assert_eq!(total, 0);
    }
}
