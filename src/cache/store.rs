//! Cache Store Module
//!
//! Main cache engine: HashMap storage with TTL expiration. The store itself is
//! not synchronized; [`Cache`](crate::cache::Cache) wraps it in a mutex and
//! supplies the current time from its clock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::Result;
use crate::invalidation::KeyMatcher;

// == Cache Store ==
/// Unbounded key-value storage with TTL support.
///
/// Entries leave the store only through delete, invalidation, clear or expiry.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value that expires `ttl` after `now`.
    ///
    /// If the key already exists, the value is overwritten and the TTL reset.
    pub fn set(&mut self, key: String, value: Value, ttl: Duration, now: DateTime<Utc>) -> Result<()> {
        let entry = CacheEntry::new(value, ttl, now)?;
        self.entries.insert(key, entry);
        Ok(())
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns `None` for unknown keys. An expired entry is removed and
    /// reported as `None`.
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let expired = self.entries.get(key)?.is_expired_at(now);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Returns a copy of the full entry, expired or not, without touching it.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Expired Keys ==
    /// Snapshot of the keys whose entries are expired at `now`.
    pub fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Remove Expired ==
    /// Removes the given keys whose entries are still expired at `now`.
    ///
    /// Keys that vanished or were refreshed since the snapshot are skipped.
    pub fn remove_expired(&mut self, keys: &[String], now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        for key in keys {
            let still_expired = self
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_expired_at(now));
            if still_expired {
                self.entries.remove(key);
                removed += 1;
            }
        }
        removed
    }

    // == Sweep Expired ==
    /// Removes all entries expired at `now` and returns the number removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let expired = self.expired_keys(now);
        self.remove_expired(&expired, now)
    }

    // == Remove Matching ==
    /// Removes every key accepted by `matcher` and returns the removed keys.
    pub fn remove_matching(&mut self, matcher: &dyn KeyMatcher) -> Vec<String> {
        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matcher.matches(key))
            .cloned()
            .collect();

        for key in &matched {
            self.entries.remove(key);
        }
        matched
    }

    // == Stats ==
    /// Occupancy snapshot with expiry evaluated at `now`. Does not mutate.
    pub fn stats(&self, now: DateTime<Utc>) -> CacheStats {
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();
        CacheStats::new(self.entries.len(), expired)
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::invalidation::KeyPattern;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(300);

    fn at(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
        now + chrono::Duration::seconds(secs)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!("value1"), TTL, now).unwrap();

        assert_eq!(store.get("key1", now), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new();
        assert_eq!(store.get("nonexistent", Utc::now()), None);
    }

    #[test]
    fn test_store_zero_ttl_rejected() {
        let mut store = CacheStore::new();

        let result = store.set("key".to_string(), json!(1), Duration::ZERO, Utc::now());
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!("value1"), TTL, now).unwrap();

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert_eq!(store.get("key1", now), None);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!("value1"), Duration::from_secs(1), now).unwrap();
        store.set("key1".to_string(), json!("value2"), Duration::from_secs(10), at(now, 1)).unwrap();

        assert_eq!(store.get("key1", at(now, 5)), Some(json!("value2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lazy_expiry_on_get() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!(42), Duration::from_secs(1), now).unwrap();
        assert_eq!(store.get("key1", now), Some(json!(42)));

        assert_eq!(store.get("key1", at(now, 2)), None);
        assert!(store.is_empty(), "Expired entry should be dropped on access");
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("a".to_string(), json!(1), TTL, now).unwrap();
        store.set("b".to_string(), json!(2), TTL, now).unwrap();

        assert_eq!(store.clear(), 2);
        assert_eq!(store.stats(now).total_entries, 0);
    }

    #[test]
    fn test_store_sweep_expired() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!("value1"), Duration::from_secs(1), now).unwrap();
        store.set("key2".to_string(), json!("value2"), Duration::from_secs(10), now).unwrap();

        let removed = store.sweep_expired(at(now, 5));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2", at(now, 5)), Some(json!("value2")));
    }

    #[test]
    fn test_remove_expired_skips_refreshed_keys() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("key1".to_string(), json!(1), Duration::from_secs(1), now).unwrap();
        let snapshot = store.expired_keys(at(now, 2));
        assert_eq!(snapshot, vec!["key1".to_string()]);

        // Refreshed between snapshot and removal
        store.set("key1".to_string(), json!(2), TTL, at(now, 2)).unwrap();

        assert_eq!(store.remove_expired(&snapshot, at(now, 2)), 0);
        assert_eq!(store.get("key1", at(now, 2)), Some(json!(2)));
    }

    #[test]
    fn test_store_stats_do_not_mutate() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("short".to_string(), json!(1), Duration::from_secs(1), now).unwrap();
        store.set("long".to_string(), json!(2), TTL, now).unwrap();

        let stats = store.stats(at(now, 2));
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.active_entries, 1);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_remove_matching() {
        let mut store = CacheStore::new();
        let now = Utc::now();

        store.set("user:1".to_string(), json!(1), TTL, now).unwrap();
        store.set("user:2".to_string(), json!(2), TTL, now).unwrap();
        store.set("superuser:1".to_string(), json!(3), TTL, now).unwrap();

        let pattern = KeyPattern::parse("user:*").unwrap();
        let mut removed = store.remove_matching(&pattern);
        removed.sort();

        assert_eq!(removed, vec!["user:1".to_string(), "user:2".to_string()]);
        assert!(store.peek("superuser:1").is_some());
    }
}
