//! Shared Cache Handle
//!
//! Thread-safe front for [`CacheStore`]. Every operation runs under one
//! coarse mutex; callers only ever receive copies of stored values.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats, CacheStore, Clock, SystemClock};
use crate::error::Result;
use crate::invalidation::KeyMatcher;
use crate::models::StatsReport;

/// Maximum number of keys removed per lock acquisition during a sweep.
pub const SWEEP_BATCH_SIZE: usize = 512;

// == Cache ==
/// Cloneable handle to a process-wide cache instance.
///
/// Construct one at startup and pass clones to every component that needs
/// it. Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<Mutex<CacheStore>>,
    clock: Arc<dyn Clock>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// Creates an empty cache driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new())),
            clock,
        }
    }

    /// The clock this cache evaluates expiry against.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns a copy of the value under `key` if present and not expired.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        self.store.lock().await.get(key, now)
    }

    /// Stores `value` under `key` for `ttl`.
    pub async fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) -> Result<()> {
        let now = self.clock.now();
        self.store.lock().await.set(key.into(), value, ttl, now)
    }

    /// Returns a copy of the raw entry, including expired ones not yet reclaimed.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.store.lock().await.peek(key)
    }

    /// Removes `key`. Returns whether it was present; absence is not an error.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.lock().await.delete(key)
    }

    /// Drops every entry.
    pub async fn clear(&self) -> usize {
        let removed = self.store.lock().await.clear();
        info!("Cache cleared: removed {} entries", removed);
        removed
    }

    /// Removes every entry expired at call time and returns how many went.
    ///
    /// Expired keys are snapshotted under the lock, then removed in batches
    /// of [`SWEEP_BATCH_SIZE`] so writers are not blocked for the whole scan.
    /// Each batch re-checks expiry against the same instant, so an entry
    /// refreshed by a concurrent `set` survives.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let candidates = self.store.lock().await.expired_keys(now);

        let mut removed = 0;
        for batch in candidates.chunks(SWEEP_BATCH_SIZE) {
            removed += self.store.lock().await.remove_expired(batch, now);
        }

        if removed > 0 {
            info!("Cache sweep: removed {} expired entries", removed);
        } else {
            debug!("Cache sweep: no expired entries found");
        }
        removed
    }

    /// Removes every key `matcher` accepts and returns the count.
    pub async fn remove_matching(&self, matcher: &dyn KeyMatcher) -> usize {
        let removed = self.store.lock().await.remove_matching(matcher);
        for key in &removed {
            debug!("Invalidated cache key: {}", key);
        }
        removed.len()
    }

    /// Occupancy snapshot with expiry evaluated now. Does not reclaim anything.
    pub async fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        self.store.lock().await.stats(now)
    }

    /// Stats enriched with the cache kind and snapshot time.
    pub async fn report(&self) -> StatsReport {
        let stats = self.stats().await;
        StatsReport::new(stats, self.clock.now())
    }

    /// Number of entries held, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Returns true if no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }
}
