//! Cache Statistics Module
//!
//! Occupancy snapshot of the store.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time occupancy of the cache.
///
/// Expiry is evaluated eagerly when the snapshot is taken, so
/// `active_entries + expired_entries == total_entries` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, expired or not
    pub total_entries: usize,
    /// Entries still within their TTL
    pub active_entries: usize,
    /// Entries past their TTL that have not been reclaimed yet
    pub expired_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the total and expired counts.
    pub fn new(total_entries: usize, expired_entries: usize) -> Self {
        Self {
            total_entries,
            active_entries: total_entries.saturating_sub(expired_entries),
            expired_entries,
        }
    }

    /// Fraction of held entries that are expired, or 0.0 when empty.
    pub fn expired_ratio(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            self.expired_entries as f64 / self.total_entries as f64
        }
    }
}
