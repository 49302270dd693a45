//! Stats report DTO
//!
//! Read-only projection of cache occupancy for operational monitoring.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheStats, CACHE_KIND};

/// Occupancy snapshot enriched with static metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Entries currently held, expired or not
    pub total_entries: usize,
    /// Entries still within their TTL
    pub active_entries: usize,
    /// Entries past their TTL that have not been reclaimed yet
    pub expired_entries: usize,
    /// Kind of cache backing the report
    pub cache_kind: String,
    /// When the snapshot was taken (RFC 3339)
    pub timestamp: DateTime<Utc>,
}

impl StatsReport {
    /// Creates a report from a stats snapshot taken at `timestamp`.
    pub fn new(stats: CacheStats, timestamp: DateTime<Utc>) -> Self {
        Self {
            total_entries: stats.total_entries,
            active_entries: stats.active_entries,
            expired_entries: stats.expired_entries,
            cache_kind: CACHE_KIND.to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_from_stats() {
        let now = Utc::now();
        let report = StatsReport::new(CacheStats::new(5, 2), now);

        assert_eq!(report.total_entries, 5);
        assert_eq!(report.active_entries, 3);
        assert_eq!(report.expired_entries, 2);
        assert_eq!(report.cache_kind, "in_memory");
        assert_eq!(report.timestamp, now);
    }

    #[test]
    fn test_report_serialize() {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let report = StatsReport::new(CacheStats::new(1, 0), timestamp);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_entries"], 1);
        assert_eq!(json["active_entries"], 1);
        assert_eq!(json["expired_entries"], 0);
        assert_eq!(json["cache_kind"], "in_memory");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }
}
