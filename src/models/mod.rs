//! Data models exposed by the cache layer
//!
//! Serializable views over cache state for monitoring.

pub mod report;

// Re-export commonly used types
pub use report::StatsReport;
