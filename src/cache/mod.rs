//! Cache Module
//!
//! Provides the in-memory key-value store with TTL expiration and the
//! shared handle the rest of the crate works through.

mod clock;
mod entry;
mod handle;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use handle::{Cache, SWEEP_BATCH_SIZE};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Label reported as the cache kind in stats reports
pub const CACHE_KIND: &str = "in_memory";
