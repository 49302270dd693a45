//! Memo Cache - An in-process cache-aside layer
//!
//! Provides a mutex-guarded TTL store, deterministic call fingerprints,
//! memoization of async reads, pattern-based invalidation after writes and a
//! background expiry sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod memo;
pub mod models;
pub mod tasks;

pub use cache::Cache;
pub use config::{Config, TtlProfile};
pub use error::{CacheError, Result};
pub use invalidation::{InvalidatingWrite, Invalidator, KeyMatcher, KeyPattern};
pub use memo::Memoized;
pub use models::StatsReport;
pub use tasks::{Sweeper, SweeperConfig, SweeperState};
