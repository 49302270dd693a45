//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the cache.
//!
//! # Tasks
//! - Expiry Sweeper: removes expired cache entries at configured intervals

mod sweeper;

pub use sweeper::{Sweeper, SweeperConfig, SweeperState};
