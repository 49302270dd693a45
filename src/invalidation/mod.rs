//! Invalidation Module
//!
//! Pattern-based removal of cached reads after writes commit.
//!
//! # Pattern forms
//! - exact key: `user:profile:7`
//! - prefix wildcard: `user:*`
//! - substring: `*user_id:7*`
//! - entity: see [`Invalidator::invalidate_for_entity`]

mod coordinator;
mod pattern;

pub use coordinator::{InvalidatingWrite, Invalidator};
pub use pattern::{KeyMatcher, KeyPattern, WILDCARD};
