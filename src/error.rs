//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error; these variants cover malformed inputs and internal failures only.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalidation pattern could not be parsed
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Memoized operation name or prefix is empty or contains a wildcard
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// TTL is zero or outside the representable time range
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Arguments or values could not be converted to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal failure (e.g. a background task could not be joined)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
