//! Key patterns
//!
//! Matching policy for invalidation, kept behind the [`KeyMatcher`] trait so
//! callers can plug in their own rule.
//!
//! Pattern grammar accepted by [`KeyPattern::parse`]:
//! - `user:profile:7` exact key
//! - `user:*` any key starting with `user:`
//! - `*user_id:7*` any key containing `user_id:7`

use std::fmt;

use crate::error::{CacheError, Result};

/// Wildcard marker in textual patterns.
pub const WILDCARD: char = '*';

// == Key Matcher ==
/// Decides whether a cache key should be invalidated.
pub trait KeyMatcher: Send + Sync {
    /// Returns true if `key` is covered by this matcher.
    fn matches(&self, key: &str) -> bool;
}

impl<F> KeyMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, key: &str) -> bool {
        self(key)
    }
}

// == Key Pattern ==
/// Built-in matching policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Key equals the string
    Exact(String),
    /// Key starts with the string
    Prefix(String),
    /// Key contains the string anywhere
    Contains(String),
    /// Key contains the entity type and, if given, the entity id.
    ///
    /// Looser than `Prefix` on purpose: it reaches keys whose layout the
    /// writer does not know.
    Entity {
        entity_type: String,
        entity_id: Option<String>,
    },
}

impl KeyPattern {
    /// Parses an exact, `prefix*` or `*infix*` pattern.
    ///
    /// # Errors
    /// `CacheError::InvalidPattern` for an empty pattern, a bare `*`, a
    /// leading-only `*suffix`, or a wildcard anywhere but the ends.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(CacheError::InvalidPattern("pattern is empty".to_string()));
        }

        let leading = pattern.starts_with(WILDCARD);
        let trailing = pattern.ends_with(WILDCARD);
        let inner = pattern
            .strip_prefix(WILDCARD)
            .unwrap_or(pattern);
        let inner = inner.strip_suffix(WILDCARD).unwrap_or(inner);

        if inner.is_empty() {
            return Err(CacheError::InvalidPattern(format!(
                "'{pattern}' matches every key; use clear() instead"
            )));
        }
        if inner.contains(WILDCARD) {
            return Err(CacheError::InvalidPattern(format!(
                "'{pattern}' has a wildcard in the middle"
            )));
        }

        match (leading, trailing) {
            (false, false) => Ok(Self::Exact(inner.to_string())),
            (false, true) => Ok(Self::Prefix(inner.to_string())),
            (true, true) => Ok(Self::Contains(inner.to_string())),
            (true, false) => Err(CacheError::InvalidPattern(format!(
                "'{pattern}' is a suffix pattern, which is not supported"
            ))),
        }
    }

    /// Entity pattern for `entity_type` and an optional id.
    ///
    /// # Errors
    /// `CacheError::InvalidPattern` if `entity_type` is empty.
    pub fn entity(entity_type: &str, entity_id: Option<String>) -> Result<Self> {
        if entity_type.is_empty() {
            return Err(CacheError::InvalidPattern("entity type is empty".to_string()));
        }
        Ok(Self::Entity {
            entity_type: entity_type.to_string(),
            entity_id,
        })
    }
}

impl KeyMatcher for KeyPattern {
    fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(exact) => key == exact,
            Self::Prefix(prefix) => key.starts_with(prefix.as_str()),
            Self::Contains(needle) => key.contains(needle.as_str()),
            Self::Entity {
                entity_type,
                entity_id,
            } => {
                key.contains(entity_type.as_str())
                    && entity_id.as_deref().map_or(true, |id| key.contains(id))
            }
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => write!(f, "{exact}"),
            Self::Prefix(prefix) => write!(f, "{prefix}{WILDCARD}"),
            Self::Contains(needle) => write!(f, "{WILDCARD}{needle}{WILDCARD}"),
            Self::Entity {
                entity_type,
                entity_id: Some(id),
            } => write!(f, "{WILDCARD}{entity_type}{WILDCARD}{id}{WILDCARD}"),
            Self::Entity {
                entity_type,
                entity_id: None,
            } => write!(f, "{WILDCARD}{entity_type}{WILDCARD}"),
        }
    }
}
