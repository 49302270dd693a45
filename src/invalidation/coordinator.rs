//! Invalidation Coordinator
//!
//! Purges cached reads after a write has committed. Callers must only invoke
//! these operations once the write succeeded; [`InvalidatingWrite`] enforces
//! that for wrapped mutations.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;

use tracing::info;

use crate::cache::Cache;
use crate::error::Result;
use crate::invalidation::{KeyMatcher, KeyPattern};

// == Invalidator ==
/// Removes cache entries by pattern.
#[derive(Debug, Clone)]
pub struct Invalidator {
    cache: Cache,
}

impl Invalidator {
    /// Creates a coordinator over `cache`.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Parses `pattern` and removes every matching entry.
    ///
    /// Matching nothing returns 0.
    ///
    /// # Errors
    /// `CacheError::InvalidPattern` if the pattern is malformed.
    pub async fn invalidate(&self, pattern: &str) -> Result<usize> {
        let pattern = KeyPattern::parse(pattern)?;
        Ok(self.invalidate_pattern(&pattern).await)
    }

    /// Removes entries for each pattern in turn and returns the total.
    ///
    /// All patterns are parsed before anything is removed.
    pub async fn invalidate_all(&self, patterns: &[&str]) -> Result<usize> {
        let parsed = patterns
            .iter()
            .map(|pattern| KeyPattern::parse(pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.invalidate_patterns(&parsed).await)
    }

    /// Removes entries matching an already parsed pattern.
    pub async fn invalidate_pattern(&self, pattern: &KeyPattern) -> usize {
        let removed = self.cache.remove_matching(pattern).await;
        info!("Invalidated {} cache entries for pattern '{}'", removed, pattern);
        removed
    }

    /// Removes entries for each parsed pattern and returns the total.
    pub async fn invalidate_patterns(&self, patterns: &[KeyPattern]) -> usize {
        let mut removed = 0;
        for pattern in patterns {
            removed += self.invalidate_pattern(pattern).await;
        }
        removed
    }

    /// Removes entries accepted by a custom matcher.
    pub async fn invalidate_matching(&self, matcher: &dyn KeyMatcher) -> usize {
        let removed = self.cache.remove_matching(matcher).await;
        info!("Invalidated {} cache entries for custom matcher", removed);
        removed
    }

    /// Removes every key containing `entity_type` and, if given, the id.
    ///
    /// # Errors
    /// `CacheError::InvalidPattern` if `entity_type` is empty.
    pub async fn invalidate_for_entity<I>(&self, entity_type: &str, entity_id: Option<I>) -> Result<usize>
    where
        I: Display,
    {
        let pattern = KeyPattern::entity(entity_type, entity_id.map(|id| id.to_string()))?;
        let removed = self.cache.remove_matching(&pattern).await;
        info!("Invalidated {} cache entries for {}", removed, entity_type);
        Ok(removed)
    }

    /// Removes every key carrying the `user_id:{user_id}` marker.
    pub async fn invalidate_user<I>(&self, user_id: I) -> usize
    where
        I: Display,
    {
        let pattern = KeyPattern::Contains(format!("user_id:{user_id}"));
        let removed = self.cache.remove_matching(&pattern).await;
        info!("Invalidated {} cache entries for user {}", removed, user_id);
        removed
    }
}

// == Invalidating Write ==
/// A mutation that purges related cached reads once it succeeds.
///
/// Patterns are parsed at construction so a malformed one fails fast rather
/// than silently matching nothing. A failed write leaves the cache untouched.
pub struct InvalidatingWrite<F, A> {
    invalidator: Invalidator,
    patterns: Vec<KeyPattern>,
    operation: F,
    _args: PhantomData<fn(A)>,
}

impl<F, Fut, A, T, E> InvalidatingWrite<F, A>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    /// Wraps `operation`, invalidating `patterns` after each success.
    ///
    /// # Errors
    /// `CacheError::InvalidPattern` if any pattern is malformed.
    pub fn new(cache: Cache, patterns: &[&str], operation: F) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| KeyPattern::parse(pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            invalidator: Invalidator::new(cache),
            patterns,
            operation,
            _args: PhantomData,
        })
    }

    /// Patterns invalidated after a successful call.
    pub fn patterns(&self) -> &[KeyPattern] {
        &self.patterns
    }

    /// Runs the write; on `Ok` purges the configured patterns.
    pub async fn call(&self, args: A) -> std::result::Result<T, E> {
        let result = (self.operation)(args).await;
        if result.is_ok() {
            self.invalidator.invalidate_patterns(&self.patterns).await;
        }
        result
    }
}
