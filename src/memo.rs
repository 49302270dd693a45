//! Memoizing Wrapper
//!
//! Cache-aside around an async read operation. [`Memoized`] keeps the
//! operation's signature: it takes the same argument and yields the same
//! `Result<T, E>`, with `T` round-tripped through JSON when cached.
//!
//! # Known limitation: stampedes
//! Lookups and population are not atomic. Concurrent calls that miss on the
//! same key each run the operation and each store their result (last write
//! wins). There is no single-flight deduplication.
//!
//! # Failure handling
//! - An `Err` from the operation is returned unchanged and never cached.
//! - Cache-side problems (arguments or results that do not serialize, a
//!   cached value that no longer deserializes) are logged and the call falls
//!   through to the operation. The cache never turns a good read into an error.

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::invalidation::WILDCARD;
use crate::keys::{self, KEY_SEPARATOR};

// == Memoized ==
/// A read operation wrapped with cache-aside logic.
///
/// Keys are `namespace:hash(args)` where the namespace is `prefix:name`
/// (or just `name` without a prefix). The name identifies the operation and
/// must differ between operations sharing a cache and prefix; two wrappers
/// with the same namespace read each other's entries.
pub struct Memoized<F, A> {
    cache: Cache,
    ttl: Duration,
    prefix: Option<String>,
    name: String,
    operation: F,
    _args: PhantomData<fn(A)>,
}

impl<F, Fut, A, T, E> Memoized<F, A>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    A: Serialize,
    T: Serialize + DeserializeOwned,
{
    /// Wraps `operation` under `name`, caching successful results for `ttl`.
    ///
    /// # Errors
    /// - `CacheError::InvalidName` if `name` is empty or contains a wildcard
    /// - `CacheError::InvalidTtl` if `ttl` is zero
    pub fn new(cache: Cache, name: impl Into<String>, ttl: Duration, operation: F) -> Result<Self> {
        let name = validate_segment(name.into(), "operation name")?;
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl("TTL must be greater than zero".to_string()));
        }

        Ok(Self {
            cache,
            ttl,
            prefix: None,
            name,
            operation,
            _args: PhantomData,
        })
    }

    /// Places keys under `prefix`, so `prefix:*` invalidates them.
    ///
    /// # Errors
    /// `CacheError::InvalidName` if `prefix` is empty or contains a wildcard.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        self.prefix = Some(validate_segment(prefix.into(), "prefix")?);
        Ok(self)
    }

    /// TTL applied to stored results.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Namespace every key of this wrapper starts with.
    pub fn namespace(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Cache key for a call with `args`.
    pub fn key_for(&self, args: &A) -> Result<String> {
        keys::fingerprint(&self.namespace(), args)
    }

    /// Returns the cached result for `args` or runs the operation and caches it.
    pub async fn call(&self, args: A) -> std::result::Result<T, E> {
        let key = match self.key_for(&args) {
            Ok(key) => key,
            Err(err) => {
                warn!("Bypassing cache for {}: {}", self.namespace(), err);
                return (self.operation)(args).await;
            }
        };

        if let Some(value) = self.cache.get(&key).await {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    debug!("Cache hit for key: {}", key);
                    return Ok(hit);
                }
                Err(err) => warn!("Discarding unreadable cached value for key {}: {}", key, err),
            }
        }

        debug!("Cache miss for key: {}", key);
        let result = (self.operation)(args).await?;

        match serde_json::to_value(&result) {
            Ok(value) => {
                if let Err(err) = self.cache.set(key.clone(), value, self.ttl).await {
                    warn!("Failed to cache result for key {}: {}", key, err);
                }
            }
            Err(err) => warn!("Result for key {} is not cacheable: {}", key, err),
        }

        Ok(result)
    }
}

fn validate_segment(segment: String, what: &str) -> Result<String> {
    if segment.is_empty() {
        return Err(CacheError::InvalidName(format!("{what} is empty")));
    }
    if segment.contains(WILDCARD) {
        return Err(CacheError::InvalidName(format!(
            "{what} '{segment}' contains a wildcard"
        )));
    }
    Ok(segment)
}
