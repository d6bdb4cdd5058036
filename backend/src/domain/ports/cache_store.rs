//! Port interface for the key-value cache backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cache::CacheKey;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by cache store adapters.
    pub enum CacheStoreError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "cache store backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "cache store serialisation failed: {message}",
    }
}

/// Observability snapshot reported by a cache store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStoreStats {
    /// Number of keys currently held.
    pub keys: u64,
    /// Reads answered from the cache since start-up.
    pub hits: u64,
    /// Reads that fell through to a producer since start-up.
    pub misses: u64,
    /// Bytes used by the backend, when it reports memory usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_used_bytes: Option<u64>,
}

/// Key-value cache backend with TTL writes and wildcard invalidation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the raw value stored under `key`, if present and unexpired.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheStoreError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration)
    -> Result<(), CacheStoreError>;

    /// Delete one key. Returns the number of keys removed (0 or 1).
    async fn delete(&self, key: &CacheKey) -> Result<u64, CacheStoreError>;

    /// Delete every key matching a wildcard glob, returning the count.
    ///
    /// Implementations must scan incrementally rather than blocking the
    /// backend on large key spaces.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheStoreError>;

    /// Report backend statistics for the operator surface.
    async fn stats(&self) -> Result<CacheStoreStats, CacheStoreError>;
}

/// In-memory cache store for tests and database-less runs.
///
/// Values never expire (TTLs are accepted and ignored) and deleted patterns
/// are recorded so invalidation behaviour can be asserted.
#[derive(Debug, Default)]
pub struct FixtureCacheStore {
    entries: Mutex<HashMap<String, String>>,
    deleted_patterns: Mutex<Vec<String>>,
    hits: Mutex<u64>,
    misses: Mutex<u64>,
}

impl FixtureCacheStore {
    /// Pre-populate an entry, bypassing the TTL path.
    pub fn seed(&self, key: &CacheKey, value: &str) {
        self.with_entries(|entries| {
            entries.insert(key.as_str().to_owned(), value.to_owned());
        });
    }

    /// Raw stored value for assertions.
    pub fn raw_value(&self, key: &CacheKey) -> Option<String> {
        self.with_entries(|entries| entries.get(key.as_str()).cloned())
    }

    /// Every pattern passed to [`CacheStore::delete_pattern`], in order.
    pub fn deleted_patterns(&self) -> Vec<String> {
        match self.deleted_patterns.lock() {
            Ok(patterns) => patterns.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        match self.entries.lock() {
            Ok(mut entries) => f(&mut entries),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn bump(counter: &Mutex<u64>) {
        if let Ok(mut value) = counter.lock() {
            *value += 1;
        }
    }

    fn read(counter: &Mutex<u64>) -> u64 {
        counter.lock().map(|value| *value).unwrap_or(0)
    }

    fn glob_matches(pattern: &str, key: &str) -> bool {
        // Only the trailing-star globs produced by `user_pattern` and the
        // admin clear endpoint need to match.
        pattern.strip_suffix('*').map_or_else(
            || pattern == key,
            |prefix| key.starts_with(prefix),
        )
    }
}

#[async_trait]
impl CacheStore for FixtureCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheStoreError> {
        let value = self.with_entries(|entries| entries.get(key.as_str()).cloned());
        if value.is_some() {
            Self::bump(&self.hits);
        } else {
            Self::bump(&self.misses);
        }
        Ok(value)
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        self.with_entries(|entries| {
            entries.insert(key.as_str().to_owned(), value.to_owned());
        });
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<u64, CacheStoreError> {
        let removed = self.with_entries(|entries| entries.remove(key.as_str()));
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheStoreError> {
        if let Ok(mut patterns) = self.deleted_patterns.lock() {
            patterns.push(pattern.to_owned());
        }
        let removed = self.with_entries(|entries| {
            let before = entries.len();
            entries.retain(|key, _| !Self::glob_matches(pattern, key));
            before - entries.len()
        });
        Ok(removed as u64)
    }

    async fn stats(&self) -> Result<CacheStoreStats, CacheStoreError> {
        Ok(CacheStoreStats {
            keys: self.with_entries(|entries| entries.len() as u64),
            hits: Self::read(&self.hits),
            misses: Self::read(&self.misses),
            memory_used_bytes: None,
        })
    }
}
