//! Explicit read-through cache over the [`CacheStore`] port.
//!
//! The cache is a derived, disposable accelerator: every failure on the
//! cache path is logged and swallowed, and the call degrades to the
//! producer. Only the relational store is authoritative.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::CacheStore;

use super::{CacheCategory, CacheKey, cache_key, user_pattern};

/// Read-through wrapper parameterised by key, TTL, and a recompute closure.
///
/// There is no cross-process lock: concurrent misses on the same key may
/// each invoke the producer and race the store write. Producers are
/// idempotent reads, so the last write wins harmlessly.
pub struct ReadThroughCache<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ReadThroughCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ReadThroughCache<S>
where
    S: CacheStore + ?Sized,
{
    /// Wrap a cache store port.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Access the underlying store, for adapters that need raw operations.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Return the cached value under `key`, or recompute, store, and return.
    ///
    /// The producer only runs on a miss (or an unreadable hit). Producer
    /// errors propagate; cache errors never do.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(%key, %error, "cached value unreadable; recomputing");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(%key, %error, "cache read failed; recomputing");
            }
        }

        let value = producer().await?;

        match serde_json::to_string(&value) {
            Ok(encoded) => {
                if let Err(error) = self.store.set(key, &encoded, ttl).await {
                    warn!(%key, %error, "cache write failed; value served uncached");
                }
            }
            Err(error) => {
                warn!(%key, %error, "value not serialisable for cache");
            }
        }

        Ok(value)
    }

    /// Delete one key, swallowing store failures.
    pub async fn invalidate(&self, key: &CacheKey) {
        if let Err(error) = self.store.delete(key).await {
            warn!(%key, %error, "cache invalidation failed; entry expires by TTL");
        }
    }

    /// Delete the bare key and every suffixed key of a category for a user.
    ///
    /// Best-effort: a failure here leaves stale entries that age out at the
    /// category TTL.
    pub async fn invalidate_user(&self, category: CacheCategory, user_id: &crate::domain::UserId) {
        self.invalidate(&cache_key(category, user_id, None)).await;

        let pattern = user_pattern(category, user_id);
        if let Err(error) = self.store.delete_pattern(&pattern).await {
            warn!(
                %pattern,
                %error,
                "cache pattern invalidation failed; entries expire by TTL"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    //! Read-through behaviour: hits skip the producer, misses populate,
    //! cache failures fail open.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use rstest::rstest;

    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::{CacheStoreError, FixtureCacheStore, MockCacheStore};

    fn fixture_key() -> CacheKey {
        CacheKey::new("social_stats:user:3fa85f64-5717-4562-b3fc-2c963f66afa6:days:7")
            .expect("valid key")
    }

    #[rstest]
    #[tokio::test]
    async fn miss_invokes_producer_and_populates() {
        let store = Arc::new(FixtureCacheStore::default());
        let cache = ReadThroughCache::new(store.clone());
        let key = fixture_key();

        let value = cache
            .fetch(&key, Duration::from_secs(60), || async { Ok(41_i64) })
            .await
            .expect("producer succeeds");

        assert_eq!(value, 41);
        assert_eq!(store.raw_value(&key), Some("41".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn hit_skips_producer() {
        let store = Arc::new(FixtureCacheStore::default());
        let cache = ReadThroughCache::new(store.clone());
        let key = fixture_key();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .fetch(&key, Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7_i64)
                })
                .await
                .expect("fetch succeeds");
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1, "second read is a hit");
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_fails_open() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Err(CacheStoreError::backend("connection refused")));
        store
            .expect_set()
            .returning(|_, _, _| Err(CacheStoreError::backend("connection refused")));
        let cache = ReadThroughCache::new(Arc::new(store));

        let value = cache
            .fetch(&fixture_key(), Duration::from_secs(60), || async {
                Ok("recomputed".to_owned())
            })
            .await
            .expect("producer result served despite cache failure");

        assert_eq!(value, "recomputed");
    }

    #[rstest]
    #[tokio::test]
    async fn producer_error_propagates() {
        let store = Arc::new(FixtureCacheStore::default());
        let cache = ReadThroughCache::new(store);

        let result: Result<i64, Error> = cache
            .fetch(&fixture_key(), Duration::from_secs(60), || async {
                Err(Error::internal("database down"))
            })
            .await;

        assert!(result.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_hit_recomputes() {
        let store = Arc::new(FixtureCacheStore::default());
        let key = fixture_key();
        store.seed(&key, "not json {{{");
        let cache = ReadThroughCache::new(store.clone());

        let value: i64 = cache
            .fetch(&key, Duration::from_secs(60), || async { Ok(9) })
            .await
            .expect("recompute succeeds");

        assert_eq!(value, 9);
        assert_eq!(store.raw_value(&key), Some("9".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidate_user_removes_bare_and_suffixed_keys() {
        let store = Arc::new(FixtureCacheStore::default());
        let user = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let bare = cache_key(CacheCategory::Following, &user, None);
        let page = cache_key(CacheCategory::Following, &user, Some("limit:20:offset:0"));
        store.seed(&bare, "[]");
        store.seed(&page, "[]");
        let cache = ReadThroughCache::new(store.clone());

        cache.invalidate_user(CacheCategory::Following, &user).await;

        assert_eq!(store.raw_value(&bare), None);
        assert_eq!(store.raw_value(&page), None);
        assert!(
            store
                .deleted_patterns()
                .contains(&user_pattern(CacheCategory::Following, &user))
        );
    }
}
