//! Operator cache administration service.
//!
//! Unlike the request path, the operator surface reports cache backend
//! failures instead of absorbing them: an operator asking for stats or a
//! clear needs to know when the backend is down.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::cache::{CacheCategory, ReadThroughCache, cache_key, window_suffix};
use crate::domain::ports::{
    CacheAdmin, CacheStore, CacheStoreError, CacheStoreStats, ClearCacheRequest,
    ClearCacheResponse, SocialFeedRepository, SocialFeedRepositoryError, UserRepository,
    WarmCacheRequest, WarmCacheResponse,
};
use crate::domain::{Error, FeedQuerySpec, FeedSortKey, FeedWindow, UserId};
use pagination::PageParams;

fn map_store_error(error: CacheStoreError) -> Error {
    Error::service_unavailable(format!("cache store unavailable: {error}"))
}

fn map_feed_error(error: SocialFeedRepositoryError) -> Error {
    match error {
        SocialFeedRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("social feed repository unavailable: {message}"))
        }
        SocialFeedRepositoryError::Query { message } => {
            Error::internal(format!("social feed repository error: {message}"))
        }
    }
}

/// Cache administration service implementing the operator driving port.
#[derive(Clone)]
pub struct CacheAdminService<S: ?Sized, F, U> {
    store: Arc<S>,
    feed_repo: Arc<F>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, F, U> CacheAdminService<S, F, U> {
    /// Create a new service over the cache store and the statistics path.
    pub fn new(
        store: Arc<S>,
        feed_repo: Arc<F>,
        user_repo: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            feed_repo,
            user_repo,
            clock,
        }
    }
}

impl<S, F, U> CacheAdminService<S, F, U>
where
    S: CacheStore + ?Sized,
    F: SocialFeedRepository,
    U: UserRepository,
{
    /// Precompute default-window social statistics for one user.
    async fn warm_user(&self, user_id: &UserId) -> Result<(), Error> {
        let window = FeedWindow::default();
        let key = cache_key(
            CacheCategory::SocialStats,
            user_id,
            Some(&window_suffix(window.days())),
        );
        let spec = FeedQuerySpec::new(
            user_id.clone(),
            window,
            FeedSortKey::Duration,
            PageParams::default(),
        );
        let now = self.clock.utc();
        let repo = Arc::clone(&self.feed_repo);

        let cache = ReadThroughCache::new(Arc::clone(&self.store));
        let _statistics = cache
            .fetch(&key, CacheCategory::SocialStats.ttl(), move || async move {
                repo.statistics(&spec, now).await.map_err(map_feed_error)
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<S, F, U> CacheAdmin for CacheAdminService<S, F, U>
where
    S: CacheStore + ?Sized,
    F: SocialFeedRepository,
    U: UserRepository,
{
    async fn stats(&self) -> Result<CacheStoreStats, Error> {
        self.store.stats().await.map_err(map_store_error)
    }

    async fn clear(&self, request: ClearCacheRequest) -> Result<ClearCacheResponse, Error> {
        if request.pattern.trim().is_empty() {
            return Err(Error::invalid_request("clear pattern must not be empty"));
        }

        let deleted = self
            .store
            .delete_pattern(&request.pattern)
            .await
            .map_err(map_store_error)?;

        Ok(ClearCacheResponse { deleted })
    }

    async fn warm(&self, request: WarmCacheRequest) -> Result<WarmCacheResponse, Error> {
        let targets = match request.user_id {
            Some(user_id) => {
                let exists = self.user_repo.exists(&user_id).await.map_err(|err| {
                    Error::internal(format!("user repository error: {err}"))
                })?;
                if !exists {
                    return Err(Error::not_found(format!("user {user_id} not found")));
                }
                vec![user_id]
            }
            None => self
                .user_repo
                .list_ids()
                .await
                .map_err(|err| Error::internal(format!("user repository error: {err}")))?,
        };

        let mut warmed = 0_u64;
        for user_id in &targets {
            self.warm_user(user_id).await?;
            warmed += 1;
        }

        Ok(WarmCacheResponse {
            users_warmed: warmed,
        })
    }
}
