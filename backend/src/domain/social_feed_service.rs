//! Social feed domain service.
//!
//! Evaluates feed pages and statistics for a requesting user. The entry page
//! always comes from the repository's single join query; the statistics
//! block flows through the read-through cache, scoped by the lookback
//! window.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::cache::{CacheCategory, ReadThroughCache, cache_key, window_suffix};
use crate::domain::ports::{
    CacheStore, FollowRepository, FollowRepositoryError, GetFeedRequest, GetFeedResponse,
    GetFeedStatisticsRequest, GetFeedStatisticsResponse, SocialFeedQuery, SocialFeedRepository,
    SocialFeedRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, FeedPage, FeedQuerySpec, FeedStatistics, FeedWindow, UserId};
use pagination::PageInfo;

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

fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        _ => Error::internal(format!("follow repository error: {error}")),
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Social feed service implementing the feed driving port.
#[derive(Clone)]
pub struct SocialFeedService<F, R, U, S: ?Sized> {
    feed_repo: Arc<F>,
    follow_repo: Arc<R>,
    user_repo: Arc<U>,
    cache: ReadThroughCache<S>,
    clock: Arc<dyn Clock>,
}

impl<F, R, U, S: ?Sized> SocialFeedService<F, R, U, S> {
    /// Create a new service over the feed, follow, and user repositories.
    pub fn new(
        feed_repo: Arc<F>,
        follow_repo: Arc<R>,
        user_repo: Arc<U>,
        cache: ReadThroughCache<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            feed_repo,
            follow_repo,
            user_repo,
            cache,
            clock,
        }
    }
}

impl<F, R, U, S> SocialFeedService<F, R, U, S>
where
    F: SocialFeedRepository,
    R: FollowRepository,
    U: UserRepository,
    S: CacheStore + ?Sized,
{
    async fn ensure_user_exists(&self, user_id: &UserId) -> Result<(), Error> {
        let exists = self
            .user_repo
            .exists(user_id)
            .await
            .map_err(map_user_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    /// Statistics for the window, served read-through from the cache.
    async fn cached_statistics(
        &self,
        user_id: &UserId,
        window: FeedWindow,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<FeedStatistics, Error> {
        let key = cache_key(
            CacheCategory::SocialStats,
            user_id,
            Some(&window_suffix(window.days())),
        );
        let repo = Arc::clone(&self.feed_repo);
        let spec = spec.clone();
        self.cache
            .fetch(&key, CacheCategory::SocialStats.ttl(), move || async move {
                repo.statistics(&spec, now).await.map_err(map_feed_error)
            })
            .await
    }
}

#[async_trait]
impl<F, R, U, S> SocialFeedQuery for SocialFeedService<F, R, U, S>
where
    F: SocialFeedRepository,
    R: FollowRepository,
    U: UserRepository,
    S: CacheStore + ?Sized,
{
    async fn feed(&self, request: GetFeedRequest) -> Result<GetFeedResponse, Error> {
        self.ensure_user_exists(&request.user_id).await?;
        let now = self.clock.utc();

        let following = self
            .follow_repo
            .following_count(&request.user_id)
            .await
            .map_err(map_follow_error)?;

        if following == 0 {
            return Ok(GetFeedResponse {
                feed: FeedPage {
                    entries: Vec::new(),
                    info: PageInfo::compute(0, 0, request.page),
                    statistics: FeedStatistics::empty(),
                    message: Some("not following anyone yet".to_owned()),
                },
            });
        }

        let spec = FeedQuerySpec::new(
            request.user_id.clone(),
            request.window,
            request.sort,
            request.page,
        );

        let total = self
            .feed_repo
            .count_entries(&spec, now)
            .await
            .map_err(map_feed_error)?;

        if total == 0 {
            return Ok(GetFeedResponse {
                feed: FeedPage {
                    entries: Vec::new(),
                    info: PageInfo::compute(0, 0, request.page),
                    statistics: FeedStatistics::empty(),
                    message: Some(format!(
                        "none of the {following} users you follow have completed sleep \
                         records in the last {} days",
                        request.window.days()
                    )),
                },
            });
        }

        let entries = self
            .feed_repo
            .list_entries(&spec, now)
            .await
            .map_err(map_feed_error)?;
        let statistics = self
            .cached_statistics(&request.user_id, request.window, &spec, now)
            .await?;

        let returned = i64::try_from(entries.len()).unwrap_or(i64::MAX);
        Ok(GetFeedResponse {
            feed: FeedPage {
                entries,
                info: PageInfo::compute(total, returned, request.page),
                statistics,
                message: None,
            },
        })
    }

    async fn feed_statistics(
        &self,
        request: GetFeedStatisticsRequest,
    ) -> Result<GetFeedStatisticsResponse, Error> {
        self.ensure_user_exists(&request.user_id).await?;
        let now = self.clock.utc();

        let spec = FeedQuerySpec::new(
            request.user_id.clone(),
            request.window,
            crate::domain::FeedSortKey::Duration,
            pagination::PageParams::default(),
        );

        let statistics = self
            .cached_statistics(&request.user_id, request.window, &spec, now)
            .await?;

        Ok(GetFeedStatisticsResponse {
            statistics,
            window_days: request.window.days(),
        })
    }
}

#[cfg(test)]
#[path = "social_feed_service_tests.rs"]
mod tests;
