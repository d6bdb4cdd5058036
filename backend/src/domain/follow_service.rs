//! Follow graph domain service.
//!
//! Maintains the directed follow graph and keeps the derived caches
//! consistent. Invalidation is an explicit step after each successful write,
//! performed here rather than hidden in persistence hooks, so it stays
//! visible and testable.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::cache::{
    CacheCategory, ReadThroughCache, cache_key, cacheable_page, page_suffix,
};
use crate::domain::ports::{
    CacheStore, FollowCommand, FollowListEntry, FollowQuery, FollowRepository,
    FollowRepositoryError, FollowRequest, FollowResponse, ListFollowsRequest,
    ListFollowsResponse, UnfollowRequest, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, FollowEdge, FollowEdgeDraft, UserId};
use pagination::{Page, PageParams};

fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowRepositoryError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
        FollowRepositoryError::DuplicateEdge => Error::conflict("already following this user"),
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

/// Follow graph service implementing the command and query driving ports.
#[derive(Clone)]
pub struct FollowService<R, U, S: ?Sized> {
    follow_repo: Arc<R>,
    user_repo: Arc<U>,
    cache: ReadThroughCache<S>,
    clock: Arc<dyn Clock>,
}

impl<R, U, S: ?Sized> FollowService<R, U, S> {
    /// Create a new service over the follow and user repositories.
    pub fn new(
        follow_repo: Arc<R>,
        user_repo: Arc<U>,
        cache: ReadThroughCache<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            cache,
            clock,
        }
    }
}

impl<R, U, S> FollowService<R, U, S>
where
    R: FollowRepository,
    U: UserRepository,
    S: CacheStore + ?Sized,
{
    /// Post-commit invalidation for a changed `follower -> followed` edge.
    ///
    /// Drops the follower's following list and count, the followed user's
    /// followers list and count, and the follower's social statistics (their
    /// feed composition changed). Best-effort: failures are logged by the
    /// cache wrapper and the entries age out by TTL.
    async fn invalidate_edge_caches(&self, follower: &UserId, followed: &UserId) {
        self.cache
            .invalidate_user(CacheCategory::Following, follower)
            .await;
        self.cache
            .invalidate_user(CacheCategory::FollowingCount, follower)
            .await;
        self.cache
            .invalidate_user(CacheCategory::Followers, followed)
            .await;
        self.cache
            .invalidate_user(CacheCategory::FollowersCount, followed)
            .await;
        self.cache
            .invalidate_user(CacheCategory::SocialStats, follower)
            .await;
    }

    async fn cached_count(
        &self,
        category: CacheCategory,
        user_id: &UserId,
    ) -> Result<i64, Error> {
        let key = cache_key(category, user_id, None);
        let repo = Arc::clone(&self.follow_repo);
        let owner = user_id.clone();
        self.cache
            .fetch(&key, category.ttl(), move || async move {
                let count = match category {
                    CacheCategory::FollowersCount => repo.followers_count(&owner).await,
                    _ => repo.following_count(&owner).await,
                };
                count.map_err(map_follow_error)
            })
            .await
    }

    async fn cached_list(
        &self,
        category: CacheCategory,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, Error> {
        let repo = Arc::clone(&self.follow_repo);
        let owner = user_id.clone();
        let produce = move || async move {
            let listed = match category {
                CacheCategory::Followers => repo.list_followers(&owner, page).await,
                _ => repo.list_following(&owner, page).await,
            };
            listed.map_err(map_follow_error)
        };

        if cacheable_page(&page) {
            let key = cache_key(category, user_id, Some(&page_suffix(&page)));
            self.cache.fetch(&key, category.ttl(), produce).await
        } else {
            produce().await
        }
    }
}

#[async_trait]
impl<R, U, S> FollowCommand for FollowService<R, U, S>
where
    R: FollowRepository,
    U: UserRepository,
    S: CacheStore + ?Sized,
{
    async fn follow(&self, request: FollowRequest) -> Result<FollowResponse, Error> {
        let edge = FollowEdge::new(FollowEdgeDraft {
            id: Uuid::new_v4(),
            follower_id: request.follower.clone(),
            followed_id: request.target.clone(),
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let target_exists = self
            .user_repo
            .exists(&request.target)
            .await
            .map_err(map_user_error)?;
        if !target_exists {
            return Err(Error::not_found(format!(
                "user {} not found",
                request.target
            )));
        }

        let already = self
            .follow_repo
            .exists(&request.follower, &request.target)
            .await
            .map_err(map_follow_error)?;
        if already {
            return Err(Error::conflict("already following this user"));
        }

        self.follow_repo
            .insert(&edge)
            .await
            .map_err(map_follow_error)?;

        self.invalidate_edge_caches(&request.follower, &request.target)
            .await;

        Ok(FollowResponse { edge: edge.into() })
    }

    async fn unfollow(&self, request: UnfollowRequest) -> Result<(), Error> {
        let removed = self
            .follow_repo
            .delete(&request.follower, &request.target)
            .await
            .map_err(map_follow_error)?;

        if !removed {
            return Err(Error::not_found("follow relationship not found"));
        }

        self.invalidate_edge_caches(&request.follower, &request.target)
            .await;

        Ok(())
    }
}

#[async_trait]
impl<R, U, S> FollowQuery for FollowService<R, U, S>
where
    R: FollowRepository,
    U: UserRepository,
    S: CacheStore + ?Sized,
{
    async fn list_following(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error> {
        let count = self
            .cached_count(CacheCategory::FollowingCount, &request.user_id)
            .await?;
        let entries = self
            .cached_list(CacheCategory::Following, &request.user_id, request.page)
            .await?;

        Ok(ListFollowsResponse {
            users: Page::new(entries, count, request.page),
            count,
        })
    }

    async fn list_followers(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error> {
        let count = self
            .cached_count(CacheCategory::FollowersCount, &request.user_id)
            .await?;
        let entries = self
            .cached_list(CacheCategory::Followers, &request.user_id, request.page)
            .await?;

        Ok(ListFollowsResponse {
            users: Page::new(entries, count, request.page),
            count,
        })
    }
}

#[cfg(test)]
#[path = "follow_service_tests.rs"]
mod tests;
