//! Port for follow edge persistence and derived counts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageParams;
use serde::{Deserialize, Serialize};

use crate::domain::{FollowEdge, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "follow repository query failed: {message}",
        /// The (follower, followed) pair already exists.
        DuplicateEdge =>
            "follow relationship already exists",
    }
}

/// One row of a following/followers list: the related user plus when the
/// edge was created. Display names resolve in the same query as the edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowListEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub followed_at: DateTime<Utc>,
}

/// Port for maintaining the directed follow graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Persist a follow edge. The unique pair constraint maps to
    /// [`FollowRepositoryError::DuplicateEdge`].
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError>;

    /// Delete the edge from `follower` to `followed`. Returns whether an
    /// edge was removed.
    async fn delete(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Whether an edge from `follower` to `followed` exists.
    async fn exists(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Number of users `user_id` follows.
    async fn following_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError>;

    /// Number of users following `user_id`.
    async fn followers_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError>;

    /// Users `user_id` follows, newest edge first, with display names.
    async fn list_following(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError>;

    /// Users following `user_id`, newest edge first, with display names.
    async fn list_followers(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError>;
}
