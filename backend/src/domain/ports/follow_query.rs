//! Driving port for follow graph reads.

use async_trait::async_trait;
use pagination::{Page, PageParams};

use crate::domain::{Error, UserId};

use super::follow_repository::FollowListEntry;

/// Request for the users someone follows, or their followers.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFollowsRequest {
    pub user_id: UserId,
    pub page: PageParams,
}

/// A page of related users plus the cached total for the relation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFollowsResponse {
    pub users: Page<FollowListEntry>,
    /// Read-through cached relation count (`following_count` or
    /// `followers_count` depending on the call).
    pub count: i64,
}

/// Driving port for follow graph read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowQuery: Send + Sync {
    /// Users `user_id` follows, newest edge first.
    async fn list_following(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error>;

    /// Users following `user_id`, newest edge first.
    async fn list_followers(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error>;
}

/// Fixture query implementation answering with empty relations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFollowQuery;

#[async_trait]
impl FollowQuery for FixtureFollowQuery {
    async fn list_following(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error> {
        Ok(ListFollowsResponse {
            users: Page::empty(request.page),
            count: 0,
        })
    }

    async fn list_followers(
        &self,
        request: ListFollowsRequest,
    ) -> Result<ListFollowsResponse, Error> {
        Ok(ListFollowsResponse {
            users: Page::empty(request.page),
            count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_relations_are_empty() {
        let query = FixtureFollowQuery;
        let request = ListFollowsRequest {
            user_id: UserId::random(),
            page: PageParams::default(),
        };

        let following = query
            .list_following(request.clone())
            .await
            .expect("fixture list succeeds");
        let followers = query
            .list_followers(request)
            .await
            .expect("fixture list succeeds");

        assert_eq!(following.count, 0);
        assert!(followers.users.items.is_empty());
    }
}
