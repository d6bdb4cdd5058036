//! Driving port for the social feed and its statistics.

use async_trait::async_trait;
use pagination::{PageInfo, PageParams};

use crate::domain::{Error, FeedPage, FeedSortKey, FeedStatistics, FeedWindow, UserId};

/// Request for a feed page.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeedRequest {
    pub user_id: UserId,
    pub window: FeedWindow,
    pub sort: FeedSortKey,
    pub page: PageParams,
}

/// Response carrying one evaluated feed page.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeedResponse {
    pub feed: FeedPage,
}

/// Request for standalone feed statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeedStatisticsRequest {
    pub user_id: UserId,
    pub window: FeedWindow,
}

/// Response carrying the aggregate statistics for the window.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeedStatisticsResponse {
    pub statistics: FeedStatistics,
    pub window_days: i64,
}

/// Driving port for the aggregated social feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialFeedQuery: Send + Sync {
    /// Evaluate a feed page for the requesting user.
    async fn feed(&self, request: GetFeedRequest) -> Result<GetFeedResponse, Error>;

    /// Evaluate the aggregate statistics alone, through the statistics cache.
    async fn feed_statistics(
        &self,
        request: GetFeedStatisticsRequest,
    ) -> Result<GetFeedStatisticsResponse, Error>;
}

/// Fixture query implementation answering with an empty feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSocialFeedQuery;

#[async_trait]
impl SocialFeedQuery for FixtureSocialFeedQuery {
    async fn feed(&self, request: GetFeedRequest) -> Result<GetFeedResponse, Error> {
        Ok(GetFeedResponse {
            feed: FeedPage {
                entries: Vec::new(),
                info: PageInfo::compute(0, 0, request.page),
                statistics: FeedStatistics::empty(),
                message: Some("not following anyone yet".to_owned()),
            },
        })
    }

    async fn feed_statistics(
        &self,
        request: GetFeedStatisticsRequest,
    ) -> Result<GetFeedStatisticsResponse, Error> {
        Ok(GetFeedStatisticsResponse {
            statistics: FeedStatistics::empty(),
            window_days: request.window.days(),
        })
    }
}
