//! Port for the social feed read model.
//!
//! Adapters evaluate a [`FeedQuerySpec`] as one relational query joining
//! sleep records to follow edges, resolving owner display names in the same
//! statement; no per-record lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FeedEntry, FeedQuerySpec, FeedStatistics};

use super::define_port_error;

define_port_error! {
    /// Errors raised by social feed repository adapters.
    pub enum SocialFeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "social feed repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "social feed repository query failed: {message}",
    }
}

/// Port for reading the aggregated feed of followed users' completed
/// sessions. `now` anchors the lookback window so callers control the clock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialFeedRepository: Send + Sync {
    /// The requested page of feed entries, sorted descending by the spec's
    /// sort key.
    async fn list_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<Vec<FeedEntry>, SocialFeedRepositoryError>;

    /// Total entries matching the spec's predicate, ignoring pagination.
    async fn count_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<i64, SocialFeedRepositoryError>;

    /// Aggregate statistics over the full filtered set, not just one page.
    async fn statistics(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<FeedStatistics, SocialFeedRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn query_error_formats_message() {
        let err = SocialFeedRepositoryError::query("relation missing");
        assert!(err.to_string().contains("relation missing"));
    }
}
