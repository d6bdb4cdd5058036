//! Driving port for sleep session reads.

use async_trait::async_trait;
use pagination::{Page, PageParams};

use crate::domain::{Error, UserId};

use super::sleep_session_command::SleepRecordPayload;

/// Request for a user's own sleep records.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSleepRecordsRequest {
    pub user_id: UserId,
    pub page: PageParams,
}

/// A page of the caller's sleep records, newest bedtime first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSleepRecordsResponse {
    pub records: Page<SleepRecordPayload>,
}

/// Driving port for sleep session read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSessionQuery: Send + Sync {
    /// List the caller's records, newest bedtime first.
    async fn list_records(
        &self,
        request: ListSleepRecordsRequest,
    ) -> Result<ListSleepRecordsResponse, Error>;
}

/// Fixture query implementation answering with an empty page.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepSessionQuery;

#[async_trait]
impl SleepSessionQuery for FixtureSleepSessionQuery {
    async fn list_records(
        &self,
        request: ListSleepRecordsRequest,
    ) -> Result<ListSleepRecordsResponse, Error> {
        Ok(ListSleepRecordsResponse {
            records: Page::empty(request.page),
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
    async fn fixture_list_is_empty() {
        let query = FixtureSleepSessionQuery;
        let response = query
            .list_records(ListSleepRecordsRequest {
                user_id: UserId::random(),
                page: PageParams::default(),
            })
            .await
            .expect("fixture list succeeds");

        assert!(response.records.items.is_empty());
        assert_eq!(response.records.info.total, 0);
    }
}
