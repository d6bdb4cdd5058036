//! Port for sleep record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageParams;
use uuid::Uuid;

use crate::domain::{SleepRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by sleep record repository adapters.
    pub enum SleepRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sleep record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sleep record repository query failed: {message}",
        /// The one-active-session-per-user constraint rejected an insert.
        ///
        /// Raised by the store's partial unique index when two clock-ins
        /// race past validation; both callers observe the same conflict.
        ActiveSessionExists =>
            "an active sleep session already exists for this user",
    }
}

/// Port for writing sleep records and reading per-user sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepRecordRepository: Send + Sync {
    /// Persist a new record (clock-in).
    async fn insert(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError>;

    /// Apply the single clock-out mutation to an existing record.
    async fn complete(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError>;

    /// Find a record by id.
    async fn find_by_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError>;

    /// Find the user's active record, if one exists.
    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError>;

    /// Find the user's latest record starting at or before `bedtime`.
    ///
    /// Backed by the `(user_id, bedtime)` index; the caller applies the
    /// overlap rule to the returned record.
    async fn find_latest_starting_before(
        &self,
        user_id: &UserId,
        bedtime: DateTime<Utc>,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError>;

    /// Delete a record owned by `user_id`. Returns whether a row was removed.
    async fn delete(
        &self,
        record_id: &Uuid,
        user_id: &UserId,
    ) -> Result<bool, SleepRecordRepositoryError>;

    /// List the user's records, newest bedtime first, windowed by `page`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<SleepRecord>, SleepRecordRepositoryError>;

    /// Total number of records for the user.
    async fn count_for_user(&self, user_id: &UserId)
    -> Result<i64, SleepRecordRepositoryError>;
}
