//! Driving port for sleep session mutations.
//!
//! Clock-in opens a session, clock-out applies the single completing
//! mutation, and delete removes an owned record. Timestamps are optional;
//! services default them to the injected clock's now.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, SleepRecord, UserId};

/// Serialisable sleep record projection for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecordPayload {
    pub id: Uuid,
    pub user_id: UserId,
    pub bedtime: DateTime<Utc>,
    pub wake_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SleepRecord> for SleepRecordPayload {
    fn from(value: SleepRecord) -> Self {
        Self {
            id: value.id(),
            user_id: value.user_id().clone(),
            bedtime: value.bedtime(),
            wake_time: value.wake_time(),
            duration_minutes: value.duration_minutes(),
            completed: !value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Request to open a sleep session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockInRequest {
    pub user_id: UserId,
    /// Bedtime; defaults to now when absent. Never accepted in the future.
    pub bedtime: Option<DateTime<Utc>>,
}

/// Response from opening a sleep session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInResponse {
    pub record: SleepRecordPayload,
}

/// Request to complete the caller's active session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOutRequest {
    pub user_id: UserId,
    /// Wake time; defaults to now when absent.
    pub wake_time: Option<DateTime<Utc>>,
}

/// Response from completing a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutResponse {
    pub record: SleepRecordPayload,
}

/// Request to delete an owned sleep record.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSleepRecordRequest {
    pub user_id: UserId,
    pub record_id: Uuid,
}

/// Driving port for sleep session write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSessionCommand: Send + Sync {
    /// Open a session. Fails with `conflict` when an active session exists
    /// or the bedtime overlaps an earlier interval, and with
    /// `invalid_request` when the bedtime lies in the future.
    async fn clock_in(&self, request: ClockInRequest) -> Result<ClockInResponse, Error>;

    /// Complete the active session, deriving its duration.
    async fn clock_out(&self, request: ClockOutRequest) -> Result<ClockOutResponse, Error>;

    /// Delete an owned record. Fails with `not_found` when no such record
    /// belongs to the caller.
    async fn delete_record(&self, request: DeleteSleepRecordRequest) -> Result<(), Error>;
}

/// Fixture command implementation for tests that do not need persistence.
///
/// Clock-in answers with a fresh active record; clock-out answers with an
/// eight-hour completed one.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepSessionCommand;

#[async_trait]
impl SleepSessionCommand for FixtureSleepSessionCommand {
    async fn clock_in(&self, request: ClockInRequest) -> Result<ClockInResponse, Error> {
        let bedtime = request.bedtime.unwrap_or_else(Utc::now);
        Ok(ClockInResponse {
            record: SleepRecordPayload {
                id: Uuid::new_v4(),
                user_id: request.user_id,
                bedtime,
                wake_time: None,
                duration_minutes: None,
                completed: false,
                created_at: bedtime,
            },
        })
    }

    async fn clock_out(&self, request: ClockOutRequest) -> Result<ClockOutResponse, Error> {
        let wake_time = request.wake_time.unwrap_or_else(Utc::now);
        let bedtime = wake_time - chrono::Duration::minutes(480);
        Ok(ClockOutResponse {
            record: SleepRecordPayload {
                id: Uuid::new_v4(),
                user_id: request.user_id,
                bedtime,
                wake_time: Some(wake_time),
                duration_minutes: Some(480),
                completed: true,
                created_at: bedtime,
            },
        })
    }

    async fn delete_record(&self, _request: DeleteSleepRecordRequest) -> Result<(), Error> {
        Ok(())
    }
}
