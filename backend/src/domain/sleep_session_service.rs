//! Sleep session domain services.
//!
//! These services implement the sleep session driving ports: clock-in opens
//! a session after the future-bedtime, active-session, and overlap checks;
//! clock-out applies the single completing mutation; deletion is owner
//! scoped. "Now" comes from an injected clock so the time-dependent rules
//! are testable.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    ClockInRequest, ClockInResponse, ClockOutRequest, ClockOutResponse, DeleteSleepRecordRequest,
    ListSleepRecordsRequest, ListSleepRecordsResponse, SleepRecordRepository,
    SleepRecordRepositoryError, SleepSessionCommand, SleepSessionQuery,
};
use crate::domain::{Error, SleepRecord, SleepRecordDraft, SleepValidationError};
use pagination::Page;

fn map_repository_error(error: SleepRecordRepositoryError) -> Error {
    match error {
        SleepRecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sleep record repository unavailable: {message}"))
        }
        SleepRecordRepositoryError::Query { message } => {
            Error::internal(format!("sleep record repository error: {message}"))
        }
        SleepRecordRepositoryError::ActiveSessionExists => {
            Error::conflict("an active sleep session already exists").with_details(json!({
                "code": "active_session_exists",
            }))
        }
    }
}

fn map_validation_error(error: SleepValidationError) -> Error {
    match &error {
        SleepValidationError::WakeNotAfterBedtime => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "wakeTime", "code": "wake_before_bedtime" })),
        SleepValidationError::DurationOutOfBounds { minutes } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "field": "wakeTime",
                "code": "duration_out_of_bounds",
                "minutes": minutes,
            }))
        }
        _ => Error::invalid_request(error.to_string()),
    }
}

/// Sleep session service implementing the command and query driving ports.
#[derive(Clone)]
pub struct SleepSessionService<R> {
    sleep_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SleepSessionService<R> {
    /// Create a new service with the sleep record repository and a clock.
    pub fn new(sleep_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { sleep_repo, clock }
    }
}

impl<R> SleepSessionService<R>
where
    R: SleepRecordRepository,
{
    async fn ensure_no_overlap(
        &self,
        request: &ClockInRequest,
        bedtime: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), Error> {
        if self
            .sleep_repo
            .find_active_for_user(&request.user_id)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(
                Error::conflict("an active sleep session already exists").with_details(json!({
                    "code": "active_session_exists",
                })),
            );
        }

        let previous = self
            .sleep_repo
            .find_latest_starting_before(&request.user_id, bedtime)
            .await
            .map_err(map_repository_error)?;

        if let Some(previous) = previous {
            if previous.conflicts_with(bedtime) {
                return Err(
                    Error::conflict("bedtime overlaps an existing sleep session").with_details(
                        json!({
                            "code": "overlapping_session",
                            "conflictingRecordId": previous.id().to_string(),
                        }),
                    ),
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<R> SleepSessionCommand for SleepSessionService<R>
where
    R: SleepRecordRepository,
{
    async fn clock_in(&self, request: ClockInRequest) -> Result<ClockInResponse, Error> {
        let now = self.clock.utc();
        let bedtime = request.bedtime.unwrap_or(now);

        if bedtime > now {
            return Err(
                Error::invalid_request("bedtime cannot be in the future").with_details(json!({
                    "field": "bedtime",
                    "code": "future_bedtime",
                })),
            );
        }

        self.ensure_no_overlap(&request, bedtime).await?;

        let record = SleepRecord::new(SleepRecordDraft {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            bedtime,
            wake_time: None,
            created_at: now,
        })
        .map_err(map_validation_error)?;

        // The store's partial unique index closes the race two concurrent
        // clock-ins can win against the checks above.
        self.sleep_repo
            .insert(&record)
            .await
            .map_err(map_repository_error)?;

        Ok(ClockInResponse {
            record: record.into(),
        })
    }

    async fn clock_out(&self, request: ClockOutRequest) -> Result<ClockOutResponse, Error> {
        let wake_time = request.wake_time.unwrap_or_else(|| self.clock.utc());

        let active = self
            .sleep_repo
            .find_active_for_user(&request.user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("no active sleep session to clock out"))?;

        let completed = active.clock_out(wake_time).map_err(map_validation_error)?;

        self.sleep_repo
            .complete(&completed)
            .await
            .map_err(map_repository_error)?;

        Ok(ClockOutResponse {
            record: completed.into(),
        })
    }

    async fn delete_record(&self, request: DeleteSleepRecordRequest) -> Result<(), Error> {
        let removed = self
            .sleep_repo
            .delete(&request.record_id, &request.user_id)
            .await
            .map_err(map_repository_error)?;

        if removed {
            return Ok(());
        }

        let found = self
            .sleep_repo
            .find_by_id(&request.record_id)
            .await
            .map_err(map_repository_error)?;

        match found {
            Some(_) => Err(Error::forbidden(
                "sleep records can only be deleted by their owner",
            )),
            None => Err(Error::not_found(format!(
                "sleep record {} not found",
                request.record_id
            ))),
        }
    }
}

#[async_trait]
impl<R> SleepSessionQuery for SleepSessionService<R>
where
    R: SleepRecordRepository,
{
    async fn list_records(
        &self,
        request: ListSleepRecordsRequest,
    ) -> Result<ListSleepRecordsResponse, Error> {
        let records = self
            .sleep_repo
            .list_for_user(&request.user_id, request.page)
            .await
            .map_err(map_repository_error)?;
        let total = self
            .sleep_repo
            .count_for_user(&request.user_id)
            .await
            .map_err(map_repository_error)?;

        Ok(ListSleepRecordsResponse {
            records: Page::new(
                records.into_iter().map(Into::into).collect(),
                total,
                request.page,
            ),
        })
    }
}

#[cfg(test)]
#[path = "sleep_session_service_tests.rs"]
mod tests;
