//! PostgreSQL-backed `SleepRecordRepository` implementation using Diesel ORM.
//!
//! The clock-in insert relies on the `sleep_records_one_active_per_user`
//! partial unique index to close the race between two concurrent clock-ins
//! that both passed overlap validation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageParams;
use uuid::Uuid;

use crate::domain::ports::{SleepRecordRepository, SleepRecordRepositoryError};
use crate::domain::{SleepRecord, SleepRecordDraft, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSleepRecordRow, SleepRecordCompletion, SleepRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::sleep_records;

/// Name of the partial unique index enforcing one active session per user.
const ONE_ACTIVE_INDEX: &str = "sleep_records_one_active_per_user";

/// Diesel-backed implementation of the sleep record repository port.
#[derive(Clone)]
pub struct DieselSleepRecordRepository {
    pool: DbPool,
}

impl DieselSleepRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SleepRecordRepositoryError {
    map_basic_pool_error(error, |message| {
        SleepRecordRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> SleepRecordRepositoryError {
    map_basic_diesel_error(
        error,
        SleepRecordRepositoryError::query,
        SleepRecordRepositoryError::connection,
        |constraint| {
            if constraint.as_deref() == Some(ONE_ACTIVE_INDEX) {
                SleepRecordRepositoryError::active_session_exists()
            } else {
                SleepRecordRepositoryError::Query {
                    message: format!(
                        "unique constraint violated: {}",
                        constraint.unwrap_or_else(|| "unknown".to_owned())
                    ),
                }
            }
        },
    )
}

/// Convert a database row into a validated domain sleep record.
fn row_to_sleep_record(row: SleepRecordRow) -> Result<SleepRecord, SleepRecordRepositoryError> {
    let SleepRecordRow {
        id,
        user_id,
        bedtime,
        wake_time,
        duration_minutes: _,
        created_at,
        updated_at: _,
    } = row;

    SleepRecord::new(SleepRecordDraft {
        id,
        user_id: UserId::from_uuid(user_id),
        bedtime,
        wake_time,
        created_at,
    })
    .map_err(|err| SleepRecordRepositoryError::query(err.to_string()))
}

#[async_trait]
impl SleepRecordRepository for DieselSleepRecordRepository {
    async fn insert(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSleepRecordRow {
            id: record.id(),
            user_id: *record.user_id().as_uuid(),
            bedtime: record.bedtime(),
            wake_time: record.wake_time(),
            duration_minutes: record.duration_minutes(),
            created_at: record.created_at(),
            updated_at: record.created_at(),
        };

        diesel::insert_into(sleep_records::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn complete(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError> {
        let wake_time = record.wake_time().ok_or_else(|| {
            SleepRecordRepositoryError::query("complete called on an active record")
        })?;
        let duration_minutes = record.duration_minutes().ok_or_else(|| {
            SleepRecordRepositoryError::query("completed record is missing its duration")
        })?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(sleep_records::table.filter(sleep_records::id.eq(record.id())))
            .set(&SleepRecordCompletion {
                wake_time,
                duration_minutes,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = sleep_records::table
            .filter(sleep_records::id.eq(record_id))
            .select(SleepRecordRow::as_select())
            .first::<SleepRecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_sleep_record).transpose()
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Served by the active-session partial index.
        let row = sleep_records::table
            .filter(
                sleep_records::user_id
                    .eq(user_id.as_uuid())
                    .and(sleep_records::wake_time.is_null()),
            )
            .select(SleepRecordRow::as_select())
            .first::<SleepRecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_sleep_record).transpose()
    }

    async fn find_latest_starting_before(
        &self,
        user_id: &UserId,
        bedtime: DateTime<Utc>,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Served by the (user_id, bedtime) composite index.
        let row = sleep_records::table
            .filter(
                sleep_records::user_id
                    .eq(user_id.as_uuid())
                    .and(sleep_records::bedtime.le(bedtime)),
            )
            .order(sleep_records::bedtime.desc())
            .select(SleepRecordRow::as_select())
            .first::<SleepRecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_sleep_record).transpose()
    }

    async fn delete(
        &self,
        record_id: &Uuid,
        user_id: &UserId,
    ) -> Result<bool, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            sleep_records::table.filter(
                sleep_records::id
                    .eq(record_id)
                    .and(sleep_records::user_id.eq(user_id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<SleepRecord>, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SleepRecordRow> = sleep_records::table
            .filter(sleep_records::user_id.eq(user_id.as_uuid()))
            .order((sleep_records::bedtime.desc(), sleep_records::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(SleepRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_sleep_record).collect()
    }

    async fn count_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<i64, SleepRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        sleep_records::table
            .filter(sleep_records::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Duration;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> SleepRecordRow {
        let bedtime = Utc::now() - Duration::hours(9);
        SleepRecordRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            bedtime,
            wake_time: Some(bedtime + Duration::minutes(480)),
            duration_minutes: Some(480),
            created_at: bedtime,
            updated_at: bedtime,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::acquire("connection refused"));

        assert!(matches!(
            repo_err,
            SleepRecordRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn active_index_violation_maps_to_conflict() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(ONE_ACTIVE_INDEX)),
        );

        let repo_err = map_diesel_error(diesel_err);
        assert_eq!(repo_err, SleepRecordRepositoryError::ActiveSessionExists);
    }

    #[rstest]
    fn row_conversion_derives_duration(valid_row: SleepRecordRow) {
        let record = row_to_sleep_record(valid_row).expect("valid row converts");
        assert_eq!(record.duration_minutes(), Some(480));
    }

    #[rstest]
    fn row_conversion_rejects_inverted_timestamps(mut valid_row: SleepRecordRow) {
        valid_row.wake_time = Some(valid_row.bedtime - Duration::seconds(1));

        let error = row_to_sleep_record(valid_row).expect_err("invalid timestamps should fail");
        assert!(matches!(error, SleepRecordRepositoryError::Query { .. }));
    }

    /// Minimal `DatabaseErrorInformation` carrying a constraint name.
    struct ConstraintInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("sleep_records")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }
}
