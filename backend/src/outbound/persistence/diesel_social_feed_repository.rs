//! PostgreSQL-backed `SocialFeedRepository` implementation using Diesel ORM.
//!
//! Every read is a single statement joining `sleep_records` to `follows` on
//! "record owner is followed by the requester", with owner display names
//! resolved in the same join; there is no per-record lookup. The partial
//! `(user_id, bedtime) WHERE wake_time IS NOT NULL` index backs the
//! completed-records predicate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SocialFeedRepository, SocialFeedRepositoryError};
use crate::domain::{FeedEntry, FeedQuerySpec, FeedSortKey, FeedStatistics, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::FeedRow;
use super::pool::{DbPool, PoolError};
use super::schema::{follows, sleep_records, users};

/// Diesel-backed implementation of the social feed repository port.
#[derive(Clone)]
pub struct DieselSocialFeedRepository {
    pool: DbPool,
}

impl DieselSocialFeedRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SocialFeedRepositoryError {
    map_basic_pool_error(error, |message| {
        SocialFeedRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> SocialFeedRepositoryError {
    map_basic_diesel_error(
        error,
        SocialFeedRepositoryError::query,
        SocialFeedRepositoryError::connection,
        |constraint| SocialFeedRepositoryError::Query {
            message: format!(
                "unexpected unique violation: {}",
                constraint.unwrap_or_else(|| "unknown".to_owned())
            ),
        },
    )
}

fn row_to_entry(row: FeedRow) -> FeedEntry {
    FeedEntry {
        record_id: row.record_id,
        owner_id: UserId::from_uuid(row.owner_id),
        owner_display_name: row.owner_display_name,
        bedtime: row.bedtime,
        wake_time: row.wake_time,
        duration_minutes: row.duration_minutes,
        completed: true,
        created_at: row.created_at,
    }
}

#[async_trait]
impl SocialFeedRepository for DieselSocialFeedRepository {
    async fn list_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<Vec<FeedEntry>, SocialFeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let window_start = spec.window().start_from(now);

        let query = sleep_records::table
            .inner_join(follows::table.on(follows::followed_id.eq(sleep_records::user_id)))
            .inner_join(users::table.on(users::id.eq(sleep_records::user_id)))
            .filter(follows::follower_id.eq(spec.user_id().as_uuid()))
            .filter(sleep_records::wake_time.is_not_null())
            .filter(sleep_records::bedtime.ge(window_start))
            .select((
                sleep_records::id,
                sleep_records::user_id,
                users::display_name,
                sleep_records::bedtime,
                sleep_records::wake_time.assume_not_null(),
                sleep_records::duration_minutes.assume_not_null(),
                sleep_records::created_at,
            ))
            .into_boxed();

        // Sort descending with id as a stable tiebreaker.
        let query = match spec.sort() {
            FeedSortKey::Duration => query.order((
                sleep_records::duration_minutes.desc(),
                sleep_records::id.desc(),
            )),
            FeedSortKey::Bedtime => {
                query.order((sleep_records::bedtime.desc(), sleep_records::id.desc()))
            }
            FeedSortKey::WakeTime => {
                query.order((sleep_records::wake_time.desc(), sleep_records::id.desc()))
            }
            FeedSortKey::CreatedAt => {
                query.order((sleep_records::created_at.desc(), sleep_records::id.desc()))
            }
        };

        let rows: Vec<FeedRow> = query
            .limit(spec.page().limit())
            .offset(spec.page().offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn count_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<i64, SocialFeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let window_start = spec.window().start_from(now);

        sleep_records::table
            .inner_join(follows::table.on(follows::followed_id.eq(sleep_records::user_id)))
            .filter(follows::follower_id.eq(spec.user_id().as_uuid()))
            .filter(sleep_records::wake_time.is_not_null())
            .filter(sleep_records::bedtime.ge(window_start))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn statistics(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<FeedStatistics, SocialFeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let window_start = spec.window().start_from(now);

        // One aggregate pass over the filtered set; the average and hour
        // totals derive from the summed minutes to keep the wire types
        // integral.
        let (record_count, unique_users, total_minutes, min_minutes, max_minutes): (
            i64,
            i64,
            Option<i64>,
            Option<i64>,
            Option<i64>,
        ) = sleep_records::table
            .inner_join(follows::table.on(follows::followed_id.eq(sleep_records::user_id)))
            .filter(follows::follower_id.eq(spec.user_id().as_uuid()))
            .filter(sleep_records::wake_time.is_not_null())
            .filter(sleep_records::bedtime.ge(window_start))
            .select((
                sql::<BigInt>("COUNT(*)"),
                sql::<BigInt>("COUNT(DISTINCT sleep_records.user_id)"),
                sql::<Nullable<BigInt>>("SUM(sleep_records.duration_minutes)::bigint"),
                sql::<Nullable<BigInt>>("MIN(sleep_records.duration_minutes)"),
                sql::<Nullable<BigInt>>("MAX(sleep_records.duration_minutes)"),
            ))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if record_count == 0 {
            return Ok(FeedStatistics::empty());
        }

        let total_minutes = total_minutes.unwrap_or(0);
        Ok(FeedStatistics {
            record_count,
            unique_users,
            average_duration_minutes: total_minutes as f64 / record_count as f64,
            min_duration_minutes: min_minutes.unwrap_or(0),
            max_duration_minutes: max_minutes.unwrap_or(0),
            total_sleep_hours: total_minutes as f64 / 60.0,
        })
    }
}
