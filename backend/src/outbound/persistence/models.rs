//! Row structs mapping Diesel query results to and from the schema.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{follows, sleep_records, users};

/// Read model for one `users` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for a new user.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read model for one `sleep_records` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sleep_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SleepRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bedtime: DateTime<Utc>,
    pub wake_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for a clock-in.
#[derive(Debug, Insertable)]
#[diesel(table_name = sleep_records)]
pub struct NewSleepRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bedtime: DateTime<Utc>,
    pub wake_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applying the single clock-out mutation.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = sleep_records)]
pub struct SleepRecordCompletion {
    pub wake_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub updated_at: DateTime<Utc>,
}

/// Read model for one `follows` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = follows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FollowRow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert model for a new follow edge.
#[derive(Debug, Insertable)]
#[diesel(table_name = follows)]
pub struct NewFollowRow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Projection of one feed entry: a completed sleep record joined to its
/// owner's display name.
#[derive(Debug, Clone, Queryable)]
pub struct FeedRow {
    pub record_id: Uuid,
    pub owner_id: Uuid,
    pub owner_display_name: String,
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

/// Projection of one following/followers list row.
#[derive(Debug, Clone, Queryable)]
pub struct FollowListRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub followed_at: DateTime<Utc>,
}
