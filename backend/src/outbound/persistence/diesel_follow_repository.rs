//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.
//!
//! List queries resolve display names by joining `users` in the same
//! statement; the `(follower_id, created_at)` and `(followed_id,
//! created_at)` composite indexes keep them ordered scans rather than sorts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageParams;
use uuid::Uuid;

use crate::domain::ports::{FollowListEntry, FollowRepository, FollowRepositoryError};
use crate::domain::{FollowEdge, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{FollowListRow, NewFollowRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, users};

/// Diesel-backed implementation of the follow repository port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    map_basic_pool_error(error, |message| FollowRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    map_basic_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
        // The only unique constraint on `follows` is the edge pair.
        |_constraint| FollowRepositoryError::duplicate_edge(),
    )
}

fn row_to_entry(row: FollowListRow) -> FollowListEntry {
    FollowListEntry {
        user_id: UserId::from_uuid(row.user_id),
        display_name: row.display_name,
        followed_at: row.followed_at,
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewFollowRow {
            id: edge.id(),
            follower_id: *edge.follower_id().as_uuid(),
            followed_id: *edge.followed_id().as_uuid(),
            created_at: edge.created_at(),
        };

        diesel::insert_into(follows::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            follows::table.filter(
                follows::follower_id
                    .eq(follower.as_uuid())
                    .and(follows::followed_id.eq(followed.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn exists(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found: Option<Uuid> = follows::table
            .filter(
                follows::follower_id
                    .eq(follower.as_uuid())
                    .and(follows::followed_id.eq(followed.as_uuid())),
            )
            .select(follows::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(found.is_some())
    }

    async fn following_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        follows::table
            .filter(follows::follower_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn followers_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        follows::table
            .filter(follows::followed_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_following(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FollowListRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::followed_id)))
            .filter(follows::follower_id.eq(user_id.as_uuid()))
            .order((follows::created_at.desc(), follows::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select((users::id, users::display_name, follows::created_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn list_followers(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FollowListRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::follower_id)))
            .filter(follows::followed_id.eq(user_id.as_uuid()))
            .order((follows::created_at.desc(), follows::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select((users::id, users::display_name, follows::created_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }
}
