//! PostgreSQL persistence adapters (Diesel + diesel-async).

mod diesel_error_mapping;
mod diesel_follow_repository;
mod diesel_sleep_record_repository;
mod diesel_social_feed_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_sleep_record_repository::DieselSleepRecordRepository;
pub use diesel_social_feed_repository::DieselSocialFeedRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// SQL migrations embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending migrations against `database_url`.
///
/// Uses a short-lived synchronous connection; called once at start-up before
/// the async pool begins serving requests.
pub fn run_pending_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = diesel::PgConnection::establish(database_url)
        .map_err(|err| format!("failed to connect for migrations: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| format!("failed to run migrations: {err}"))
}
