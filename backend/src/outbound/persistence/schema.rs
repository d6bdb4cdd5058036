//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// Stores registered users with their display names and audit
    /// timestamps. The `id` column is the primary key (UUID v4).
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name (max 100 characters).
        display_name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sleep session table.
    ///
    /// One row per clock-in. `wake_time` is null while the session is
    /// active; `duration_minutes` is derived when the session completes.
    /// A partial unique index on `(user_id) WHERE wake_time IS NULL`
    /// serialises concurrent clock-ins.
    sleep_records (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (FK to `users`, cascade on delete).
        user_id -> Uuid,
        /// Session start. Never in the future at insert time.
        bedtime -> Timestamptz,
        /// Session end; null while the session is active.
        wake_time -> Nullable<Timestamptz>,
        /// Derived length in minutes; null until completed.
        duration_minutes -> Nullable<Int8>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    ///
    /// Unique on `(follower_id, followed_id)`; both columns FK to `users`
    /// with cascade on delete.
    follows (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The user doing the following.
        follower_id -> Uuid,
        /// The user being followed.
        followed_id -> Uuid,
        /// Edge creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(sleep_records -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, sleep_records, follows);
