//! Shared translation from Diesel and pool failures to port errors.
//!
//! Repositories hand in their own error constructors, so each port keeps its
//! error vocabulary while the classification logic lives in one place.
//! Unique-constraint violations carry repository-specific semantics (a
//! duplicate follow edge, a second active session) and flow through a
//! dedicated constructor together with the violated constraint's name.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Translate a pool failure into the repository's connection error.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Translate a Diesel failure using the repository's constructors.
pub fn map_basic_diesel_error<E, Q, C, V>(
    error: DieselError,
    query: Q,
    connection: C,
    unique_violation: V,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    V: FnOnce(Option<String>) -> E,
{
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        );
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            unique_violation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        _ => query("database error"),
    }
}
