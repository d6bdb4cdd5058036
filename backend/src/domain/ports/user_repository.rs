//! Port for user persistence and lookups.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for writing and reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Whether a user exists.
    async fn exists(&self, user_id: &UserId) -> Result<bool, UserRepositoryError>;

    /// List users ordered by display name, windowed by `page`.
    async fn list(&self, page: PageParams) -> Result<Vec<User>, UserRepositoryError>;

    /// Total number of users.
    async fn count(&self) -> Result<i64, UserRepositoryError>;

    /// List every user id. Used by the cache warm path.
    async fn list_ids(&self) -> Result<Vec<UserId>, UserRepositoryError>;
}
