//! Driving port for user creation and lookups.

use async_trait::async_trait;
use pagination::{Page, PageParams};

use crate::domain::{Error, User, UserId};

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub display_name: String,
}

/// Request to list users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    pub page: PageParams,
}

/// Driving port for the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a user with a validated display name.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Fetch one user. Fails with `not_found` when absent.
    async fn get_user(&self, user_id: &UserId) -> Result<User, Error>;

    /// List users ordered by display name.
    async fn list_users(&self, request: ListUsersRequest) -> Result<Page<User>, Error>;
}

/// Fixture directory answering with a single well-known user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

const FIXTURE_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        User::try_from_strings(FIXTURE_USER_ID, request.display_name)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, Error> {
        if user_id.to_string() == FIXTURE_USER_ID {
            Ok(User::from_strings(FIXTURE_USER_ID, "Ada Lovelace"))
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    async fn list_users(&self, request: ListUsersRequest) -> Result<Page<User>, Error> {
        Ok(Page::new(
            vec![User::from_strings(FIXTURE_USER_ID, "Ada Lovelace")],
            1,
            request.page,
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_knows_exactly_one_user() {
        let directory = FixtureUserDirectory;
        let known = UserId::new(FIXTURE_USER_ID).expect("valid id");

        let user = directory.get_user(&known).await.expect("fixture user exists");
        assert_eq!(user.id(), &known);

        let err = directory
            .get_user(&UserId::random())
            .await
            .expect_err("unknown user missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_validates_display_name() {
        let directory = FixtureUserDirectory;
        let err = directory
            .create_user(CreateUserRequest {
                display_name: String::new(),
            })
            .await
            .expect_err("blank name rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
