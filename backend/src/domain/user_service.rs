//! User directory domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CreateUserRequest, ListUsersRequest, UserDirectory, UserRepository, UserRepositoryError,
};
use crate::domain::{DisplayName, Error, User, UserId};
use pagination::Page;

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// User directory service implementing the driving port.
#[derive(Clone)]
pub struct UserService<U> {
    user_repo: Arc<U>,
}

impl<U> UserService<U> {
    /// Create a new service with the user repository.
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UserDirectory for UserService<U>
where
    U: UserRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let display_name = DisplayName::new(request.display_name).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "displayName",
                "code": "invalid_display_name",
            }))
        })?;

        let user = User::new(UserId::random(), display_name);
        self.user_repo
            .insert(&user)
            .await
            .map_err(map_repository_error)?;

        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn list_users(&self, request: ListUsersRequest) -> Result<Page<User>, Error> {
        let users = self
            .user_repo
            .list(request.page)
            .await
            .map_err(map_repository_error)?;
        let total = self
            .user_repo
            .count()
            .await
            .map_err(map_repository_error)?;

        Ok(Page::new(users, total, request.page))
    }
}

#[cfg(test)]
mod tests {
    //! Directory behaviour over a mocked repository.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use pagination::PageParams;

    #[rstest]
    #[tokio::test]
    async fn create_user_persists_validated_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert().returning(|user| {
            assert_eq!(user.display_name().as_ref(), "Night Owl");
            Ok(())
        });
        let service = UserService::new(Arc::new(repo));

        let user = service
            .create_user(CreateUserRequest {
                display_name: "Night Owl".to_owned(),
            })
            .await
            .expect("create succeeds");

        assert_eq!(user.display_name().as_ref(), "Night Owl");
    }

    #[rstest]
    #[tokio::test]
    async fn create_user_rejects_blank_name() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let err = service
            .create_user(CreateUserRequest {
                display_name: "   ".to_owned(),
            })
            .await
            .expect_err("blank name rejected");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(repo));

        let err = service
            .get_user(&UserId::random())
            .await
            .expect_err("missing user");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_users_wraps_page_envelope() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|_| Ok(vec![User::from_strings(
                "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "Ada Lovelace",
            )]));
        repo.expect_count().returning(|| Ok(21));
        let service = UserService::new(Arc::new(repo));

        let page = service
            .list_users(ListUsersRequest {
                page: PageParams::default(),
            })
            .await
            .expect("list succeeds");

        assert_eq!(page.info.total, 21);
        assert_eq!(page.items.len(), 1);
        assert!(page.info.has_more);
    }
}
