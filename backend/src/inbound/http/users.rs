//! User directory HTTP handlers.
//!
//! ```text
//! POST /api/v1/users
//! GET  /api/v1/users
//! GET  /api/v1/users/{id}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::User;
use crate::domain::ports::{CreateUserRequest, ListUsersRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PageInfoBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_page_params, parse_uuid};

/// Request payload for registering a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequestBody {
    #[schema(example = "Night Owl")]
    pub display_name: String,
}

/// One user in a response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub display_name: String,
}

impl From<User> for UserResponseBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            display_name: value.display_name().to_string(),
        }
    }
}

/// A page of users.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageBody {
    pub items: Vec<UserResponseBody>,
    pub info: PageInfoBody,
}

/// Window query parameters for user listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQueryParams {
    /// Page size, 1-100 (default 20).
    pub limit: Option<i64>,
    /// Items skipped before the page starts (default 0).
    pub offset: Option<i64>,
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequestBody,
    responses(
        (status = 200, description = "User registered", body = UserResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequestBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let user = state
        .users
        .create_user(CreateUserRequest {
            display_name: payload.into_inner().display_name,
        })
        .await?;

    Ok(web::Json(user.into()))
}

/// List users ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQueryParams),
    responses(
        (status = 200, description = "A page of users", body = UsersPageBody),
        (status = 400, description = "Invalid pagination", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQueryParams>,
) -> ApiResult<web::Json<UsersPageBody>> {
    let page = parse_page_params(query.limit, query.offset)?;
    let users = state.users.list_users(ListUsersRequest { page }).await?;

    Ok(web::Json(UsersPageBody {
        items: users.items.into_iter().map(Into::into).collect(),
        info: users.info.into(),
    }))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, format = "uuid", description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponseBody),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let user = state
        .users
        .get_user(&crate::domain::UserId::from_uuid(id))
        .await?;

    Ok(web::Json(user.into()))
}
