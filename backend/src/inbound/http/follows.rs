//! Follow graph HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users/{id}/follow
//! DELETE /api/v1/users/{id}/follow
//! GET    /api/v1/users/{id}/following
//! GET    /api/v1/users/{id}/followers
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::UserId;
use crate::domain::ports::{
    FollowEdgePayload, FollowListEntry, FollowRequest, ListFollowsRequest, UnfollowRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::{ErrorSchema, PageInfoBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_page_params, parse_uuid};

/// One follow edge in a response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdgeBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub follower_id: String,
    #[schema(format = "uuid")]
    pub followed_id: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<FollowEdgePayload> for FollowEdgeBody {
    fn from(value: FollowEdgePayload) -> Self {
        Self {
            id: value.id.to_string(),
            follower_id: value.follower_id.to_string(),
            followed_id: value.followed_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One related user in a following/followers listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowListEntryBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub display_name: String,
    #[schema(format = "date-time")]
    pub followed_at: String,
}

impl From<FollowListEntry> for FollowListEntryBody {
    fn from(value: FollowListEntry) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            display_name: value.display_name,
            followed_at: value.followed_at.to_rfc3339(),
        }
    }
}

/// A page of related users plus the cached relation count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowListBody {
    pub items: Vec<FollowListEntryBody>,
    pub info: PageInfoBody,
    /// Read-through cached total for the relation.
    pub count: i64,
}

/// Window query parameters for relation listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFollowsQueryParams {
    /// Page size, 1-100 (default 20).
    pub limit: Option<i64>,
    /// Items skipped before the page starts (default 0).
    pub offset: Option<i64>,
}

fn parse_user_path(raw: String) -> Result<UserId, crate::domain::Error> {
    parse_uuid(raw, FieldName::new("id")).map(UserId::from_uuid)
}

/// Follow the user in the path.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, format = "uuid", description = "User to follow")),
    responses(
        (status = 200, description = "Edge created", body = FollowEdgeBody),
        (status = 400, description = "Self-follow or invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Already following", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "followUser"
)]
#[post("/users/{id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowEdgeBody>> {
    let target = parse_user_path(path.into_inner())?;

    let response = state
        .follow_commands
        .follow(FollowRequest {
            follower: identity.into_user_id(),
            target,
        })
        .await?;

    Ok(web::Json(response.edge.into()))
}

/// Unfollow the user in the path.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, format = "uuid", description = "User to unfollow")),
    responses(
        (status = 204, description = "Edge removed"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No such relationship", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "unfollowUser"
)]
#[delete("/users/{id}/follow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_path(path.into_inner())?;

    state
        .follow_commands
        .unfollow(UnfollowRequest {
            follower: identity.into_user_id(),
            target,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Users the path user follows, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/following",
    params(
        ("id" = String, Path, format = "uuid", description = "User id"),
        ListFollowsQueryParams
    ),
    responses(
        (status = 200, description = "A page of followed users", body = FollowListBody),
        (status = 400, description = "Invalid parameters", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "listFollowing"
)]
#[get("/users/{id}/following")]
pub async fn list_following(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ListFollowsQueryParams>,
) -> ApiResult<web::Json<FollowListBody>> {
    let user_id = parse_user_path(path.into_inner())?;
    let page = parse_page_params(query.limit, query.offset)?;

    let response = state
        .follow_queries
        .list_following(ListFollowsRequest { user_id, page })
        .await?;

    Ok(web::Json(FollowListBody {
        items: response.users.items.into_iter().map(Into::into).collect(),
        info: response.users.info.into(),
        count: response.count,
    }))
}

/// Users following the path user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/followers",
    params(
        ("id" = String, Path, format = "uuid", description = "User id"),
        ListFollowsQueryParams
    ),
    responses(
        (status = 200, description = "A page of followers", body = FollowListBody),
        (status = 400, description = "Invalid parameters", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "listFollowers"
)]
#[get("/users/{id}/followers")]
pub async fn list_followers(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ListFollowsQueryParams>,
) -> ApiResult<web::Json<FollowListBody>> {
    let user_id = parse_user_path(path.into_inner())?;
    let page = parse_page_params(query.limit, query.offset)?;

    let response = state
        .follow_queries
        .list_followers(ListFollowsRequest { user_id, page })
        .await?;

    Ok(web::Json(FollowListBody {
        items: response.users.items.into_iter().map(Into::into).collect(),
        info: response.users.info.into(),
        count: response.count,
    }))
}
