//! Operator cache administration HTTP handlers.
//!
//! ```text
//! GET  /api/v1/admin/cache/stats
//! POST /api/v1/admin/cache/clear
//! POST /api/v1/admin/cache/warm
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;
use crate::domain::ports::{CacheStoreStats, ClearCacheRequest, WarmCacheRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Cache backend statistics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsBody {
    pub keys: u64,
    pub hits: u64,
    pub misses: u64,
    pub memory_used_bytes: Option<u64>,
}

impl From<CacheStoreStats> for CacheStatsBody {
    fn from(value: CacheStoreStats) -> Self {
        Self {
            keys: value.keys,
            hits: value.hits,
            misses: value.misses,
            memory_used_bytes: value.memory_used_bytes,
        }
    }
}

/// Request payload for a pattern clear.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheRequestBody {
    /// Wildcard glob, e.g. `social_stats:user:*`.
    #[schema(example = "social_stats:user:*")]
    pub pattern: String,
}

/// Response payload for a pattern clear.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponseBody {
    pub deleted: u64,
}

/// Request payload for a cache warm.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarmCacheRequestBody {
    /// When omitted, every known user is warmed.
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
}

/// Response payload for a cache warm.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarmCacheResponseBody {
    pub users_warmed: u64,
}

/// Cache backend statistics for operators.
#[utoipa::path(
    get,
    path = "/api/v1/admin/cache/stats",
    responses(
        (status = 200, description = "Backend statistics", body = CacheStatsBody),
        (status = 503, description = "Cache backend unreachable", body = ErrorSchema)
    ),
    tags = ["cache-admin"],
    operation_id = "cacheStats"
)]
#[get("/admin/cache/stats")]
pub async fn cache_stats(state: web::Data<HttpState>) -> ApiResult<web::Json<CacheStatsBody>> {
    let stats = state.cache_admin.stats().await?;
    Ok(web::Json(stats.into()))
}

/// Delete every cached key matching a wildcard pattern.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cache/clear",
    request_body = ClearCacheRequestBody,
    responses(
        (status = 200, description = "Keys deleted", body = ClearCacheResponseBody),
        (status = 400, description = "Empty pattern", body = ErrorSchema),
        (status = 503, description = "Cache backend unreachable", body = ErrorSchema)
    ),
    tags = ["cache-admin"],
    operation_id = "cacheClear"
)]
#[post("/admin/cache/clear")]
pub async fn cache_clear(
    state: web::Data<HttpState>,
    payload: web::Json<ClearCacheRequestBody>,
) -> ApiResult<web::Json<ClearCacheResponseBody>> {
    let response = state
        .cache_admin
        .clear(ClearCacheRequest {
            pattern: payload.into_inner().pattern,
        })
        .await?;

    Ok(web::Json(ClearCacheResponseBody {
        deleted: response.deleted,
    }))
}

/// Precompute social statistics for one or all users.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cache/warm",
    request_body = WarmCacheRequestBody,
    responses(
        (status = 200, description = "Users warmed", body = WarmCacheResponseBody),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 503, description = "Cache backend unreachable", body = ErrorSchema)
    ),
    tags = ["cache-admin"],
    operation_id = "cacheWarm"
)]
#[post("/admin/cache/warm")]
pub async fn cache_warm(
    state: web::Data<HttpState>,
    payload: web::Json<WarmCacheRequestBody>,
) -> ApiResult<web::Json<WarmCacheResponseBody>> {
    let user_id = payload
        .into_inner()
        .user_id
        .map(|raw| parse_uuid(raw, FieldName::new("userId")).map(UserId::from_uuid))
        .transpose()?;

    let response = state.cache_admin.warm(WarmCacheRequest { user_id }).await?;

    Ok(web::Json(WarmCacheResponseBody {
        users_warmed: response.users_warmed,
    }))
}
