//! Social feed HTTP handlers.
//!
//! ```text
//! GET /api/v1/feed
//! GET /api/v1/feed/statistics
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{GetFeedRequest, GetFeedStatisticsRequest};
use crate::domain::{FeedEntry, FeedSortKey, FeedStatistics};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::{ErrorSchema, PageInfoBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_feed_window, parse_page_params};

/// One completed sleep record from a followed user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntryBody {
    #[schema(format = "uuid")]
    pub record_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub user_name: String,
    #[schema(format = "date-time")]
    pub bedtime: String,
    #[schema(format = "date-time")]
    pub wake_time: String,
    pub duration_minutes: i64,
    pub completed: bool,
}

impl From<FeedEntry> for FeedEntryBody {
    fn from(value: FeedEntry) -> Self {
        Self {
            record_id: value.record_id.to_string(),
            user_id: value.owner_id.to_string(),
            user_name: value.owner_display_name,
            bedtime: value.bedtime.to_rfc3339(),
            wake_time: value.wake_time.to_rfc3339(),
            duration_minutes: value.duration_minutes,
            completed: value.completed,
        }
    }
}

/// Aggregate statistics over the full filtered feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatisticsBody {
    pub record_count: i64,
    pub unique_users: i64,
    pub average_duration_minutes: f64,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub total_sleep_hours: f64,
}

impl From<FeedStatistics> for FeedStatisticsBody {
    fn from(value: FeedStatistics) -> Self {
        Self {
            record_count: value.record_count,
            unique_users: value.unique_users,
            average_duration_minutes: value.average_duration_minutes,
            min_duration_minutes: value.min_duration_minutes,
            max_duration_minutes: value.max_duration_minutes,
            total_sleep_hours: value.total_sleep_hours,
        }
    }
}

/// A feed page with pagination metadata and aggregates.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponseBody {
    pub entries: Vec<FeedEntryBody>,
    pub info: PageInfoBody,
    pub statistics: FeedStatisticsBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Standalone statistics response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatisticsResponseBody {
    pub statistics: FeedStatisticsBody,
    pub window_days: i64,
}

/// Feed query parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQueryParams {
    /// Lookback window in days, 1-30 (default 7).
    pub days: Option<i64>,
    /// Sort key: duration, bedtime, wake_time, or created_at. Unknown
    /// values fall back to duration.
    pub sort: Option<String>,
    /// Page size, 1-100 (default 20).
    pub limit: Option<i64>,
    /// Items skipped before the page starts (default 0).
    pub offset: Option<i64>,
}

/// Statistics query parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedStatisticsQueryParams {
    /// Lookback window in days, 1-30 (default 7).
    pub days: Option<i64>,
}

/// The authenticated user's social feed: completed sessions from everyone
/// they follow, sorted descending.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    params(FeedQueryParams),
    responses(
        (status = 200, description = "The feed page", body = FeedResponseBody),
        (status = 400, description = "Invalid parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["feed"],
    operation_id = "getFeed"
)]
#[get("/feed")]
pub async fn get_feed(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<FeedQueryParams>,
) -> ApiResult<web::Json<FeedResponseBody>> {
    let window = parse_feed_window(query.days)?;
    let page = parse_page_params(query.limit, query.offset)?;
    let sort = query
        .sort
        .as_deref()
        .map_or_else(FeedSortKey::default, FeedSortKey::parse_or_default);

    let response = state
        .feed
        .feed(GetFeedRequest {
            user_id: identity.into_user_id(),
            window,
            sort,
            page,
        })
        .await?;

    Ok(web::Json(FeedResponseBody {
        entries: response.feed.entries.into_iter().map(Into::into).collect(),
        info: response.feed.info.into(),
        statistics: response.feed.statistics.into(),
        message: response.feed.message,
    }))
}

/// Aggregate sleep statistics for the authenticated user's feed window.
#[utoipa::path(
    get,
    path = "/api/v1/feed/statistics",
    params(FeedStatisticsQueryParams),
    responses(
        (status = 200, description = "Feed statistics", body = FeedStatisticsResponseBody),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["feed"],
    operation_id = "getFeedStatistics"
)]
#[get("/feed/statistics")]
pub async fn get_feed_statistics(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<FeedStatisticsQueryParams>,
) -> ApiResult<web::Json<FeedStatisticsResponseBody>> {
    let window = parse_feed_window(query.days)?;

    let response = state
        .feed
        .feed_statistics(GetFeedStatisticsRequest {
            user_id: identity.into_user_id(),
            window,
        })
        .await?;

    Ok(web::Json(FeedStatisticsResponseBody {
        statistics: response.statistics.into(),
        window_days: response.window_days,
    }))
}
