//! Sleep session HTTP handlers.
//!
//! ```text
//! POST   /api/v1/sleep-records/clock-in
//! POST   /api/v1/sleep-records/clock-out
//! GET    /api/v1/sleep-records
//! DELETE /api/v1/sleep-records/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ClockInRequest, ClockOutRequest, DeleteSleepRecordRequest, ListSleepRecordsRequest,
    SleepRecordPayload,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::schemas::{ErrorSchema, PageInfoBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_rfc3339_timestamp, parse_page_params, parse_uuid,
};

/// Request payload for opening a sleep session.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequestBody {
    /// Bedtime as RFC 3339; defaults to now when omitted.
    #[schema(format = "date-time")]
    pub bedtime: Option<String>,
}

/// Request payload for completing the active session.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequestBody {
    /// Wake time as RFC 3339; defaults to now when omitted.
    #[schema(format = "date-time")]
    pub wake_time: Option<String>,
}

/// One sleep record in a response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecordBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "date-time")]
    pub bedtime: String,
    #[schema(format = "date-time")]
    pub wake_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub completed: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<SleepRecordPayload> for SleepRecordBody {
    fn from(value: SleepRecordPayload) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            bedtime: value.bedtime.to_rfc3339(),
            wake_time: value.wake_time.map(|ts| ts.to_rfc3339()),
            duration_minutes: value.duration_minutes,
            completed: value.completed,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// A page of the caller's sleep records.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecordsPageBody {
    pub items: Vec<SleepRecordBody>,
    pub info: PageInfoBody,
}

/// Window query parameters for record listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSleepRecordsQueryParams {
    /// Page size, 1-100 (default 20).
    pub limit: Option<i64>,
    /// Items skipped before the page starts (default 0).
    pub offset: Option<i64>,
}

/// Open a sleep session for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/sleep-records/clock-in",
    request_body = ClockInRequestBody,
    responses(
        (status = 200, description = "Session opened", body = SleepRecordBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 409, description = "Active or overlapping session", body = ErrorSchema)
    ),
    tags = ["sleep-records"],
    operation_id = "clockIn"
)]
#[post("/sleep-records/clock-in")]
pub async fn clock_in(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ClockInRequestBody>,
) -> ApiResult<web::Json<SleepRecordBody>> {
    let bedtime =
        parse_optional_rfc3339_timestamp(payload.into_inner().bedtime, FieldName::new("bedtime"))?;

    let response = state
        .sleep_commands
        .clock_in(ClockInRequest {
            user_id: identity.into_user_id(),
            bedtime,
        })
        .await?;

    Ok(web::Json(response.record.into()))
}

/// Complete the authenticated user's active session.
#[utoipa::path(
    post,
    path = "/api/v1/sleep-records/clock-out",
    request_body = ClockOutRequestBody,
    responses(
        (status = 200, description = "Session completed", body = SleepRecordBody),
        (status = 400, description = "Invalid wake time", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No active session", body = ErrorSchema)
    ),
    tags = ["sleep-records"],
    operation_id = "clockOut"
)]
#[post("/sleep-records/clock-out")]
pub async fn clock_out(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ClockOutRequestBody>,
) -> ApiResult<web::Json<SleepRecordBody>> {
    let wake_time = parse_optional_rfc3339_timestamp(
        payload.into_inner().wake_time,
        FieldName::new("wakeTime"),
    )?;

    let response = state
        .sleep_commands
        .clock_out(ClockOutRequest {
            user_id: identity.into_user_id(),
            wake_time,
        })
        .await?;

    Ok(web::Json(response.record.into()))
}

/// List the authenticated user's sleep records, newest bedtime first.
#[utoipa::path(
    get,
    path = "/api/v1/sleep-records",
    params(ListSleepRecordsQueryParams),
    responses(
        (status = 200, description = "A page of sleep records", body = SleepRecordsPageBody),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["sleep-records"],
    operation_id = "listSleepRecords"
)]
#[get("/sleep-records")]
pub async fn list_sleep_records(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<ListSleepRecordsQueryParams>,
) -> ApiResult<web::Json<SleepRecordsPageBody>> {
    let page = parse_page_params(query.limit, query.offset)?;

    let response = state
        .sleep_queries
        .list_records(ListSleepRecordsRequest {
            user_id: identity.into_user_id(),
            page,
        })
        .await?;

    Ok(web::Json(SleepRecordsPageBody {
        items: response
            .records
            .items
            .into_iter()
            .map(Into::into)
            .collect(),
        info: response.records.info.into(),
    }))
}

/// Delete one of the authenticated user's sleep records.
#[utoipa::path(
    delete,
    path = "/api/v1/sleep-records/{id}",
    params(("id" = String, Path, format = "uuid", description = "Record id")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the record owner", body = ErrorSchema),
        (status = 404, description = "Unknown record", body = ErrorSchema)
    ),
    tags = ["sleep-records"],
    operation_id = "deleteSleepRecord"
)]
#[delete("/sleep-records/{id}")]
pub async fn delete_sleep_record(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let record_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    state
        .sleep_commands
        .delete_record(DeleteSleepRecordRequest {
            user_id: identity.into_user_id(),
            record_id,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
