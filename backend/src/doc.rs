//! OpenAPI surface used by Swagger UI and tooling.

use utoipa::OpenApi;

use crate::inbound::http::{cache_admin, feed, follows, health, schemas, sleep_records, users};

/// Aggregated OpenAPI document for the REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::live,
        health::ready,
        users::create_user,
        users::list_users,
        users::get_user,
        sleep_records::clock_in,
        sleep_records::clock_out,
        sleep_records::list_sleep_records,
        sleep_records::delete_sleep_record,
        follows::follow_user,
        follows::unfollow_user,
        follows::list_following,
        follows::list_followers,
        feed::get_feed,
        feed::get_feed_statistics,
        cache_admin::cache_stats,
        cache_admin::cache_clear,
        cache_admin::cache_warm,
    ),
    components(schemas(
        schemas::ErrorSchema,
        schemas::PageInfoBody,
        users::CreateUserRequestBody,
        users::UserResponseBody,
        users::UsersPageBody,
        sleep_records::ClockInRequestBody,
        sleep_records::ClockOutRequestBody,
        sleep_records::SleepRecordBody,
        sleep_records::SleepRecordsPageBody,
        follows::FollowEdgeBody,
        follows::FollowListEntryBody,
        follows::FollowListBody,
        feed::FeedEntryBody,
        feed::FeedStatisticsBody,
        feed::FeedResponseBody,
        feed::FeedStatisticsResponseBody,
        cache_admin::CacheStatsBody,
        cache_admin::ClearCacheRequestBody,
        cache_admin::ClearCacheResponseBody,
        cache_admin::WarmCacheRequestBody,
        cache_admin::WarmCacheResponseBody,
    )),
    tags(
        (name = "users", description = "User directory"),
        (name = "sleep-records", description = "Clock-in/clock-out sleep sessions"),
        (name = "follows", description = "Directed follow graph"),
        (name = "feed", description = "Aggregated social sleep feed"),
        (name = "cache-admin", description = "Operator cache surface"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! The OpenAPI document must assemble without panicking.
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let encoded = serde_json::to_value(&doc).expect("document serialises");
        assert!(encoded["paths"]["/api/v1/feed"].is_object());
        assert!(encoded["paths"]["/api/v1/sleep-records/clock-in"].is_object());
    }
}
