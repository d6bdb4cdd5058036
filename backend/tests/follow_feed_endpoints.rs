//! End-to-end coverage of the follow graph and social feed endpoints,
//! including the cache invalidation behaviour around edge changes.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::json;

use support::{app, create_test_user, get_json, post_json, record_sleep, world};

async fn follow<S>(service: &S, follower: &str, target: &str) -> StatusCode
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, _body) = post_json(
        service,
        follower,
        &format!("/api/v1/users/{target}/follow"),
        json!({}),
    )
    .await;
    status
}

#[actix_web::test]
async fn follow_unfollow_round_trip_restores_counts() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;

    let (status, before) = get_json(&service, &a, &format!("/api/v1/users/{a}/following")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["count"], 0);

    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);

    let (_status, during) = get_json(&service, &a, &format!("/api/v1/users/{a}/following")).await;
    assert_eq!(during["count"], 1);
    assert_eq!(during["items"][0]["displayName"], "User B");
    let (_status, followers) =
        get_json(&service, &b, &format!("/api/v1/users/{b}/followers")).await;
    assert_eq!(followers["count"], 1);

    let request = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{b}/follow"))
        .insert_header(("X-User-Id", a.as_str()))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_status, after) = get_json(&service, &a, &format!("/api/v1/users/{a}/following")).await;
    assert_eq!(after["count"], 0);
    let (_status, followers) =
        get_json(&service, &b, &format!("/api/v1/users/{b}/followers")).await;
    assert_eq!(followers["count"], 0);

    // Invalidation reached the cache for both parties.
    let patterns = world.cache.deleted_patterns();
    assert!(patterns.iter().any(|p| p.contains(&format!("following:user:{a}"))));
    assert!(patterns.iter().any(|p| p.contains(&format!("followers:user:{b}"))));
}

#[actix_web::test]
async fn self_follow_and_duplicates_are_rejected() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;

    assert_eq!(follow(&service, &a, &a).await, StatusCode::BAD_REQUEST);
    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);
    assert_eq!(follow(&service, &a, &b).await, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unfollow_without_edge_is_not_found() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;

    let request = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{b}/follow"))
        .insert_header(("X-User-Id", a.as_str()))
        .to_request();
    let response = test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn feed_aggregates_followed_users_sorted_by_duration() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;
    let c = create_test_user(&service, "User C").await;

    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);
    assert_eq!(follow(&service, &a, &c).await, StatusCode::OK);

    let now = Utc::now();
    // B: two completed records (300 and 500 minutes); C: one (400 minutes).
    let _record = record_sleep(&service, &b, now - Duration::days(2), 300).await;
    let _record = record_sleep(&service, &b, now - Duration::days(1), 500).await;
    let _record = record_sleep(&service, &c, now - Duration::days(3), 400).await;
    // A's own completed record must never appear in A's feed.
    let _record = record_sleep(&service, &a, now - Duration::days(4), 480).await;

    let (status, feed) = get_json(&service, &a, "/api/v1/feed?days=7&sort=duration").await;
    assert_eq!(status, StatusCode::OK);

    let entries = feed["entries"].as_array().expect("entries array");
    let durations: Vec<i64> = entries
        .iter()
        .map(|entry| entry["durationMinutes"].as_i64().expect("duration"))
        .collect();
    assert_eq!(durations, vec![500, 400, 300]);
    assert!(entries.iter().all(|entry| entry["userId"] != a.as_str()));

    assert_eq!(feed["info"]["total"], 3);
    assert_eq!(feed["statistics"]["recordCount"], 3);
    assert_eq!(feed["statistics"]["uniqueUsers"], 2);
    let average = feed["statistics"]["averageDurationMinutes"]
        .as_f64()
        .expect("average");
    assert!((average - 400.0).abs() < 0.01);
    assert_eq!(feed["statistics"]["totalSleepHours"], 20.0);
}

#[actix_web::test]
async fn feed_pagination_returns_the_middle_record() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;
    let c = create_test_user(&service, "User C").await;

    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);
    assert_eq!(follow(&service, &a, &c).await, StatusCode::OK);

    let now = Utc::now();
    let _record = record_sleep(&service, &b, now - Duration::days(2), 300).await;
    let _record = record_sleep(&service, &b, now - Duration::days(1), 500).await;
    let _record = record_sleep(&service, &c, now - Duration::days(3), 400).await;

    let (status, feed) = get_json(&service, &a, "/api/v1/feed?limit=1&offset=1").await;
    assert_eq!(status, StatusCode::OK);

    let entries = feed["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["durationMinutes"], 400);
    assert_eq!(feed["info"]["hasMore"], true);
    assert_eq!(feed["info"]["nextOffset"], 2);
    assert_eq!(feed["info"]["previousOffset"], 0);
}

#[actix_web::test]
async fn feed_excludes_active_sessions() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;

    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);

    // B is currently asleep: one active session, no completed records.
    let bedtime = Utc::now() - Duration::hours(2);
    let (status, _body) = post_json(
        &service,
        &b,
        "/api/v1/sleep-records/clock-in",
        json!({ "bedtime": bedtime.to_rfc3339() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, feed) = get_json(&service, &a, "/api/v1/feed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["info"]["total"], 0);
    let message = feed["message"].as_str().expect("message present");
    assert!(message.contains('1'));
}

#[actix_web::test]
async fn feed_for_loner_is_empty_with_message() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "Loner").await;

    let (status, feed) = get_json(&service, &a, "/api/v1/feed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["info"]["total"], 0);
    assert_eq!(feed["message"], "not following anyone yet");
    assert_eq!(feed["statistics"]["recordCount"], 0);
}

#[actix_web::test]
async fn feed_rejects_out_of_bounds_parameters() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;

    let (status, body) = get_json(&service, &a, "/api/v1/feed?days=45").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_window");

    let (status, body) = get_json(&service, &a, "/api/v1/feed?limit=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_pagination");
}

#[actix_web::test]
async fn unknown_sort_key_falls_back_to_duration() {
    let world = world();
    let service = test::init_service(app(&world)).await;
    let a = create_test_user(&service, "User A").await;
    let b = create_test_user(&service, "User B").await;

    assert_eq!(follow(&service, &a, &b).await, StatusCode::OK);
    let now = Utc::now();
    let _record = record_sleep(&service, &b, now - Duration::days(2), 300).await;
    let _record = record_sleep(&service, &b, now - Duration::days(1), 500).await;

    let (status, feed) = get_json(&service, &a, "/api/v1/feed?sort=alphabetical").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["entries"][0]["durationMinutes"], 500);
}
