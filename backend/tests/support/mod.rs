//! Shared harness for the HTTP integration suites.
//!
//! Wires the real domain services over the in-memory store and the fixture
//! cache store, then mounts the full `/api/v1` surface the way the server
//! does. Tests drive the HTTP layer end to end without PostgreSQL or Redis.

// Each suite compiles its own copy; not every suite uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::Value;

use drowse::domain::cache::ReadThroughCache;
use drowse::domain::ports::{
    CacheAdmin, CacheStore, FixtureCacheStore, FollowCommand, FollowQuery, SleepSessionCommand,
    SleepSessionQuery, SocialFeedQuery,
};
use drowse::domain::{
    CacheAdminService, FollowService, SleepSessionService, SocialFeedService, UserService,
};
use drowse::inbound::http::auth::USER_ID_HEADER;
use drowse::inbound::http::cache_admin::{cache_clear, cache_stats, cache_warm};
use drowse::inbound::http::feed::{get_feed, get_feed_statistics};
use drowse::inbound::http::follows::{follow_user, list_followers, list_following, unfollow_user};
use drowse::inbound::http::sleep_records::{
    clock_in, clock_out, delete_sleep_record, list_sleep_records,
};
use drowse::inbound::http::state::{HttpState, HttpStatePorts};
use drowse::inbound::http::users::{create_user, get_user, list_users};
use drowse::outbound::memory::MemoryStore;

/// Everything a suite needs to drive the API and inspect side effects.
pub struct TestWorld {
    pub state: web::Data<HttpState>,
    pub cache: Arc<FixtureCacheStore>,
}

/// Build the service graph over fresh in-memory adapters.
pub fn world() -> TestWorld {
    let cache = Arc::new(FixtureCacheStore::default());
    let cache_port: Arc<dyn CacheStore> = cache.clone();
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(MemoryStore::new());

    let sleep = Arc::new(SleepSessionService::new(store.clone(), clock.clone()));
    let follows = Arc::new(FollowService::new(
        store.clone(),
        store.clone(),
        ReadThroughCache::new(cache_port.clone()),
        clock.clone(),
    ));
    let feed = Arc::new(SocialFeedService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ReadThroughCache::new(cache_port.clone()),
        clock.clone(),
    ));
    let cache_admin = Arc::new(CacheAdminService::new(
        cache_port,
        store.clone(),
        store.clone(),
        clock,
    ));

    let state = web::Data::new(HttpState::new(HttpStatePorts {
        users: Arc::new(UserService::new(store)),
        sleep_commands: sleep.clone() as Arc<dyn SleepSessionCommand>,
        sleep_queries: sleep as Arc<dyn SleepSessionQuery>,
        follow_commands: follows.clone() as Arc<dyn FollowCommand>,
        follow_queries: follows as Arc<dyn FollowQuery>,
        feed: feed as Arc<dyn SocialFeedQuery>,
        cache_admin: cache_admin as Arc<dyn CacheAdmin>,
    }));

    TestWorld { state, cache }
}

/// Mount the API surface over the world's state.
pub fn app(
    world: &TestWorld,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new().app_data(world.state.clone()).service(
        web::scope("/api/v1")
            .service(create_user)
            .service(list_users)
            .service(clock_in)
            .service(clock_out)
            .service(list_sleep_records)
            .service(delete_sleep_record)
            .service(follow_user)
            .service(unfollow_user)
            .service(list_following)
            .service(list_followers)
            .service(get_feed)
            .service(get_feed_statistics)
            .service(cache_stats)
            .service(cache_clear)
            .service(cache_warm)
            .service(get_user),
    )
}

/// POST a JSON body as the given user and return the decoded response.
pub async fn post_json<S>(
    service: &S,
    user_id: &str,
    uri: &str,
    body: Value,
) -> (actix_web::http::StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::post()
        .uri(uri)
        .insert_header((USER_ID_HEADER, user_id))
        .set_json(body)
        .to_request();
    let response = test::call_service(service, request).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let decoded = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };
    (status, decoded)
}

/// GET a path as the given user and return the decoded response.
pub async fn get_json<S>(
    service: &S,
    user_id: &str,
    uri: &str,
) -> (actix_web::http::StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::get()
        .uri(uri)
        .insert_header((USER_ID_HEADER, user_id))
        .to_request();
    let response = test::call_service(service, request).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let decoded = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };
    (status, decoded)
}

/// Register a user through the API and return its id.
pub async fn create_test_user<S>(service: &S, display_name: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(serde_json::json!({ "displayName": display_name }))
        .to_request();
    let response = test::call_service(service, request).await;
    assert!(response.status().is_success(), "user creation must succeed");
    let body: Value = test::read_body_json(response).await;
    body["id"].as_str().expect("user id in response").to_owned()
}

/// Record one completed sleep session via clock-in then clock-out.
pub async fn record_sleep<S>(
    service: &S,
    user_id: &str,
    bedtime: chrono::DateTime<chrono::Utc>,
    minutes: i64,
) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, _body) = post_json(
        service,
        user_id,
        "/api/v1/sleep-records/clock-in",
        serde_json::json!({ "bedtime": bedtime.to_rfc3339() }),
    )
    .await;
    assert!(status.is_success(), "clock-in must succeed");

    let wake_time = bedtime + chrono::Duration::minutes(minutes);
    let (status, body) = post_json(
        service,
        user_id,
        "/api/v1/sleep-records/clock-out",
        serde_json::json!({ "wakeTime": wake_time.to_rfc3339() }),
    )
    .await;
    assert!(status.is_success(), "clock-out must succeed");
    body
}
