//! Behavioural coverage for the social feed service: empty-feed messaging,
//! cross-owner aggregation, pagination, and statistics caching.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};
use uuid::Uuid;

use crate::domain::cache::ReadThroughCache;
use crate::domain::ports::{
    FixtureCacheStore, GetFeedRequest, GetFeedStatisticsRequest, MockFollowRepository,
    MockSocialFeedRepository, MockUserRepository, SocialFeedQuery,
};
use crate::domain::{ErrorCode, FeedEntry, FeedSortKey, FeedStatistics, FeedWindow, UserId};
use pagination::PageParams;

use super::SocialFeedService;

fn fixture_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
        .expect("RFC3339 fixture timestamp")
        .with_timezone(&Utc)
}

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixture_now());
    Arc::new(clock)
}

fn entry(owner: &UserId, name: &str, minutes: i64) -> FeedEntry {
    let wake_time = fixture_now() - Duration::hours(2);
    FeedEntry {
        record_id: Uuid::new_v4(),
        owner_id: owner.clone(),
        owner_display_name: name.to_owned(),
        bedtime: wake_time - Duration::minutes(minutes),
        wake_time,
        duration_minutes: minutes,
        completed: true,
        created_at: wake_time,
    }
}

type TestService = SocialFeedService<
    MockSocialFeedRepository,
    MockFollowRepository,
    MockUserRepository,
    FixtureCacheStore,
>;

fn service_with(
    feed_repo: MockSocialFeedRepository,
    follow_repo: MockFollowRepository,
    store: Arc<FixtureCacheStore>,
) -> TestService {
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_exists().returning(|_| Ok(true));
    SocialFeedService::new(
        Arc::new(feed_repo),
        Arc::new(follow_repo),
        Arc::new(user_repo),
        ReadThroughCache::new(store),
        fixed_clock(),
    )
}

#[fixture]
fn requester() -> UserId {
    UserId::random()
}

fn feed_request(requester: &UserId, page: PageParams) -> GetFeedRequest {
    GetFeedRequest {
        user_id: requester.clone(),
        window: FeedWindow::new(7).expect("valid window"),
        sort: FeedSortKey::Duration,
        page,
    }
}

#[rstest]
#[tokio::test]
async fn following_nobody_yields_empty_feed_with_message(requester: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_following_count().returning(|_| Ok(0));
    let service = service_with(
        MockSocialFeedRepository::new(),
        follow_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let response = service
        .feed(feed_request(&requester, PageParams::default()))
        .await
        .expect("feed succeeds");

    assert!(response.feed.entries.is_empty());
    assert_eq!(response.feed.info.total, 0);
    assert_eq!(
        response.feed.message.as_deref(),
        Some("not following anyone yet")
    );
}

#[rstest]
#[tokio::test]
async fn quiet_follows_yield_empty_feed_with_follow_count(requester: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_following_count().returning(|_| Ok(4));
    let mut feed_repo = MockSocialFeedRepository::new();
    feed_repo.expect_count_entries().returning(|_, _| Ok(0));
    let service = service_with(
        feed_repo,
        follow_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let response = service
        .feed(feed_request(&requester, PageParams::default()))
        .await
        .expect("feed succeeds");

    assert!(response.feed.entries.is_empty());
    let message = response.feed.message.expect("message present");
    assert!(message.contains('4'));
    assert!(message.contains("7 days"));
}

#[rstest]
#[tokio::test]
async fn feed_orders_by_duration_and_aggregates_across_owners(requester: UserId) {
    // B has two completed records (300, 500 min), C has one (400 min).
    let b = UserId::random();
    let c = UserId::random();
    let entries = vec![
        entry(&b, "User B", 500),
        entry(&c, "User C", 400),
        entry(&b, "User B", 300),
    ];
    let statistics = FeedStatistics::from_entries(&entries);

    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_following_count().returning(|_| Ok(2));
    let mut feed_repo = MockSocialFeedRepository::new();
    feed_repo.expect_count_entries().returning(|_, _| Ok(3));
    let listed = entries.clone();
    feed_repo
        .expect_list_entries()
        .returning(move |_, _| Ok(listed.clone()));
    let stats = statistics.clone();
    feed_repo
        .expect_statistics()
        .returning(move |_, _| Ok(stats.clone()));

    let service = service_with(
        feed_repo,
        follow_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let response = service
        .feed(feed_request(&requester, PageParams::default()))
        .await
        .expect("feed succeeds");

    let durations: Vec<i64> = response
        .feed
        .entries
        .iter()
        .map(|e| e.duration_minutes)
        .collect();
    assert_eq!(durations, vec![500, 400, 300]);
    assert_eq!(response.feed.statistics.record_count, 3);
    assert_eq!(response.feed.statistics.unique_users, 2);
    assert!((response.feed.statistics.average_duration_minutes - 400.0).abs() < f64::EPSILON);
    assert_eq!(response.feed.statistics.total_sleep_hours, 20.0);
    assert!(response.feed.message.is_none());
}

#[rstest]
#[tokio::test]
async fn pagination_slices_the_middle_record(requester: UserId) {
    let c = UserId::random();
    let middle = vec![entry(&c, "User C", 400)];

    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_following_count().returning(|_| Ok(2));
    let mut feed_repo = MockSocialFeedRepository::new();
    feed_repo.expect_count_entries().returning(|_, _| Ok(3));
    let listed = middle.clone();
    feed_repo.expect_list_entries().returning(move |spec, _| {
        assert_eq!(spec.page().limit(), 1);
        assert_eq!(spec.page().offset(), 1);
        Ok(listed.clone())
    });
    feed_repo
        .expect_statistics()
        .returning(|_, _| Ok(FeedStatistics::empty()));

    let service = service_with(
        feed_repo,
        follow_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let page = PageParams::new(1, 1).expect("valid window");
    let response = service
        .feed(feed_request(&requester, page))
        .await
        .expect("feed succeeds");

    assert_eq!(response.feed.entries.len(), 1);
    assert_eq!(response.feed.entries[0].duration_minutes, 400);
    assert!(response.feed.info.has_more);
    assert_eq!(response.feed.info.next_offset, Some(2));
    assert_eq!(response.feed.info.previous_offset, Some(0));
}

#[rstest]
#[tokio::test]
async fn statistics_are_cached_per_window(requester: UserId) {
    let mut feed_repo = MockSocialFeedRepository::new();
    feed_repo
        .expect_statistics()
        .times(1)
        .returning(|_, _| Ok(FeedStatistics::empty()));
    let store = Arc::new(FixtureCacheStore::default());
    let service = service_with(feed_repo, MockFollowRepository::new(), store);

    for _ in 0..2 {
        let response = service
            .feed_statistics(GetFeedStatisticsRequest {
                user_id: requester.clone(),
                window: FeedWindow::new(7).expect("valid window"),
            })
            .await
            .expect("statistics succeed");
        assert_eq!(response.window_days, 7);
    }
}

#[rstest]
#[tokio::test]
async fn unknown_requester_is_not_found() {
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_exists().returning(|_| Ok(false));
    let service = SocialFeedService::new(
        Arc::new(MockSocialFeedRepository::new()),
        Arc::new(MockFollowRepository::new()),
        Arc::new(user_repo),
        ReadThroughCache::new(Arc::new(FixtureCacheStore::default())),
        fixed_clock(),
    );

    let err = service
        .feed(GetFeedRequest {
            user_id: UserId::random(),
            window: FeedWindow::default(),
            sort: FeedSortKey::Duration,
            page: PageParams::default(),
        })
        .await
        .expect_err("missing user rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
