//! Behavioural coverage for the follow service, including cache
//! invalidation on edge changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use crate::domain::cache::{CacheCategory, ReadThroughCache, cache_key, user_pattern};
use crate::domain::ports::{
    FixtureCacheStore, FollowCommand, FollowQuery, FollowRequest, ListFollowsRequest,
    MockFollowRepository, MockUserRepository, UnfollowRequest,
};
use crate::domain::{ErrorCode, UserId};
use pagination::PageParams;

use super::FollowService;

fn fixture_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
        .expect("RFC3339 fixture timestamp")
        .with_timezone(&Utc)
}

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixture_now());
    Arc::new(clock)
}

#[fixture]
fn follower() -> UserId {
    UserId::random()
}

#[fixture]
fn target() -> UserId {
    UserId::random()
}

fn service_with(
    follow_repo: MockFollowRepository,
    user_repo: MockUserRepository,
    store: Arc<FixtureCacheStore>,
) -> FollowService<MockFollowRepository, MockUserRepository, FixtureCacheStore> {
    FollowService::new(
        Arc::new(follow_repo),
        Arc::new(user_repo),
        ReadThroughCache::new(store),
        fixed_clock(),
    )
}

#[rstest]
#[tokio::test]
async fn follow_creates_edge_and_invalidates_both_parties(follower: UserId, target: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_exists().returning(|_, _| Ok(false));
    follow_repo.expect_insert().returning(|_| Ok(()));
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_exists().returning(|_| Ok(true));
    let store = Arc::new(FixtureCacheStore::default());

    // Seed caches for both parties so the invalidation is observable.
    store.seed(
        &cache_key(CacheCategory::FollowingCount, &follower, None),
        "3",
    );
    store.seed(
        &cache_key(CacheCategory::FollowersCount, &target, None),
        "9",
    );
    store.seed(
        &cache_key(CacheCategory::SocialStats, &follower, Some("days:7")),
        "{}",
    );

    let service = service_with(follow_repo, user_repo, store.clone());
    let response = service
        .follow(FollowRequest {
            follower: follower.clone(),
            target: target.clone(),
        })
        .await
        .expect("follow succeeds");

    assert_eq!(response.edge.follower_id, follower);
    assert_eq!(response.edge.followed_id, target);

    assert_eq!(
        store.raw_value(&cache_key(CacheCategory::FollowingCount, &follower, None)),
        None
    );
    assert_eq!(
        store.raw_value(&cache_key(CacheCategory::FollowersCount, &target, None)),
        None
    );
    assert_eq!(
        store.raw_value(&cache_key(
            CacheCategory::SocialStats,
            &follower,
            Some("days:7")
        )),
        None
    );
    let patterns = store.deleted_patterns();
    assert!(patterns.contains(&user_pattern(CacheCategory::Following, &follower)));
    assert!(patterns.contains(&user_pattern(CacheCategory::Followers, &target)));
}

#[rstest]
#[tokio::test]
async fn self_follow_is_invalid(follower: UserId) {
    let service = service_with(
        MockFollowRepository::new(),
        MockUserRepository::new(),
        Arc::new(FixtureCacheStore::default()),
    );

    let err = service
        .follow(FollowRequest {
            follower: follower.clone(),
            target: follower,
        })
        .await
        .expect_err("self-follow rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn follow_unknown_target_is_not_found(follower: UserId, target: UserId) {
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_exists().returning(|_| Ok(false));
    let service = service_with(
        MockFollowRepository::new(),
        user_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let err = service
        .follow(FollowRequest { follower, target })
        .await
        .expect_err("missing target rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn duplicate_follow_is_conflict(follower: UserId, target: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_exists().returning(|_, _| Ok(true));
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_exists().returning(|_| Ok(true));
    let service = service_with(
        follow_repo,
        user_repo,
        Arc::new(FixtureCacheStore::default()),
    );

    let err = service
        .follow(FollowRequest { follower, target })
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn unfollow_missing_edge_is_not_found(follower: UserId, target: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_delete().returning(|_, _| Ok(false));
    let service = service_with(
        follow_repo,
        MockUserRepository::new(),
        Arc::new(FixtureCacheStore::default()),
    );

    let err = service
        .unfollow(UnfollowRequest { follower, target })
        .await
        .expect_err("missing edge rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unfollow_invalidates_cached_counts(follower: UserId, target: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_delete().returning(|_, _| Ok(true));
    let store = Arc::new(FixtureCacheStore::default());
    store.seed(
        &cache_key(CacheCategory::FollowingCount, &follower, None),
        "4",
    );
    let service = service_with(follow_repo, MockUserRepository::new(), store.clone());

    service
        .unfollow(UnfollowRequest {
            follower: follower.clone(),
            target,
        })
        .await
        .expect("unfollow succeeds");

    assert_eq!(
        store.raw_value(&cache_key(CacheCategory::FollowingCount, &follower, None)),
        None
    );
}

#[rstest]
#[tokio::test]
async fn counts_are_recomputed_once_then_served_from_cache(follower: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo
        .expect_following_count()
        .times(1)
        .returning(|_| Ok(2));
    follow_repo
        .expect_list_following()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let service = service_with(
        follow_repo,
        MockUserRepository::new(),
        Arc::new(FixtureCacheStore::default()),
    );

    for _ in 0..2 {
        let response = service
            .list_following(ListFollowsRequest {
                user_id: follower.clone(),
                page: PageParams::default(),
            })
            .await
            .expect("list succeeds");
        assert_eq!(response.count, 2);
    }
}

#[rstest]
#[tokio::test]
async fn shifted_pages_bypass_the_list_cache(follower: UserId) {
    let mut follow_repo = MockFollowRepository::new();
    follow_repo.expect_followers_count().returning(|_| Ok(50));
    // Two reads of the same shifted window both hit the repository.
    follow_repo
        .expect_list_followers()
        .times(2)
        .returning(|_, _| Ok(Vec::new()));
    let store = Arc::new(FixtureCacheStore::default());
    let service = service_with(follow_repo, MockUserRepository::new(), store.clone());

    let page = PageParams::new(20, 20).expect("valid window");
    for _ in 0..2 {
        let _response = service
            .list_followers(ListFollowsRequest {
                user_id: follower.clone(),
                page,
            })
            .await
            .expect("list succeeds");
    }

    let suffixed = cache_key(
        CacheCategory::Followers,
        &follower,
        Some("limit:20:offset:20"),
    );
    assert_eq!(store.raw_value(&suffixed), None, "window never cached");
}
