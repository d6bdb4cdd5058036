//! Builders for HTTP state ports and repository-backed service pairs.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use drowse::domain::cache::ReadThroughCache;
use drowse::domain::ports::{
    CacheAdmin, CacheStore, FixtureCacheStore, FollowCommand, FollowQuery, SleepSessionCommand,
    SleepSessionQuery, SocialFeedQuery, UserDirectory,
};
use drowse::domain::{
    CacheAdminService, FollowService, SleepSessionService, SocialFeedService, UserService,
};
use drowse::inbound::http::state::{HttpState, HttpStatePorts};
use drowse::outbound::memory::MemoryStore;
use drowse::outbound::persistence::{
    DbPool, DieselFollowRepository, DieselSleepRecordRepository, DieselSocialFeedRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Wire the full port bundle over PostgreSQL-backed repositories.
fn build_db_ports(pool: &DbPool, cache: Arc<dyn CacheStore>) -> HttpStatePorts {
    let clock = Arc::new(DefaultClock);
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let sleep_repo = Arc::new(DieselSleepRecordRepository::new(pool.clone()));
    let follow_repo = Arc::new(DieselFollowRepository::new(pool.clone()));
    let feed_repo = Arc::new(DieselSocialFeedRepository::new(pool.clone()));

    let sleep = Arc::new(SleepSessionService::new(sleep_repo, clock.clone()));
    let follows = Arc::new(FollowService::new(
        follow_repo.clone(),
        user_repo.clone(),
        ReadThroughCache::new(cache.clone()),
        clock.clone(),
    ));
    let feed = Arc::new(SocialFeedService::new(
        feed_repo.clone(),
        follow_repo,
        user_repo.clone(),
        ReadThroughCache::new(cache.clone()),
        clock.clone(),
    ));
    let cache_admin = Arc::new(CacheAdminService::new(
        cache,
        feed_repo,
        user_repo.clone(),
        clock,
    ));

    HttpStatePorts {
        users: Arc::new(UserService::new(user_repo)),
        sleep_commands: sleep.clone() as Arc<dyn SleepSessionCommand>,
        sleep_queries: sleep as Arc<dyn SleepSessionQuery>,
        follow_commands: follows.clone() as Arc<dyn FollowCommand>,
        follow_queries: follows as Arc<dyn FollowQuery>,
        feed: feed as Arc<dyn SocialFeedQuery>,
        cache_admin: cache_admin as Arc<dyn CacheAdmin>,
    }
}

/// Wire the full port bundle over the shared in-memory store.
fn build_memory_ports(cache: Arc<dyn CacheStore>) -> HttpStatePorts {
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(MemoryStore::new());

    let sleep = Arc::new(SleepSessionService::new(store.clone(), clock.clone()));
    let follows = Arc::new(FollowService::new(
        store.clone(),
        store.clone(),
        ReadThroughCache::new(cache.clone()),
        clock.clone(),
    ));
    let feed = Arc::new(SocialFeedService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ReadThroughCache::new(cache.clone()),
        clock.clone(),
    ));
    let cache_admin = Arc::new(CacheAdminService::new(
        cache,
        store.clone(),
        store.clone(),
        clock,
    ));

    HttpStatePorts {
        users: Arc::new(UserService::new(store)) as Arc<dyn UserDirectory>,
        sleep_commands: sleep.clone() as Arc<dyn SleepSessionCommand>,
        sleep_queries: sleep as Arc<dyn SleepSessionQuery>,
        follow_commands: follows.clone() as Arc<dyn FollowCommand>,
        follow_queries: follows as Arc<dyn FollowQuery>,
        feed: feed as Arc<dyn SocialFeedQuery>,
        cache_admin: cache_admin as Arc<dyn CacheAdmin>,
    }
}

/// Build the shared HTTP state from configured adapters with in-memory
/// fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let cache: Arc<dyn CacheStore> = config
        .cache_store
        .clone()
        .unwrap_or_else(|| Arc::new(FixtureCacheStore::default()));

    let ports = match &config.db_pool {
        Some(pool) => build_db_ports(pool, cache),
        None => build_memory_ports(cache),
    };

    web::Data::new(HttpState::new(ports))
}
