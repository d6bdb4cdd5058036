//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_admin;
mod cache_store;
mod follow_command;
mod follow_query;
mod follow_repository;
mod sleep_record_repository;
mod sleep_session_command;
mod sleep_session_query;
mod social_feed_query;
mod social_feed_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use cache_admin::MockCacheAdmin;
pub use cache_admin::{
    CacheAdmin, ClearCacheRequest, ClearCacheResponse, FixtureCacheAdmin, WarmCacheRequest,
    WarmCacheResponse,
};
#[cfg(test)]
pub use cache_store::MockCacheStore;
pub use cache_store::{CacheStore, CacheStoreError, CacheStoreStats, FixtureCacheStore};
#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::{
    FixtureFollowCommand, FollowCommand, FollowEdgePayload, FollowRequest, FollowResponse,
    UnfollowRequest,
};
#[cfg(test)]
pub use follow_query::MockFollowQuery;
pub use follow_query::{FixtureFollowQuery, FollowQuery, ListFollowsRequest, ListFollowsResponse};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowListEntry, FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use sleep_record_repository::MockSleepRecordRepository;
pub use sleep_record_repository::{SleepRecordRepository, SleepRecordRepositoryError};
#[cfg(test)]
pub use sleep_session_command::MockSleepSessionCommand;
pub use sleep_session_command::{
    ClockInRequest, ClockInResponse, ClockOutRequest, ClockOutResponse, DeleteSleepRecordRequest,
    FixtureSleepSessionCommand, SleepRecordPayload, SleepSessionCommand,
};
#[cfg(test)]
pub use sleep_session_query::MockSleepSessionQuery;
pub use sleep_session_query::{
    FixtureSleepSessionQuery, ListSleepRecordsRequest, ListSleepRecordsResponse, SleepSessionQuery,
};
#[cfg(test)]
pub use social_feed_query::MockSocialFeedQuery;
pub use social_feed_query::{
    FixtureSocialFeedQuery, GetFeedRequest, GetFeedResponse, GetFeedStatisticsRequest,
    GetFeedStatisticsResponse, SocialFeedQuery,
};
#[cfg(test)]
pub use social_feed_repository::MockSocialFeedRepository;
pub use social_feed_repository::{SocialFeedRepository, SocialFeedRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{
    CreateUserRequest, FixtureUserDirectory, ListUsersRequest, UserDirectory,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
