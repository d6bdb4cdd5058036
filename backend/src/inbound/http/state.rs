//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CacheAdmin, FollowCommand, FollowQuery, SleepSessionCommand, SleepSessionQuery,
    SocialFeedQuery, UserDirectory,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserDirectory>,
    pub sleep_commands: Arc<dyn SleepSessionCommand>,
    pub sleep_queries: Arc<dyn SleepSessionQuery>,
    pub follow_commands: Arc<dyn FollowCommand>,
    pub follow_queries: Arc<dyn FollowQuery>,
    pub feed: Arc<dyn SocialFeedQuery>,
    pub cache_admin: Arc<dyn CacheAdmin>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub sleep_commands: Arc<dyn SleepSessionCommand>,
    pub sleep_queries: Arc<dyn SleepSessionQuery>,
    pub follow_commands: Arc<dyn FollowCommand>,
    pub follow_queries: Arc<dyn FollowQuery>,
    pub feed: Arc<dyn SocialFeedQuery>,
    pub cache_admin: Arc<dyn CacheAdmin>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use drowse::domain::ports::{
    ///     FixtureCacheAdmin, FixtureFollowCommand, FixtureFollowQuery,
    ///     FixtureSleepSessionCommand, FixtureSleepSessionQuery, FixtureSocialFeedQuery,
    ///     FixtureUserDirectory,
    /// };
    /// use drowse::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: Arc::new(FixtureUserDirectory),
    ///     sleep_commands: Arc::new(FixtureSleepSessionCommand),
    ///     sleep_queries: Arc::new(FixtureSleepSessionQuery),
    ///     follow_commands: Arc::new(FixtureFollowCommand),
    ///     follow_queries: Arc::new(FixtureFollowQuery),
    ///     feed: Arc::new(FixtureSocialFeedQuery),
    ///     cache_admin: Arc::new(FixtureCacheAdmin),
    /// });
    /// let _feed = state.feed.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            sleep_commands,
            sleep_queries,
            follow_commands,
            follow_queries,
            feed,
            cache_admin,
        } = ports;
        Self {
            users,
            sleep_commands,
            sleep_queries,
            follow_commands,
            follow_queries,
            feed,
            cache_admin,
        }
    }
}
