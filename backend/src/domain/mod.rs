//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports adapters implement, and the services that
//! orchestrate them. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod cache;
pub mod error;
mod follow;
pub mod ports;
pub mod sleep;
pub mod user;

mod cache_admin_service;
mod follow_service;
mod sleep_session_service;
mod social_feed_service;
mod user_service;

pub use self::cache_admin_service::CacheAdminService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::follow::{FollowEdge, FollowEdgeDraft, FollowValidationError};
pub use self::follow_service::FollowService;
pub use self::sleep::{
    FeedEntry, FeedPage, FeedQuerySpec, FeedSortKey, FeedStatistics, FeedWindow,
    MAX_DURATION_MINUTES, MAX_WINDOW_DAYS, MIN_DURATION_MINUTES, MIN_WINDOW_DAYS, SleepRecord,
    SleepRecordDraft, SleepState, SleepValidationError,
};
pub use self::sleep_session_service::SleepSessionService;
pub use self::social_feed_service::SocialFeedService;
pub use self::user::{DisplayName, User, UserId, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use drowse::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
