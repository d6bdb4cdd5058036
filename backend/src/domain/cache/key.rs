//! Cache categories and deterministic key construction.
//!
//! Every cached value belongs to a category with a fixed wire prefix and its
//! own time-to-live. Keys render from one template:
//! `<prefix>:user:<user_id>` for the bare per-user value and
//! `<prefix>:user:<user_id>:<suffix>` when pagination or window parameters
//! scope the entry. Bulk invalidation uses the matching glob
//! `<prefix>:user:<user_id>:*`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::UserId;

/// Named class of cached values with its own key template and TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    /// First page of the users someone follows.
    Following,
    /// First page of the users following someone.
    Followers,
    /// Number of users someone follows.
    FollowingCount,
    /// Number of users following someone.
    FollowersCount,
    /// Aggregated social sleep statistics for a user's feed.
    SocialStats,
}

impl CacheCategory {
    /// All categories, used when invalidating or warming a whole user.
    pub const ALL: [Self; 5] = [
        Self::Following,
        Self::Followers,
        Self::FollowingCount,
        Self::FollowersCount,
        Self::SocialStats,
    ];

    /// Stable wire prefix rendered into keys.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Followers => "followers",
            Self::FollowingCount => "following_count",
            Self::FollowersCount => "followers_count",
            Self::SocialStats => "social_stats",
        }
    }

    /// Category time-to-live.
    ///
    /// Counts are cheapest to recompute but also cheapest to hold, so they
    /// live longest. Social statistics summarise other users' writes, which
    /// never trigger invalidation here, so they carry the shortest TTL.
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Following | Self::Followers => Duration::from_secs(30 * 60),
            Self::FollowingCount | Self::FollowersCount => Duration::from_secs(60 * 60),
            Self::SocialStats => Duration::from_secs(5 * 60),
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Error returned when parsing a cache category from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCacheCategoryError;

impl fmt::Display for ParseCacheCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognised cache category")
    }
}

impl std::error::Error for ParseCacheCategoryError {}

impl FromStr for CacheCategory {
    type Err = ParseCacheCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "following" => Ok(Self::Following),
            "followers" => Ok(Self::Followers),
            "following_count" => Ok(Self::FollowingCount),
            "followers_count" => Ok(Self::FollowersCount),
            "social_stats" => Ok(Self::SocialStats),
            _ => Err(ParseCacheCategoryError),
        }
    }
}

/// Cache key used to store and retrieve serialised values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a cache key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

/// Render the per-user key for a category, with an optional suffix.
///
/// Pure and deterministic: the same inputs always yield the same string, and
/// omitting the suffix yields the distinct, shorter bare key.
///
/// # Examples
/// ```
/// use drowse::domain::cache::{CacheCategory, cache_key};
/// use drowse::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// let bare = cache_key(CacheCategory::FollowingCount, &id, None);
/// let page = cache_key(CacheCategory::Following, &id, Some("limit:20:offset:0"));
/// assert_eq!(
///     bare.as_str(),
///     "following_count:user:3fa85f64-5717-4562-b3fc-2c963f66afa6"
/// );
/// assert_eq!(
///     page.as_str(),
///     "following:user:3fa85f64-5717-4562-b3fc-2c963f66afa6:limit:20:offset:0"
/// );
/// ```
pub fn cache_key(category: CacheCategory, user_id: &UserId, suffix: Option<&str>) -> CacheKey {
    let rendered = match suffix {
        Some(suffix) => format!("{}:user:{}:{}", category.prefix(), user_id, suffix),
        None => format!("{}:user:{}", category.prefix(), user_id),
    };
    CacheKey(rendered)
}

/// Render the wildcard glob matching every suffixed key of a category for
/// one user.
pub fn user_pattern(category: CacheCategory, user_id: &UserId) -> String {
    format!("{}:user:{}:*", category.prefix(), user_id)
}

#[cfg(test)]
mod tests {
    //! Validates key templates, category parsing, and whitespace constraints.
    use rstest::rstest;

    use super::{
        CacheCategory, CacheKey, CacheKeyValidationError, ParseCacheCategoryError, cache_key,
        user_pattern,
    };
    use crate::domain::UserId;

    fn fixture_user() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn cache_key_rejects_blank(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("blank keys rejected");
        assert_eq!(err, CacheKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" leading")]
    #[case("trailing ")]
    fn cache_key_rejects_whitespace_padding(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, CacheKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn cache_key_is_deterministic() {
        let user = fixture_user();
        let first = cache_key(CacheCategory::SocialStats, &user, Some("days:7"));
        let second = cache_key(CacheCategory::SocialStats, &user, Some("days:7"));
        assert_eq!(first, second);
        assert_eq!(
            first.as_str(),
            "social_stats:user:3fa85f64-5717-4562-b3fc-2c963f66afa6:days:7"
        );
    }

    #[rstest]
    fn bare_key_is_shorter_and_distinct() {
        let user = fixture_user();
        let bare = cache_key(CacheCategory::Followers, &user, None);
        let suffixed = cache_key(CacheCategory::Followers, &user, Some("limit:20:offset:0"));
        assert_ne!(bare, suffixed);
        assert!(bare.as_str().len() < suffixed.as_str().len());
    }

    #[rstest]
    fn pattern_covers_suffixed_keys_only() {
        let user = fixture_user();
        assert_eq!(
            user_pattern(CacheCategory::Following, &user),
            "following:user:3fa85f64-5717-4562-b3fc-2c963f66afa6:*"
        );
    }

    #[rstest]
    #[case("following", CacheCategory::Following)]
    #[case("followers_count", CacheCategory::FollowersCount)]
    #[case("social_stats", CacheCategory::SocialStats)]
    fn category_parses_from_prefix(#[case] raw: &str, #[case] expected: CacheCategory) {
        assert_eq!(raw.parse::<CacheCategory>(), Ok(expected));
    }

    #[rstest]
    fn unknown_category_is_rejected() {
        assert_eq!(
            "sessions".parse::<CacheCategory>(),
            Err(ParseCacheCategoryError)
        );
    }

    #[rstest]
    fn social_stats_expire_soonest() {
        let stats_ttl = CacheCategory::SocialStats.ttl();
        for category in CacheCategory::ALL {
            assert!(stats_ttl <= category.ttl());
        }
    }
}
