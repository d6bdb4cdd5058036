//! Social feed query specification and projections.
//!
//! The feed is the set of completed sleep records belonging to everyone the
//! requesting user follows, inside a bounded lookback window. The query is
//! modelled as an immutable specification (predicate + sort + page) composed
//! by ordinary function calls; adapters translate it into a single join
//! rather than per-record lookups.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use pagination::{PageInfo, PageParams};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

use super::SleepValidationError;

/// Smallest accepted lookback window, in days.
pub const MIN_WINDOW_DAYS: i64 = 1;
/// Largest accepted lookback window, in days.
pub const MAX_WINDOW_DAYS: i64 = 30;

const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Validated feed lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FeedWindow(i64);

impl FeedWindow {
    /// Validate and construct a lookback window.
    pub fn new(days: i64) -> Result<Self, SleepValidationError> {
        if !(MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(SleepValidationError::WindowOutOfBounds { days });
        }
        Ok(Self(days))
    }

    /// Window length in days.
    pub fn days(&self) -> i64 {
        self.0
    }

    /// The inclusive lower bound of the window relative to `now`.
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.0)
    }
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_DAYS)
    }
}

impl From<FeedWindow> for i64 {
    fn from(value: FeedWindow) -> Self {
        value.0
    }
}

impl TryFrom<i64> for FeedWindow {
    type Error = SleepValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Sort key applied to the feed, always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSortKey {
    /// Longest sessions first.
    #[default]
    Duration,
    /// Most recent bedtimes first.
    Bedtime,
    /// Most recent wake times first.
    WakeTime,
    /// Most recently recorded first.
    CreatedAt,
}

/// Error returned when parsing a feed sort key from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFeedSortKeyError;

impl fmt::Display for FeedSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => f.write_str("duration"),
            Self::Bedtime => f.write_str("bedtime"),
            Self::WakeTime => f.write_str("wake_time"),
            Self::CreatedAt => f.write_str("created_at"),
        }
    }
}

impl fmt::Display for ParseFeedSortKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid feed sort key")
    }
}

impl std::error::Error for ParseFeedSortKeyError {}

impl FromStr for FeedSortKey {
    type Err = ParseFeedSortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "duration" => Ok(Self::Duration),
            "bedtime" => Ok(Self::Bedtime),
            "wake_time" => Ok(Self::WakeTime),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(ParseFeedSortKeyError),
        }
    }
}

impl FeedSortKey {
    /// Parse a sort key, falling back to [`FeedSortKey::Duration`] when the
    /// input is not recognised. Unknown sort keys are tolerated rather than
    /// rejected so stale clients keep working.
    pub fn parse_or_default(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }
}

/// Immutable specification of one feed query.
///
/// Combines the requesting user, the lookback window, the sort key, and the
/// page window. Built once at the boundary and handed unchanged through the
/// service to the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuerySpec {
    user_id: UserId,
    window: FeedWindow,
    sort: FeedSortKey,
    page: PageParams,
}

impl FeedQuerySpec {
    /// Compose a feed query specification from validated parts.
    pub fn new(user_id: UserId, window: FeedWindow, sort: FeedSortKey, page: PageParams) -> Self {
        Self {
            user_id,
            window,
            sort,
            page,
        }
    }

    /// The requesting user whose follow edges scope the feed.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The lookback window.
    pub fn window(&self) -> FeedWindow {
        self.window
    }

    /// The sort key (applied descending).
    pub fn sort(&self) -> FeedSortKey {
        self.sort
    }

    /// The page window.
    pub fn page(&self) -> PageParams {
        self.page
    }

    /// The same specification with a different page window.
    ///
    /// Used by the statistics path, which evaluates the full filtered set
    /// and ignores pagination.
    pub fn with_page(&self, page: PageParams) -> Self {
        Self {
            user_id: self.user_id.clone(),
            window: self.window,
            sort: self.sort,
            page,
        }
    }
}

/// One completed sleep session belonging to a followed user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub record_id: Uuid,
    pub owner_id: UserId,
    pub owner_display_name: String,
    pub bedtime: DateTime<Utc>,
    pub wake_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate statistics over the full filtered feed, not just one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatistics {
    pub record_count: i64,
    pub unique_users: i64,
    pub average_duration_minutes: f64,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub total_sleep_hours: f64,
}

impl FeedStatistics {
    /// Statistics for an empty feed.
    pub fn empty() -> Self {
        Self {
            record_count: 0,
            unique_users: 0,
            average_duration_minutes: 0.0,
            min_duration_minutes: 0,
            max_duration_minutes: 0,
            total_sleep_hours: 0.0,
        }
    }

    /// Derive statistics from an already-filtered entry set.
    ///
    /// Relational adapters push these aggregates into the store; in-memory
    /// adapters and tests share this single definition instead.
    pub fn from_entries(entries: &[FeedEntry]) -> Self {
        if entries.is_empty() {
            return Self::empty();
        }

        let record_count = entries.len() as i64;
        let mut owners: std::collections::HashSet<&UserId> = std::collections::HashSet::new();
        let mut total_minutes: i64 = 0;
        let mut min_minutes = i64::MAX;
        let mut max_minutes = i64::MIN;
        for entry in entries {
            owners.insert(&entry.owner_id);
            total_minutes += entry.duration_minutes;
            min_minutes = min_minutes.min(entry.duration_minutes);
            max_minutes = max_minutes.max(entry.duration_minutes);
        }

        Self {
            record_count,
            unique_users: owners.len() as i64,
            average_duration_minutes: total_minutes as f64 / record_count as f64,
            min_duration_minutes: min_minutes,
            max_duration_minutes: max_minutes,
            total_sleep_hours: total_minutes as f64 / 60.0,
        }
    }
}

/// A fully evaluated feed page: entries, pagination metadata, statistics,
/// and an optional human-readable note for the empty cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub info: PageInfo,
    pub statistics: FeedStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
