//! Sleep session domain types.
//!
//! A sleep record moves through three states: absent (no row), active
//! (bedtime recorded, wake time null), and completed (wake time recorded,
//! duration derived). Completed records are immutable apart from deletion.
//! The feed types model the read side: an immutable query specification plus
//! the entry and statistics projections it produces.

use std::fmt;

mod feed;
mod record;
mod validation;

pub use feed::{
    FeedEntry, FeedPage, FeedQuerySpec, FeedSortKey, FeedStatistics, FeedWindow, MAX_WINDOW_DAYS,
    MIN_WINDOW_DAYS, ParseFeedSortKeyError,
};
pub use record::{
    MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, SleepRecord, SleepRecordDraft, SleepState,
};

/// Validation errors raised by sleep record and feed constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepValidationError {
    /// Wake time is not strictly after the bedtime.
    WakeNotAfterBedtime,
    /// Completed duration falls outside the plausible bounds.
    DurationOutOfBounds { minutes: i64 },
    /// A transition was requested on a record that is already completed.
    AlreadyCompleted,
    /// A completed-only projection was requested on an active record.
    NotCompleted,
    /// Feed lookback window falls outside the accepted range.
    WindowOutOfBounds { days: i64 },
}

impl fmt::Display for SleepValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WakeNotAfterBedtime => {
                write!(f, "wake time must be strictly after bedtime")
            }
            Self::DurationOutOfBounds { minutes } => write!(
                f,
                "sleep duration must be between {MIN_DURATION_MINUTES} minute and \
                 {MAX_DURATION_MINUTES} minutes (got {minutes})"
            ),
            Self::AlreadyCompleted => {
                write!(f, "sleep record is already completed")
            }
            Self::NotCompleted => {
                write!(f, "sleep record has no wake time yet")
            }
            Self::WindowOutOfBounds { days } => write!(
                f,
                "lookback window must be between {MIN_WINDOW_DAYS} and {MAX_WINDOW_DAYS} days \
                 (got {days})"
            ),
        }
    }
}

impl std::error::Error for SleepValidationError {}
