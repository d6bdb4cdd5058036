//! Sleep record entity and state transitions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

use super::SleepValidationError;

/// Smallest plausible completed session, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 1;
/// Largest plausible completed session, in minutes (24 hours).
pub const MAX_DURATION_MINUTES: i64 = 1440;

/// Lifecycle state of a sleep record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    /// Bedtime recorded, wake time still open.
    Active,
    /// Wake time recorded and duration derived; immutable thereafter.
    Completed,
}

/// Input payload for [`SleepRecord::new`].
#[derive(Debug, Clone)]
pub struct SleepRecordDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub bedtime: DateTime<Utc>,
    pub wake_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A persisted sleep session.
///
/// Construction always runs the draft validation, so an instance either
/// represents an active session (`wake_time` and `duration_minutes` both
/// `None`) or a completed one with a duration inside the plausible bounds.
///
/// # Examples
///
/// ```rust,ignore
/// # let draft = sample_sleep_record_draft()?;
/// let record = drowse::domain::SleepRecord::new(draft)?;
/// assert_eq!(record.state(), drowse::domain::SleepState::Active);
/// Ok::<(), drowse::domain::SleepValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SleepRecord {
    pub(super) id: Uuid,
    pub(super) user_id: UserId,
    pub(super) bedtime: DateTime<Utc>,
    pub(super) wake_time: Option<DateTime<Utc>>,
    pub(super) duration_minutes: Option<i64>,
    pub(super) created_at: DateTime<Utc>,
}

impl SleepRecord {
    /// Creates a validated sleep record.
    pub fn new(draft: SleepRecordDraft) -> Result<Self, SleepValidationError> {
        Self::try_from(draft)
    }

    /// Returns the record id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the owning user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the bedtime.
    pub fn bedtime(&self) -> DateTime<Utc> {
        self.bedtime
    }

    /// Returns the wake time, when the session has completed.
    pub fn wake_time(&self) -> Option<DateTime<Utc>> {
        self.wake_time
    }

    /// Returns the derived duration in minutes, when completed.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
    }

    /// Returns the record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SleepState {
        if self.wake_time.is_some() {
            SleepState::Completed
        } else {
            SleepState::Active
        }
    }

    /// Whether the session is still open.
    pub fn is_active(&self) -> bool {
        self.state() == SleepState::Active
    }

    /// Completes the session at `wake_time`, deriving the duration.
    ///
    /// Allowed only from the active state; the wake time must lie strictly
    /// after the bedtime and the derived duration inside the plausible
    /// bounds.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// # let record = sample_active_record()?;
    /// let completed = record.clock_out(record.bedtime() + chrono::Duration::minutes(450))?;
    /// assert_eq!(completed.duration_minutes(), Some(450));
    /// Ok::<(), drowse::domain::SleepValidationError>(())
    /// ```
    pub fn clock_out(self, wake_time: DateTime<Utc>) -> Result<Self, SleepValidationError> {
        if self.wake_time.is_some() {
            return Err(SleepValidationError::AlreadyCompleted);
        }

        Self::new(SleepRecordDraft {
            id: self.id,
            user_id: self.user_id,
            bedtime: self.bedtime,
            wake_time: Some(wake_time),
            created_at: self.created_at,
        })
    }

    /// Whether a new session starting at `bedtime` would overlap this one.
    ///
    /// A conflict exists when this record began no later than the candidate
    /// bedtime and either never ended or ended after it. Callers check the
    /// symmetric direction by querying records ordered around the candidate.
    pub fn conflicts_with(&self, bedtime: DateTime<Utc>) -> bool {
        self.bedtime <= bedtime
            && self
                .wake_time
                .map_or(true, |wake_time| wake_time > bedtime)
    }
}
