//! Sleep record validation and conversion helpers.

use super::{
    MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, SleepRecord, SleepRecordDraft,
    SleepValidationError,
};

impl TryFrom<SleepRecordDraft> for SleepRecord {
    type Error = SleepValidationError;

    fn try_from(value: SleepRecordDraft) -> Result<Self, Self::Error> {
        let duration_minutes = value
            .wake_time
            .map(|wake_time| {
                if wake_time <= value.bedtime {
                    return Err(SleepValidationError::WakeNotAfterBedtime);
                }
                let minutes = (wake_time - value.bedtime).num_minutes();
                if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
                    return Err(SleepValidationError::DurationOutOfBounds { minutes });
                }
                Ok(minutes)
            })
            .transpose()?;

        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            bedtime: value.bedtime,
            wake_time: value.wake_time,
            duration_minutes,
            created_at: value.created_at,
        })
    }
}
