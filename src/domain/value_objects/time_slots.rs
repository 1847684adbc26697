use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_SLOT_HOURS: i64 = 24;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimeSlotError {
    #[error("time slot must end after it starts")]
    EndNotAfterStart,
    #[error("time slot must not be longer than {MAX_SLOT_HOURS} hours")]
    TooLong,
}

/// Validated booking interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<Self, TimeSlotError> {
        if ends_at <= starts_at {
            return Err(TimeSlotError::EndNotAfterStart);
        }
        if ends_at - starts_at > Duration::hours(MAX_SLOT_HOURS) {
            return Err(TimeSlotError::TooLong);
        }
        Ok(Self { starts_at, ends_at })
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn duration(&self) -> Duration {
        self.ends_at - self.starts_at
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start_hour: i64, end_hour: i64) -> TimeSlot {
        let base = Utc::now();
        TimeSlot::new(
            base + Duration::hours(start_hour),
            base + Duration::hours(end_hour),
        )
        .unwrap()
    }

    #[test]
    fn rejects_inverted_and_empty_slots() {
        let now = Utc::now();
        assert_eq!(
            TimeSlot::new(now, now),
            Err(TimeSlotError::EndNotAfterStart)
        );
        assert_eq!(
            TimeSlot::new(now, now - Duration::minutes(1)),
            Err(TimeSlotError::EndNotAfterStart)
        );
    }

    #[test]
    fn rejects_slots_longer_than_a_day() {
        let now = Utc::now();
        assert_eq!(
            TimeSlot::new(now, now + Duration::hours(25)),
            Err(TimeSlotError::TooLong)
        );
    }

    #[test]
    fn overlap_detection() {
        assert!(slot(0, 2).overlaps(&slot(1, 3)));
        assert!(!slot(0, 2).overlaps(&slot(2, 4)));
        assert!(slot(0, 4).overlaps(&slot(1, 2)));
    }
}
