use chrono::{DateTime, Utc};
use thiserror::Error;

/// Seconds since the Unix epoch for 0001-01-01T00:00:00Z, the earliest representable reminder
pub const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// Seconds since the Unix epoch for 10000-01-01T00:00:00Z (exclusive upper bound)
pub const MAX_VALID_SECONDS: i64 = 253_402_300_800;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// A point in time in its wire-portable form: whole seconds since the Unix epoch
/// plus a non-negative nanosecond offset into that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is missing")]
    Missing,
    #[error("timestamp of {0} seconds is before 0001-01-01")]
    BeforeMinimum(i64),
    #[error("timestamp of {0} seconds is after 9999-12-31")]
    AfterMaximum(i64),
    #[error("timestamp has {0} nanos, which is outside the range [0, 1e9)")]
    NanosOutOfRange(i32),
}

impl Timestamp {
    /// Verifies the timestamp lies within years 1 through 9999 and carries a valid nanosecond offset
    pub fn validate(&self) -> Result<(), TimestampError> {
        if self.seconds < MIN_VALID_SECONDS {
            return Err(TimestampError::BeforeMinimum(self.seconds));
        }
        if self.seconds >= MAX_VALID_SECONDS {
            return Err(TimestampError::AfterMaximum(self.seconds));
        }
        if !(0..NANOS_PER_SECOND).contains(&self.nanos) {
            return Err(TimestampError::NanosOutOfRange(self.nanos));
        }

        Ok(())
    }

    /// Converts the wire timestamp into the store's native time type
    pub fn to_native(&self) -> Result<DateTime<Utc>, TimestampError> {
        self.validate()?;

        // nanos is known to be non-negative after validation
        DateTime::from_timestamp(self.seconds, self.nanos as u32)
            .ok_or(TimestampError::AfterMaximum(self.seconds))
    }

    /// Converts a native time value read from the store back into wire form
    pub fn from_native(time: &DateTime<Utc>) -> Result<Self, TimestampError> {
        let subsec_nanos = time.timestamp_subsec_nanos();
        let timestamp = Timestamp {
            seconds: time.timestamp(),
            nanos: i32::try_from(subsec_nanos)
                .map_err(|_| TimestampError::NanosOutOfRange(i32::MAX))?,
        };
        timestamp.validate()?;

        Ok(timestamp)
    }
}

/// Converts an optional wire timestamp, treating an absent value as malformed
pub fn require_native(reminder: Option<&Timestamp>) -> Result<DateTime<Utc>, TimestampError> {
    reminder.ok_or(TimestampError::Missing)?.to_native()
}
