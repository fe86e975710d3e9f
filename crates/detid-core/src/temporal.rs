//! # Temporal Keys — Linear Tick Counts
//!
//! Defines `Ticks`, the locale-free representation of an instant used
//! wherever a date/time contributes to a deterministic key.
//!
//! ## Invariant
//!
//! A tick is 100 nanoseconds. `Ticks(0)` is `0001-01-01T00:00:00Z`
//! (proleptic Gregorian). Only UTC instants are accepted, so the same
//! instant always yields the same count regardless of the offset or
//! calendar text it was written in. Sub-tick precision is truncated.
//!
//! The count is an `i128`, so every instant chrono can represent has its
//! own tick count. An `i64` would run out near year 29,000.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i128 = 10_000_000;

/// Tick count of the Unix epoch, `1970-01-01T00:00:00Z`.
pub const UNIX_EPOCH_TICKS: i128 = 621_355_968_000_000_000;

/// A count of 100 ns intervals since `0001-01-01T00:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticks(pub i128);

impl Ticks {
    /// Tick count of a UTC instant.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        let secs = i128::from(dt.timestamp());
        let sub = i128::from(dt.timestamp_subsec_nanos() / 100);
        Self(secs * TICKS_PER_SECOND + sub + UNIX_EPOCH_TICKS)
    }

    /// The UTC instant this tick count denotes, if chrono can represent it.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let since_epoch = self.0.checked_sub(UNIX_EPOCH_TICKS)?;
        let secs = i64::try_from(since_epoch.div_euclid(TICKS_PER_SECOND)).ok()?;
        let nanos = u32::try_from(since_epoch.rem_euclid(TICKS_PER_SECOND) * 100).ok()?;
        DateTime::from_timestamp(secs, nanos)
    }

    /// The raw tick count.
    pub fn get(self) -> i128 {
        self.0
    }
}

impl From<DateTime<Utc>> for Ticks {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(&dt)
    }
}

impl std::fmt::Display for Ticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
