//! Report schedule
//!
//! Boundaries are multiples of the period since the Unix epoch, so a
//! 3600-second period fires at the top of every hour.

use crate::error::DomainError;
use chrono::{DateTime, Duration, Utc};

const MAX_PERIOD_SECS: i64 = 86_400;

/// Recurring, epoch-aligned report cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    period_secs: i64,
}

impl ReportSchedule {
    /// Create a schedule firing every `period_secs` seconds
    pub fn new(period_secs: i64) -> Result<Self, DomainError> {
        if !(1..=MAX_PERIOD_SECS).contains(&period_secs) {
            return Err(DomainError::InvalidInterval(period_secs));
        }
        Ok(Self { period_secs })
    }

    /// Top of every hour
    #[must_use]
    pub fn hourly() -> Self {
        Self { period_secs: 3600 }
    }

    pub fn period(&self) -> Duration {
        Duration::seconds(self.period_secs)
    }

    /// First boundary strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let into_period = Duration::seconds(now.timestamp().rem_euclid(self.period_secs))
            + Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos()));
        now - into_period + self.period()
    }

    /// Boundary following one that just fired
    ///
    /// Skips ahead if the loop fell behind, so a late wake-up never fires
    /// more than once for the same boundary.
    pub fn following(&self, fired: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        self.next_after(fired.max(now))
    }
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self::hourly()
    }
}
