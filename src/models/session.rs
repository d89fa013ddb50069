use crate::utils::time::{decimal_hours, elapsed_minutes};
use chrono::DateTime;
use chrono_tz::Tz;

/// An unfinished work period. At most one exists at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSession {
    pub start_time: DateTime<Tz>,
}

/// A work period closed by a clock-out, ready to be written to the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSession {
    pub start_time: DateTime<Tz>,
    pub end_time: DateTime<Tz>,
}

impl OpenSession {
    pub fn new(start_time: DateTime<Tz>) -> Self {
        Self { start_time }
    }

    pub fn close(self, end_time: DateTime<Tz>) -> ClosedSession {
        ClosedSession {
            start_time: self.start_time,
            end_time,
        }
    }
}

impl ClosedSession {
    pub fn minutes(&self) -> i64 {
        elapsed_minutes(&self.start_time, &self.end_time)
    }

    /// Duration in hours, two decimals
    pub fn hours(&self) -> f64 {
        decimal_hours(self.minutes())
    }
}
