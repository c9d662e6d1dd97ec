//! Calendar date range handling for time-series queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::remote::error::{ServiceError, ServiceResult};

/// A validated half-open calendar date range `[start, end)`.
///
/// Construction enforces `start < end`; an invalid range is rejected before
/// any remote request is issued. The dashboard's default range covers the
/// 2019 Rabi-season study window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new date range, rejecting `start >= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> ServiceResult<Self> {
        if start >= end {
            return Err(ServiceError::invalid_range(format!(
                "end date must be after start date (got {} .. {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// The dashboard's default analysis window: 2019-01-01 to 2019-05-31.
    pub fn dashboard_default() -> Self {
        // Both dates are valid and ordered, so this cannot fail.
        Self {
            start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2019, 5, 31).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
