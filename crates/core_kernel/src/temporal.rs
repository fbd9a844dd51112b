//! Date handling for journal queries
//!
//! Journal entries are dated with calendar dates (`NaiveDate`); queries
//! select entries with an inclusive [`DateRange`] whose open ends default to
//! the smallest and largest representable dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a date range
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`
    ///
    /// # Errors
    ///
    /// Returns `TemporalError::InvertedRange` if `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The range covering every representable date
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    /// Everything on or after `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self { start, end: NaiveDate::MAX }
    }

    /// Everything on or before `end`
    pub fn ending(end: NaiveDate) -> Self {
        Self { start: NaiveDate::MIN, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls within the range, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::new(ymd(2023, 7, 1), ymd(2023, 7, 31)).unwrap();
        assert!(range.contains(ymd(2023, 7, 1)));
        assert!(range.contains(ymd(2023, 7, 31)));
        assert!(!range.contains(ymd(2023, 8, 1)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::new(ymd(2023, 8, 1), ymd(2023, 7, 1));
        assert!(matches!(result, Err(TemporalError::InvertedRange { .. })));
    }
}
