//! Tests for date ranges

use chrono::NaiveDate;
use core_kernel::temporal::TemporalError;
use core_kernel::DateRange;
use proptest::prelude::*;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_unbounded_contains_extremes() {
    let range = DateRange::default();
    assert!(range.contains(NaiveDate::MIN));
    assert!(range.contains(NaiveDate::MAX));
    assert_eq!(range, DateRange::unbounded());
}

#[test]
fn test_half_open_constructors() {
    let since = DateRange::starting(ymd(2023, 7, 23));
    assert!(!since.contains(ymd(2023, 7, 22)));
    assert!(since.contains(ymd(2099, 1, 1)));

    let until = DateRange::ending(ymd(2023, 7, 23));
    assert!(until.contains(ymd(1900, 1, 1)));
    assert!(!until.contains(ymd(2023, 7, 24)));
}

#[test]
fn test_single_day_range() {
    let day = ymd(2023, 7, 23);
    let range = DateRange::new(day, day).unwrap();
    assert!(range.contains(day));
    assert_eq!(range.start(), range.end());
}

#[test]
fn test_inverted_range_error_message() {
    let err = DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 1)).unwrap_err();
    assert_eq!(
        err,
        TemporalError::InvertedRange { start: ymd(2024, 1, 2), end: ymd(2024, 1, 1) }
    );
    assert!(err.to_string().contains("2024-01-02"));
}

proptest! {
    #[test]
    fn range_contains_its_bounds(a in 0i32..40_000, b in 0i32..40_000) {
        let base = ymd(1970, 1, 1);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let start = base + chrono::Days::new(lo as u64);
        let end = base + chrono::Days::new(hi as u64);
        let range = DateRange::new(start, end).unwrap();
        prop_assert!(range.contains(start));
        prop_assert!(range.contains(end));
    }
}
