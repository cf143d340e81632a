//! Inclusive calendar-date windows.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An inclusive range of calendar dates. The window spans from the start
/// date at 00:00:00.000 to the end date at 23:59:59.999; timestamps are
/// compared as-is, with no timezone normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Single-day window.
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn end_bound(&self) -> NaiveDateTime {
        self.end.and_time(end_of_day())
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start_bound() && ts <= self.end_bound()
    }

    /// Number of days covered, inclusive of both bounds. Never less than 1,
    /// even for inverted inputs.
    pub fn day_span(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(1)
    }

    /// The window of equal length immediately before this one.
    pub fn previous(&self) -> DateWindow {
        let shift = Duration::days(self.day_span());
        DateWindow {
            start: self.start - shift,
            end: self.end - shift,
        }
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_cover_full_days() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(window.start_bound(), date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            window.end_bound(),
            date(2024, 1, 2).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn contains_is_inclusive_at_both_edges() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 2));
        assert!(window.contains(window.start_bound()));
        assert!(window.contains(window.end_bound()));
        assert!(!window.contains(date(2023, 12, 31).and_hms_milli_opt(23, 59, 59, 999).unwrap()));
        assert!(!window.contains(date(2024, 1, 3).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn day_span_counts_both_endpoints() {
        assert_eq!(DateWindow::day(date(2024, 1, 1)).day_span(), 1);
        assert_eq!(DateWindow::new(date(2024, 1, 1), date(2024, 1, 2)).day_span(), 2);
        assert_eq!(DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).day_span(), 31);
    }

    #[test]
    fn day_span_clamps_inverted_windows() {
        assert_eq!(DateWindow::new(date(2024, 1, 10), date(2024, 1, 1)).day_span(), 1);
    }

    #[test]
    fn previous_shifts_back_by_span() {
        let window = DateWindow::new(date(2024, 1, 8), date(2024, 1, 14));
        let previous = window.previous();
        assert_eq!(previous, DateWindow::new(date(2024, 1, 1), date(2024, 1, 7)));
    }

    #[test]
    fn previous_of_single_day_is_the_day_before() {
        let window = DateWindow::day(date(2024, 3, 1));
        assert_eq!(window.previous(), DateWindow::day(date(2024, 2, 29)));
    }
}
