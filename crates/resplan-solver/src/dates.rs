//! Working-Date Calculator
//!
//! Turns a base date and an effort in hours into the span of working days a
//! task occupies.
//!
//! # Algorithm
//!
//! 1. Roll the base date forward to the first working day (`start`)
//! 2. `days = max(1, ceil(hours / 8))`
//! 3. Advance `days - 1` working days from `start` (`end`)
//!
//! Rolling is always forward, never backward, so `end >= start` holds.

use chrono::NaiveDate;
use resplan_core::{Calendar, DateSpan};

/// Working hours in one day
pub const HOURS_PER_DAY: f64 = 8.0;

/// Longest span a single task may cover, in working days (about ten years)
pub const MAX_WORKING_DAYS: i64 = 2_600;

/// Number of working days needed for `hours` of effort, at least one.
///
/// Returns `None` for non-positive or non-finite hours, and for efforts longer
/// than `MAX_WORKING_DAYS`.
pub fn working_days_for(hours: f64) -> Option<i64> {
    if !hours.is_finite() || hours <= 0.0 {
        return None;
    }
    let days = (hours / HOURS_PER_DAY).ceil();
    if days > MAX_WORKING_DAYS as f64 {
        return None;
    }
    Some((days as i64).max(1))
}

/// Compute the working span for a task.
///
/// Returns `None` when there is no base date, when the hours yield no working
/// days, or when the span would run past the last representable date.
pub fn compute_dates(calendar: &Calendar, base: Option<NaiveDate>, hours: f64) -> Option<DateSpan> {
    let base = base?;
    let days = working_days_for(hours)?;

    let start = calendar.roll_forward(base)?;
    let end = add_working_days(calendar, start, days - 1)?;

    Some(DateSpan::new(start, end))
}

/// Add working days to a date (no-op for zero or negative counts)
pub fn add_working_days(calendar: &Calendar, from: NaiveDate, days: i64) -> Option<NaiveDate> {
    let mut current = from;
    for _ in 0..days.max(0) {
        current = calendar.next_working_day(current)?;
    }
    Some(current)
}

/// Count working days in an inclusive range
pub fn count_working_days(calendar: &Calendar, span: DateSpan) -> i64 {
    let mut count = 0;
    let mut current = span.start;
    while current <= span.end {
        if calendar.is_working_day(current) {
            count += 1;
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};
    use resplan_core::HolidaySet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_test_calendar() -> Calendar {
        let holidays: HolidaySet = [
            (date(2025, 5, 1), "Labour Day"),
            (date(2025, 7, 28), "Independence Day"),
            (date(2025, 7, 29), "National Holiday"),
        ]
        .into_iter()
        .collect();
        Calendar::new(holidays)
    }

    #[test]
    fn working_days_round_up_with_minimum_one() {
        assert_eq!(working_days_for(0.5), Some(1));
        assert_eq!(working_days_for(8.0), Some(1));
        assert_eq!(working_days_for(8.1), Some(2));
        assert_eq!(working_days_for(40.0), Some(5));
        assert_eq!(working_days_for(0.0), None);
        assert_eq!(working_days_for(-4.0), None);
        assert_eq!(working_days_for(f64::NAN), None);
        assert_eq!(working_days_for(f64::INFINITY), None);
    }

    #[test]
    fn oversized_effort_is_rejected() {
        let limit = MAX_WORKING_DAYS as f64 * HOURS_PER_DAY;
        assert_eq!(working_days_for(limit), Some(MAX_WORKING_DAYS));
        assert_eq!(working_days_for(limit + 1.0), None);
        assert_eq!(working_days_for(1e12), None);

        let cal = make_test_calendar();
        assert_eq!(compute_dates(&cal, Some(date(2025, 3, 3)), 1e12), None);
    }

    #[test]
    fn saturday_eight_hours_lands_on_monday() {
        let cal = make_test_calendar();
        let span = compute_dates(&cal, Some(date(2025, 3, 1)), 8.0).unwrap();
        assert_eq!(span.start, date(2025, 3, 3));
        assert_eq!(span.end, date(2025, 3, 3));
        assert_eq!(span.start.weekday(), Weekday::Mon);
    }

    #[test]
    fn forty_hours_from_monday_ends_friday() {
        let cal = make_test_calendar();
        let span = compute_dates(&cal, Some(date(2025, 3, 3)), 40.0).unwrap();
        assert_eq!(span.start, date(2025, 3, 3));
        assert_eq!(span.end, date(2025, 3, 7));
    }

    #[test]
    fn base_before_holiday_skips_it() {
        let cal = make_test_calendar();
        // Wednesday 2025-04-30, next day is Labour Day: start stays on the base date
        let span = compute_dates(&cal, Some(date(2025, 4, 30)), 16.0).unwrap();
        assert_eq!(span.start, date(2025, 4, 30));
        assert_eq!(span.end, date(2025, 5, 2));

        // Base on the holiday itself rolls to the next working day
        let span = compute_dates(&cal, Some(date(2025, 5, 1)), 8.0).unwrap();
        assert_eq!(span.start, date(2025, 5, 2));
    }

    #[test]
    fn holiday_next_to_weekend_rolls_past_both() {
        let cal = make_test_calendar();
        // Saturday 2025-07-26, then Sunday, then two holidays
        let span = compute_dates(&cal, Some(date(2025, 7, 26)), 8.0).unwrap();
        assert_eq!(span.start, date(2025, 7, 30));
        assert_eq!(span.end, date(2025, 7, 30));
    }

    #[test]
    fn span_crosses_weekend_and_holidays() {
        let cal = make_test_calendar();
        // Friday 2025-07-25, 3 days: Fri, (Sat, Sun, Mon hol, Tue hol) Wed, Thu
        let span = compute_dates(&cal, Some(date(2025, 7, 25)), 24.0).unwrap();
        assert_eq!(span.start, date(2025, 7, 25));
        assert_eq!(span.end, date(2025, 7, 31));
        assert_eq!(count_working_days(&cal, span), 3);
    }

    #[test]
    fn missing_base_or_hours_yield_none() {
        let cal = make_test_calendar();
        assert_eq!(compute_dates(&cal, None, 8.0), None);
        assert_eq!(compute_dates(&cal, Some(date(2025, 3, 3)), 0.0), None);
        assert_eq!(compute_dates(&cal, Some(date(2025, 3, 3)), -8.0), None);
    }

    #[test]
    fn start_never_after_end() {
        let cal = make_test_calendar();
        let mut base = date(2025, 1, 1);
        for hours in [0.1, 7.9, 8.0, 9.0, 23.0, 80.0, 200.0] {
            for _ in 0..60 {
                let span = compute_dates(&cal, Some(base), hours).unwrap();
                assert!(span.start <= span.end);
                assert!(span.start >= base);
                assert!(cal.is_working_day(span.start));
                assert!(cal.is_working_day(span.end));
                assert_eq!(count_working_days(&cal, span), working_days_for(hours).unwrap());
                base = base.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn compute_dates_is_idempotent() {
        let cal = make_test_calendar();
        let a = compute_dates(&cal, Some(date(2025, 7, 24)), 36.0);
        let b = compute_dates(&cal, Some(date(2025, 7, 24)), 36.0);
        assert_eq!(a, b);
    }

    #[test]
    fn add_working_days_skips_weekends_and_ignores_non_positive_counts() {
        let cal = make_test_calendar();
        let monday = date(2025, 3, 3);
        assert_eq!(add_working_days(&cal, monday, 0), Some(monday));
        assert_eq!(add_working_days(&cal, monday, -3), Some(monday));
        assert_eq!(add_working_days(&cal, monday, 5), Some(date(2025, 3, 10)));
    }

    #[test]
    fn span_past_end_of_time_is_none() {
        let cal = Calendar::default();
        let near_end = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(compute_dates(&cal, Some(near_end), 80.0), None);
    }
}
