//! Working-day calendar
//!
//! A date is a working day iff it falls Monday through Friday and is not a
//! configured holiday. Holiday sets are immutable once a `Calendar` is built.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

use crate::ConfigError;

/// Fixed set of holidays keyed by date, each with a display name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolidaySet {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a holiday set from `YYYY-MM-DD` keys
    pub fn from_iso_map<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, name) in entries {
            let key = key.as_ref().trim();
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidHolidayDate(key.to_string()))?;
            set.insert(date, name);
        }
        Ok(set)
    }

    pub fn insert(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.days.insert(date, name.into());
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.days.iter().map(|(d, n)| (*d, n.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(NaiveDate, S)> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, S)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (date, name) in iter {
            set.insert(date, name);
        }
        set
    }
}

/// Monday-to-Friday calendar with a holiday exclusion set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calendar {
    holidays: HolidaySet,
}

impl Calendar {
    pub fn new(holidays: HolidaySet) -> Self {
        Self { holidays }
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Check if a date is a working day
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.holidays.contains(date)
    }

    /// First working day on or after `date`.
    ///
    /// Returns `None` only when the search runs past the last representable date.
    pub fn roll_forward(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        while !self.is_working_day(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// First working day strictly after `date`
    pub fn next_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.roll_forward(date.succ_opt()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar_with(days: &[NaiveDate]) -> Calendar {
        Calendar::new(days.iter().map(|d| (*d, "holiday")).collect())
    }

    #[test]
    fn weekdays_are_working_days() {
        let cal = Calendar::default();
        // 2025-02-03 is a Monday
        for offset in 0..5 {
            let day = date(2025, 2, 3) + chrono::Duration::days(offset);
            assert!(cal.is_working_day(day), "{} should be a working day", day);
        }
    }

    #[test]
    fn weekends_are_not_working_days() {
        let cal = Calendar::default();
        assert!(!cal.is_working_day(date(2025, 2, 1)));
        assert!(!cal.is_working_day(date(2025, 2, 2)));
    }

    #[test]
    fn holiday_on_weekday_is_not_working() {
        let cal = calendar_with(&[date(2025, 5, 1)]);
        // Thursday
        assert!(!cal.is_working_day(date(2025, 5, 1)));
        assert!(cal.is_working_day(date(2025, 5, 2)));
    }

    #[test]
    fn far_dates_are_handled() {
        let cal = Calendar::default();
        // 1900-01-01 was a Monday, 2999-12-31 is a Tuesday
        assert!(cal.is_working_day(date(1900, 1, 1)));
        assert!(cal.is_working_day(date(2999, 12, 31)));
    }

    #[test]
    fn roll_forward_keeps_working_day() {
        let cal = Calendar::default();
        assert_eq!(cal.roll_forward(date(2025, 2, 5)), Some(date(2025, 2, 5)));
    }

    #[test]
    fn roll_forward_skips_weekend_and_holiday() {
        // Fri 2025-07-25, Mon 28 and Tue 29 are holidays
        let cal = calendar_with(&[date(2025, 7, 28), date(2025, 7, 29)]);
        assert_eq!(cal.roll_forward(date(2025, 7, 26)), Some(date(2025, 7, 30)));
        assert_eq!(cal.next_working_day(date(2025, 7, 25)), Some(date(2025, 7, 30)));
    }

    #[test]
    fn roll_forward_at_end_of_time() {
        let cal = Calendar::default();
        let last = NaiveDate::MAX;
        if Calendar::is_weekend(last) {
            assert_eq!(cal.roll_forward(last), None);
        }
        assert_eq!(cal.next_working_day(last), None);
    }

    #[test]
    fn holiday_set_from_iso_map() {
        let set = HolidaySet::from_iso_map([("2025-12-25", "Christmas"), (" 2025-01-01 ", "New Year")])
            .unwrap();
        assert_eq!(set.len(), 2);
        let ordered: Vec<_> = set.iter().collect();
        assert_eq!(
            ordered,
            vec![(date(2025, 1, 1), "New Year"), (date(2025, 12, 25), "Christmas")]
        );
    }

    #[test]
    fn holiday_set_rejects_bad_key() {
        let err = HolidaySet::from_iso_map([("25/12/2025", "Christmas")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHolidayDate(ref k) if k == "25/12/2025"));
    }
}
