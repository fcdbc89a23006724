//! Work-day calendar arithmetic over an injected holiday set.
//!
//! Dates are immutable values: every operation returns a new `NaiveDate`.
//! Day stepping uses `NaiveDate::iter_days`, so arithmetic saturates at
//! `NaiveDate::MAX` instead of wrapping.

use chrono::{Datelike, NaiveDate, Weekday};
use rustc_hash::FxHashSet;

use crate::config::SchedulingOptions;

/// A set of non-working dates supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct HolidayCalendar {
    holidays: FxHashSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// False on Saturday/Sunday (weekends excluded) or on a holiday (holidays excluded).
    pub fn is_work_day(
        &self,
        date: NaiveDate,
        exclude_weekends: bool,
        exclude_holidays: bool,
    ) -> bool {
        if exclude_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !(exclude_holidays && self.contains(date))
    }

    /// Count work days in the inclusive range `[start, end]`.
    pub fn calculate_work_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_weekends: bool,
        exclude_holidays: bool,
    ) -> u32 {
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| self.is_work_day(*date, exclude_weekends, exclude_holidays))
            .count() as u32
    }

    /// Advance `n` work days past `start`; `start` itself is never counted.
    pub fn add_work_days(
        &self,
        start: NaiveDate,
        n: u32,
        exclude_weekends: bool,
        exclude_holidays: bool,
    ) -> NaiveDate {
        if n == 0 {
            return start;
        }
        start
            .iter_days()
            .skip(1)
            .filter(|date| self.is_work_day(*date, exclude_weekends, exclude_holidays))
            .nth(n as usize - 1)
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Holiday set bound to the filters of one scheduling run.
#[derive(Clone, Debug)]
pub struct WorkCalendar {
    holidays: HolidayCalendar,
    exclude_weekends: bool,
    exclude_holidays: bool,
}

impl WorkCalendar {
    pub fn new(holidays: HolidayCalendar, exclude_weekends: bool, exclude_holidays: bool) -> Self {
        Self {
            holidays,
            exclude_weekends,
            exclude_holidays,
        }
    }

    pub fn from_options(options: &SchedulingOptions) -> Self {
        Self::new(
            HolidayCalendar::new(options.holidays.iter().copied()),
            options.exclude_weekends,
            options.exclude_holidays,
        )
    }

    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.holidays
            .is_work_day(date, self.exclude_weekends, self.exclude_holidays)
    }

    pub fn calculate_work_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        self.holidays
            .calculate_work_days(start, end, self.exclude_weekends, self.exclude_holidays)
    }

    pub fn add_work_days(&self, start: NaiveDate, n: u32) -> NaiveDate {
        self.holidays
            .add_work_days(start, n, self.exclude_weekends, self.exclude_holidays)
    }

    /// `date` if it is a work day, otherwise the next work day after it.
    pub fn work_day_on_or_after(&self, date: NaiveDate) -> NaiveDate {
        if self.is_work_day(date) {
            date
        } else {
            self.add_work_days(date, 1)
        }
    }

    /// Latest work day in `[floor, date]`, if there is one.
    pub fn work_day_on_or_before(&self, date: NaiveDate, floor: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        while current >= floor {
            if self.is_work_day(current) {
                return Some(current);
            }
            current = current.pred_opt()?;
        }
        None
    }

    /// Work days in the inclusive range `[start, end]`, in order.
    pub fn work_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        start
            .iter_days()
            .take_while(move |date| *date <= end)
            .filter(move |date| self.is_work_day(*date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    // 2025-03-07 is a Friday, 2025-03-10 the following Monday.

    #[test]
    fn test_weekend_is_not_work_day() {
        let cal = HolidayCalendar::default();
        assert!(cal.is_work_day(d(2025, 3, 7), true, true));
        assert!(!cal.is_work_day(d(2025, 3, 8), true, true));
        assert!(!cal.is_work_day(d(2025, 3, 9), true, true));
        assert!(cal.is_work_day(d(2025, 3, 8), false, true));
    }

    #[test]
    fn test_holiday_filter() {
        let cal = HolidayCalendar::new([d(2025, 3, 5)]);
        assert!(!cal.is_work_day(d(2025, 3, 5), true, true));
        assert!(cal.is_work_day(d(2025, 3, 5), true, false));
        assert_eq!(cal.len(), 1);
    }

    #[test]
    fn test_calculate_work_days_full_week() {
        let cal = HolidayCalendar::default();
        assert_eq!(cal.calculate_work_days(d(2025, 3, 3), d(2025, 3, 9), true, true), 5);
        assert_eq!(cal.calculate_work_days(d(2025, 3, 3), d(2025, 3, 9), false, true), 7);
    }

    #[test]
    fn test_calculate_work_days_with_holiday_and_empty_range() {
        let cal = HolidayCalendar::new([d(2025, 3, 5)]);
        assert_eq!(cal.calculate_work_days(d(2025, 3, 3), d(2025, 3, 9), true, true), 4);
        assert_eq!(cal.calculate_work_days(d(2025, 3, 9), d(2025, 3, 3), true, true), 0);
    }

    #[test]
    fn test_add_work_days_skips_weekend() {
        let cal = HolidayCalendar::default();
        assert_eq!(cal.add_work_days(d(2025, 3, 7), 1, true, true), d(2025, 3, 10));
        assert_eq!(cal.add_work_days(d(2025, 3, 3), 2, true, true), d(2025, 3, 5));
        assert_eq!(cal.add_work_days(d(2025, 3, 7), 0, true, true), d(2025, 3, 7));
    }

    #[test]
    fn test_add_work_days_skips_holiday() {
        let cal = HolidayCalendar::new([d(2025, 3, 10)]);
        assert_eq!(cal.add_work_days(d(2025, 3, 7), 1, true, true), d(2025, 3, 11));
        assert_eq!(cal.add_work_days(d(2025, 3, 7), 1, true, false), d(2025, 3, 10));
    }

    #[test]
    fn test_work_calendar_alignment() {
        let cal = WorkCalendar::new(HolidayCalendar::default(), true, true);
        assert_eq!(cal.work_day_on_or_after(d(2025, 3, 8)), d(2025, 3, 10));
        assert_eq!(cal.work_day_on_or_after(d(2025, 3, 7)), d(2025, 3, 7));
        assert_eq!(
            cal.work_day_on_or_before(d(2025, 3, 9), d(2025, 3, 1)),
            Some(d(2025, 3, 7))
        );
        assert_eq!(cal.work_day_on_or_before(d(2025, 3, 9), d(2025, 3, 8)), None);
    }

    #[test]
    fn test_work_days_between() {
        let cal = WorkCalendar::new(HolidayCalendar::new([d(2025, 3, 4)]), true, true);
        let days: Vec<NaiveDate> = cal.work_days_between(d(2025, 3, 3), d(2025, 3, 10)).collect();
        assert_eq!(
            days,
            vec![d(2025, 3, 3), d(2025, 3, 5), d(2025, 3, 6), d(2025, 3, 7), d(2025, 3, 10)]
        );
    }
}
