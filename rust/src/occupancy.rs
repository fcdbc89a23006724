//! Occupied-day tracking with sorted, non-overlapping busy periods.

use chrono::{Days, NaiveDate};

use crate::calendar::WorkCalendar;

/// Days already covered by allocated schedules.
///
/// Invariant: `busy_periods` is sorted by start and contains no overlapping or
/// adjacent periods, so lookups are binary searches.
#[derive(Clone, Debug, Default)]
pub struct OccupancyTracker {
    /// Sorted list of (start, end) busy periods (inclusive dates)
    busy_periods: Vec<(NaiveDate, NaiveDate)>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn busy_periods(&self) -> &[(NaiveDate, NaiveDate)] {
        &self.busy_periods
    }

    /// Mark `[start, end]` occupied, merging with overlapping or adjacent periods.
    pub fn add_busy_period(&mut self, start: NaiveDate, end: NaiveDate) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };

        let idx = self.busy_periods.partition_point(|(s, _)| *s < start);

        let mut new_start = start;
        let mut new_end = end;
        let mut merge_start = idx;
        let mut merge_end = idx;

        if idx > 0 {
            let (prev_start, prev_end) = self.busy_periods[idx - 1];
            if prev_end >= start.checked_sub_days(Days::new(1)).unwrap_or(start) {
                new_start = prev_start;
                new_end = new_end.max(prev_end);
                merge_start = idx - 1;
            }
        }

        while merge_end < self.busy_periods.len() {
            let (next_start, next_end) = self.busy_periods[merge_end];
            if next_start <= new_end.checked_add_days(Days::new(1)).unwrap_or(new_end) {
                new_end = new_end.max(next_end);
                merge_end += 1;
            } else {
                break;
            }
        }

        self.busy_periods.drain(merge_start..merge_end);
        self.busy_periods.insert(merge_start, (new_start, new_end));
    }

    pub fn is_busy(&self, date: NaiveDate) -> bool {
        // Leftmost period whose end is not before `date`
        let idx = self.busy_periods.partition_point(|(_, end)| *end < date);
        self.busy_periods
            .get(idx)
            .is_some_and(|(start, _)| *start <= date)
    }

    /// First run of `length` consecutive free work days inside `[from, until]`.
    ///
    /// Returns the first and last day of the run.
    pub fn find_free_run(
        &self,
        calendar: &WorkCalendar,
        from: NaiveDate,
        until: NaiveDate,
        length: u32,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let length = length.max(1);
        let mut run_start: Option<NaiveDate> = None;
        let mut run_len = 0;

        for day in calendar.work_days_between(from, until) {
            if self.is_busy(day) {
                run_start = None;
                run_len = 0;
                continue;
            }
            let start = *run_start.get_or_insert(day);
            run_len += 1;
            if run_len == length {
                return Some((start, day));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidayCalendar;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn weekdays() -> WorkCalendar {
        WorkCalendar::new(HolidayCalendar::default(), true, true)
    }

    #[test]
    fn test_empty_tracker_is_free() {
        let tracker = OccupancyTracker::new();
        assert!(!tracker.is_busy(d(2025, 3, 3)));
    }

    #[test]
    fn test_is_busy_inside_and_outside() {
        let mut tracker = OccupancyTracker::new();
        tracker.add_busy_period(d(2025, 3, 10), d(2025, 3, 12));
        assert!(!tracker.is_busy(d(2025, 3, 9)));
        assert!(tracker.is_busy(d(2025, 3, 10)));
        assert!(tracker.is_busy(d(2025, 3, 12)));
        assert!(!tracker.is_busy(d(2025, 3, 13)));
    }

    #[test]
    fn test_adjacent_periods_merge() {
        let mut tracker = OccupancyTracker::new();
        tracker.add_busy_period(d(2025, 3, 10), d(2025, 3, 12));
        tracker.add_busy_period(d(2025, 3, 13), d(2025, 3, 14));
        assert_eq!(tracker.busy_periods(), &[(d(2025, 3, 10), d(2025, 3, 14))]);
    }

    #[test]
    fn test_overlapping_and_separate_periods() {
        let mut tracker = OccupancyTracker::new();
        tracker.add_busy_period(d(2025, 3, 20), d(2025, 3, 25));
        tracker.add_busy_period(d(2025, 3, 3), d(2025, 3, 5));
        tracker.add_busy_period(d(2025, 3, 4), d(2025, 3, 7));
        assert_eq!(
            tracker.busy_periods(),
            &[(d(2025, 3, 3), d(2025, 3, 7)), (d(2025, 3, 20), d(2025, 3, 25))]
        );
        // Bridge both periods
        tracker.add_busy_period(d(2025, 3, 8), d(2025, 3, 19));
        assert_eq!(tracker.busy_periods(), &[(d(2025, 3, 3), d(2025, 3, 25))]);
    }

    #[test]
    fn test_find_free_run_skips_busy_days() {
        let mut tracker = OccupancyTracker::new();
        // Mon-Wed busy
        tracker.add_busy_period(d(2025, 3, 3), d(2025, 3, 5));
        let run = tracker.find_free_run(&weekdays(), d(2025, 3, 3), d(2025, 3, 14), 2);
        assert_eq!(run, Some((d(2025, 3, 6), d(2025, 3, 7))));
    }

    #[test]
    fn test_find_free_run_spans_weekend() {
        let mut tracker = OccupancyTracker::new();
        tracker.add_busy_period(d(2025, 3, 3), d(2025, 3, 6));
        // Fri + Mon are consecutive work days
        let run = tracker.find_free_run(&weekdays(), d(2025, 3, 3), d(2025, 3, 14), 2);
        assert_eq!(run, Some((d(2025, 3, 7), d(2025, 3, 10))));
    }

    #[test]
    fn test_find_free_run_none_when_window_full() {
        let mut tracker = OccupancyTracker::new();
        tracker.add_busy_period(d(2025, 3, 3), d(2025, 3, 7));
        assert_eq!(
            tracker.find_free_run(&weekdays(), d(2025, 3, 3), d(2025, 3, 7), 1),
            None
        );
    }
}
