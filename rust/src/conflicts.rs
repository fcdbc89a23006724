//! Capacity checks over the project window and the produced schedules.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::WorkCalendar;
use crate::config::SchedulingOptions;
use crate::models::{SchedulingWarning, Severity, TaskInput, TaskSchedule, WarningType};

/// More overallocated days than this escalates the warning to `High`.
const OVERALLOCATION_HIGH_DAYS: usize = 5;

/// Required versus available work days for a task list.
#[derive(Clone, Debug, PartialEq)]
pub struct Utilization {
    pub required_days: u32,
    pub available_days: u32,
    /// Unclamped percentage; infinite when work is required but no day is available.
    pub rate: f64,
}

impl Utilization {
    pub fn compute(tasks: &[TaskInput], options: &SchedulingOptions, calendar: &WorkCalendar) -> Self {
        let total_hours: f64 = tasks.iter().map(TaskInput::effective_hours).sum();
        let required_days = options.hours_to_work_days(total_hours);
        let available_days =
            calendar.calculate_work_days(options.project_start_date, options.project_end_date);
        let rate = match (required_days, available_days) {
            (0, _) => 0.0,
            (_, 0) => f64::INFINITY,
            (required, available) => f64::from(required) / f64::from(available) * 100.0,
        };
        Self {
            required_days,
            available_days,
            rate,
        }
    }

    /// Rate as reported in results: clamped to 0-100.
    pub fn clamped_rate(&self) -> f64 {
        self.rate.clamp(0.0, 100.0)
    }

    /// Tight-schedule warning when utilization exceeds the configured threshold.
    pub fn warning(&self, tight_schedule_threshold: f64) -> Option<SchedulingWarning> {
        if self.rate <= tight_schedule_threshold * 100.0 {
            return None;
        }
        let severity = if self.rate > 100.0 {
            Severity::Critical
        } else {
            Severity::High
        };
        let message = if self.rate.is_finite() {
            format!(
                "Tasks need {} work days but only {} are available ({:.0}% utilization)",
                self.required_days, self.available_days, self.rate
            )
        } else {
            format!(
                "Tasks need {} work days but the project window has no work days",
                self.required_days
            )
        };
        Some(SchedulingWarning::new(
            WarningType::TightSchedule,
            severity,
            message,
        ))
    }
}

/// Number of schedules covering each work day.
pub fn daily_load(schedules: &[TaskSchedule], calendar: &WorkCalendar) -> BTreeMap<NaiveDate, u32> {
    let mut load: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for schedule in schedules {
        for day in calendar.work_days_between(schedule.start_date, schedule.due_date) {
            *load.entry(day).or_insert(0) += 1;
        }
    }
    load
}

/// Overallocation warning when any work day carries more than `parallel_task_limit` tasks.
pub fn detect_overallocation(
    schedules: &[TaskSchedule],
    calendar: &WorkCalendar,
    parallel_task_limit: u32,
) -> Option<SchedulingWarning> {
    let load = daily_load(schedules, calendar);
    let overloaded: Vec<(&NaiveDate, &u32)> = load
        .iter()
        .filter(|(_, count)| **count > parallel_task_limit)
        .collect();

    let (peak_day, peak) = overloaded
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(day, count)| (**day, **count))?;

    let severity = if overloaded.len() > OVERALLOCATION_HIGH_DAYS {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(SchedulingWarning::new(
        WarningType::Overallocation,
        severity,
        format!(
            "{} work day(s) have more than {} tasks in progress (peak {} on {})",
            overloaded.len(),
            parallel_task_limit,
            peak,
            peak_day
        ),
    ))
}
