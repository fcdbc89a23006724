//! Configuration types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::SchedulingError;

pub const DEFAULT_WORKING_HOURS_PER_DAY: f64 = 8.0;
pub const DEFAULT_BUFFER_RATIO: f64 = 0.2;
pub const DEFAULT_PARALLEL_TASK_LIMIT: u32 = 3;
pub const DEFAULT_TIGHT_SCHEDULE_THRESHOLD: f64 = 0.8;

/// Project window, calendar filters and heuristics for one scheduling run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOptions {
    /// First day of the project window (inclusive).
    #[pyo3(get, set)]
    pub project_start_date: NaiveDate,
    /// Last day of the project window (inclusive).
    #[pyo3(get, set)]
    pub project_end_date: NaiveDate,
    /// Hours of effort that make up one work day.
    #[pyo3(get, set)]
    #[serde(default = "default_working_hours")]
    pub working_hours_per_day: f64,
    /// Fraction of a task's work days added as contingency (halved on the critical path).
    #[pyo3(get, set)]
    #[serde(default = "default_buffer_ratio")]
    pub buffer_ratio: f64,
    #[pyo3(get, set)]
    #[serde(default = "default_true")]
    pub exclude_weekends: bool,
    #[pyo3(get, set)]
    #[serde(default = "default_true")]
    pub exclude_holidays: bool,
    /// Concurrent tasks allowed on one work day before overallocation is reported.
    #[pyo3(get, set)]
    #[serde(default = "default_parallel_limit")]
    pub parallel_task_limit: u32,
    /// Utilization fraction above which the schedule is reported as tight.
    #[pyo3(get, set)]
    #[serde(default = "default_tight_threshold")]
    pub tight_schedule_threshold: f64,
    /// Non-working dates for this run. Only consulted when `exclude_holidays` is set.
    #[pyo3(get, set)]
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    #[serde(default)]
    pub verbosity: u8,
}

fn default_working_hours() -> f64 {
    DEFAULT_WORKING_HOURS_PER_DAY
}

fn default_buffer_ratio() -> f64 {
    DEFAULT_BUFFER_RATIO
}

fn default_true() -> bool {
    true
}

fn default_parallel_limit() -> u32 {
    DEFAULT_PARALLEL_TASK_LIMIT
}

fn default_tight_threshold() -> f64 {
    DEFAULT_TIGHT_SCHEDULE_THRESHOLD
}

impl SchedulingOptions {
    /// Options for the given window with every other field at its default.
    pub fn new(project_start_date: NaiveDate, project_end_date: NaiveDate) -> Self {
        Self {
            project_start_date,
            project_end_date,
            working_hours_per_day: DEFAULT_WORKING_HOURS_PER_DAY,
            buffer_ratio: DEFAULT_BUFFER_RATIO,
            exclude_weekends: true,
            exclude_holidays: true,
            parallel_task_limit: DEFAULT_PARALLEL_TASK_LIMIT,
            tight_schedule_threshold: DEFAULT_TIGHT_SCHEDULE_THRESHOLD,
            holidays: Vec::new(),
            verbosity: 0,
        }
    }

    /// Reject configurations the engine cannot reason about.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.project_end_date < self.project_start_date {
            return Err(SchedulingError::InvalidDateRange {
                start: self.project_start_date,
                end: self.project_end_date,
            });
        }
        if !self.working_hours_per_day.is_finite() || self.working_hours_per_day <= 0.0 {
            return Err(SchedulingError::InvalidOption(format!(
                "working_hours_per_day must be a positive number, got {}",
                self.working_hours_per_day
            )));
        }
        if !self.buffer_ratio.is_finite() || self.buffer_ratio < 0.0 {
            return Err(SchedulingError::InvalidOption(format!(
                "buffer_ratio must be zero or positive, got {}",
                self.buffer_ratio
            )));
        }
        if !self.tight_schedule_threshold.is_finite() || self.tight_schedule_threshold < 0.0 {
            return Err(SchedulingError::InvalidOption(format!(
                "tight_schedule_threshold must be zero or positive, got {}",
                self.tight_schedule_threshold
            )));
        }
        Ok(())
    }

    /// Convert an effort estimate to whole work days (ceiling division).
    pub fn hours_to_work_days(&self, hours: f64) -> u32 {
        let days = (hours / self.working_hours_per_day).ceil();
        if days <= 0.0 {
            0
        } else {
            days as u32
        }
    }
}

#[pymethods]
impl SchedulingOptions {
    #[new]
    #[pyo3(signature = (
        project_start_date,
        project_end_date,
        working_hours_per_day=None,
        buffer_ratio=None,
        exclude_weekends=None,
        exclude_holidays=None,
        parallel_task_limit=None,
        tight_schedule_threshold=None,
        holidays=None,
        verbosity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        project_start_date: NaiveDate,
        project_end_date: NaiveDate,
        working_hours_per_day: Option<f64>,
        buffer_ratio: Option<f64>,
        exclude_weekends: Option<bool>,
        exclude_holidays: Option<bool>,
        parallel_task_limit: Option<u32>,
        tight_schedule_threshold: Option<f64>,
        holidays: Option<Vec<NaiveDate>>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::new(project_start_date, project_end_date);
        Self {
            working_hours_per_day: working_hours_per_day.unwrap_or(defaults.working_hours_per_day),
            buffer_ratio: buffer_ratio.unwrap_or(defaults.buffer_ratio),
            exclude_weekends: exclude_weekends.unwrap_or(defaults.exclude_weekends),
            exclude_holidays: exclude_holidays.unwrap_or(defaults.exclude_holidays),
            parallel_task_limit: parallel_task_limit.unwrap_or(defaults.parallel_task_limit),
            tight_schedule_threshold: tight_schedule_threshold
                .unwrap_or(defaults.tight_schedule_threshold),
            holidays: holidays.unwrap_or_default(),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            ..defaults
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulingOptions(start={}, end={}, hours_per_day={}, buffer_ratio={}, holidays={})",
            self.project_start_date,
            self.project_end_date,
            self.working_hours_per_day,
            self.buffer_ratio,
            self.holidays.len()
        )
    }
}
