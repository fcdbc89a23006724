//! Gantt chart export for schedule results.

use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calendar::WorkCalendar;
use crate::models::TaskSchedule;

/// One row for an external Gantt widget.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub text: String,
    /// YYYY-MM-DD
    #[pyo3(get)]
    pub start_date: String,
    /// YYYY-MM-DD
    #[pyo3(get)]
    pub end_date: String,
    /// Work days in [start_date, end_date].
    #[pyo3(get)]
    pub duration: u32,
    /// Always 0 for a freshly generated schedule.
    #[pyo3(get)]
    pub progress: f64,
    #[serde(rename = "type")]
    #[pyo3(get, name = "type")]
    pub kind: String,
    #[pyo3(get)]
    pub buffer: u32,
    /// Comma-joined dependency ids.
    #[pyo3(get)]
    pub dependencies: String,
}

impl GanttTask {
    pub fn from_schedule(schedule: &TaskSchedule, calendar: &WorkCalendar) -> Self {
        Self {
            id: schedule.task_id.clone(),
            text: schedule.title.clone(),
            start_date: schedule.start_date.format("%Y-%m-%d").to_string(),
            end_date: schedule.due_date.format("%Y-%m-%d").to_string(),
            duration: calendar.calculate_work_days(schedule.start_date, schedule.due_date),
            progress: 0.0,
            kind: if schedule.is_critical_path {
                "critical"
            } else {
                "normal"
            }
            .to_string(),
            buffer: schedule.buffer_days,
            dependencies: schedule.dependencies.join(","),
        }
    }
}

pub fn to_gantt(schedules: &[TaskSchedule], calendar: &WorkCalendar) -> Vec<GanttTask> {
    schedules
        .iter()
        .map(|schedule| GanttTask::from_schedule(schedule, calendar))
        .collect()
}

pub fn to_gantt_json(
    schedules: &[TaskSchedule],
    calendar: &WorkCalendar,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_gantt(schedules, calendar))
}
