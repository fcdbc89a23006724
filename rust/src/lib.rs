//! Project task-scheduling engine.
//!
//! Turns a flat list of tasks with effort estimates and dependencies into
//! work-day-aligned start and due dates inside a bounded project window,
//! tags the critical path, and reports capacity problems as warnings with
//! suggestions. Also exposed to Python as the `project_scheduler` module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod advisor;
pub mod allocator;
pub mod calendar;
mod config;
pub mod conflicts;
pub mod critical_path;
mod engine;
pub mod gantt;
pub mod graph;
pub mod interner;
pub mod logging;
mod models;
pub mod occupancy;

pub use calendar::{HolidayCalendar, WorkCalendar};
pub use config::SchedulingOptions;
pub use engine::{generate_schedule, SchedulingError};
pub use gantt::{to_gantt, to_gantt_json, GanttTask};
pub use graph::{GraphError, TaskGraph};
pub use interner::NodeId;
pub use models::{
    AiReviewRequest, ScheduleUpdate, SchedulingResult, SchedulingWarning, Severity, TaskInput,
    TaskSchedule, WarningType,
};

/// Schedule tasks within the project window.
///
/// # Arguments
/// * `tasks` - Tasks to schedule; ids must be unique
/// * `options` - Project window, calendar filters and heuristics
///
/// # Raises
/// * ValueError on a reversed window, bad numeric option, duplicate id,
///   unknown dependency, or dependency cycle
#[pyfunction]
#[pyo3(name = "generate_schedule")]
fn py_generate_schedule(
    tasks: Vec<TaskInput>,
    options: SchedulingOptions,
) -> PyResult<SchedulingResult> {
    generate_schedule(&tasks, &options)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Convert schedules to Gantt rows using the calendar described by `options`.
#[pyfunction]
#[pyo3(name = "export_gantt")]
fn py_export_gantt(schedules: Vec<TaskSchedule>, options: SchedulingOptions) -> Vec<GanttTask> {
    to_gantt(&schedules, &WorkCalendar::from_options(&options))
}

/// The project_scheduler Python module.
#[pymodule]
fn project_scheduler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<TaskInput>()?;
    m.add_class::<TaskSchedule>()?;
    m.add_class::<SchedulingWarning>()?;
    m.add_class::<SchedulingResult>()?;
    m.add_class::<GanttTask>()?;

    m.add_class::<SchedulingOptions>()?;

    m.add_function(wrap_pyfunction!(py_generate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_export_gantt, m)?)?;

    Ok(())
}
