//! Scheduling pipeline: calendar, graph, critical path, allocation, checks, advice.

use chrono::NaiveDate;
use thiserror::Error;

use crate::advisor::{suggest, AdvisorContext};
use crate::allocator::TaskAllocator;
use crate::calendar::WorkCalendar;
use crate::config::SchedulingOptions;
use crate::conflicts::{detect_overallocation, Utilization};
use crate::critical_path::{calculate_critical_path, task_durations};
use crate::graph::{GraphError, TaskGraph};
use crate::models::{SchedulingResult, TaskInput};
use crate::{log_changes, log_debug};

/// Inputs the engine refuses to schedule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Project end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid configuration: {0}")]
    InvalidOption(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Schedule `tasks` inside the window described by `options`.
///
/// Pure and deterministic: identical inputs give identical results. Hard
/// errors are reserved for malformed input; a project that does not fit is
/// reported through warnings and suggestions instead.
pub fn generate_schedule(
    tasks: &[TaskInput],
    options: &SchedulingOptions,
) -> Result<SchedulingResult, SchedulingError> {
    options.validate()?;
    let verbosity = options.verbosity;
    let calendar = WorkCalendar::from_options(options);

    let utilization = Utilization::compute(tasks, options, &calendar);
    log_debug!(
        verbosity,
        "Utilization: {} of {} work days ({:.1}%)",
        utilization.required_days,
        utilization.available_days,
        utilization.rate
    );
    let mut warnings: Vec<_> = utilization
        .warning(options.tight_schedule_threshold)
        .into_iter()
        .collect();

    let graph = TaskGraph::build(tasks)?;
    let order = graph.topological_sort()?;
    log_debug!(verbosity, "Topological order: {} task(s)", order.len());

    let durations = task_durations(&graph, options);
    let critical = calculate_critical_path(&graph, &order, &durations);
    let critical_path = critical.critical_task_ids(&graph);
    log_debug!(
        verbosity,
        "Critical path ({} work days): {:?}",
        critical.project_duration,
        critical_path
    );

    let allocation =
        TaskAllocator::new(&graph, &calendar, options, &critical, &durations).allocate(&order);
    warnings.extend(allocation.warnings);

    if let Some(warning) =
        detect_overallocation(&allocation.schedules, &calendar, options.parallel_task_limit)
    {
        log_changes!(verbosity, "Overallocation: {}", warning.message);
        warnings.push(warning);
    }

    let suggestions = suggest(&AdvisorContext {
        warnings: &warnings,
        tasks,
        critical_path: &critical_path,
        parallel_task_limit: options.parallel_task_limit,
        available_days: utilization.available_days,
    });

    Ok(SchedulingResult {
        schedules: allocation.schedules,
        total_duration: utilization.available_days,
        critical_path,
        utilization_rate: utilization.clamped_rate(),
        warnings,
        suggestions,
    })
}
