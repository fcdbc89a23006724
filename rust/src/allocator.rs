//! Date allocation for tasks in dependency order.
//!
//! Each task starts on the project start (no dependencies) or one work day
//! after its latest dependency is due, then gets its work days plus a buffer.
//! Tasks that run past the project end are recovered in three steps: shrink
//! the buffer, move independent non-critical tasks to an earlier free slot,
//! and finally clamp the due date to the end of the window.

use chrono::NaiveDate;

use crate::calendar::WorkCalendar;
use crate::config::SchedulingOptions;
use crate::critical_path::CriticalPathResult;
use crate::graph::TaskGraph;
use crate::interner::NodeId;
use crate::models::{SchedulingWarning, Severity, TaskSchedule, WarningType};
use crate::occupancy::OccupancyTracker;
use crate::{log_changes, log_checks};

/// Schedules in allocation order plus the warnings raised while allocating.
#[derive(Clone, Debug, Default)]
pub struct Allocation {
    pub schedules: Vec<TaskSchedule>,
    pub warnings: Vec<SchedulingWarning>,
}

/// Buffer days for a task: `ceil(work_days * ratio)`, halved on the critical path.
pub fn buffer_days(work_days: u32, buffer_ratio: f64, is_critical: bool) -> u32 {
    let factor = if is_critical { 0.5 } else { 1.0 };
    let buffer = (f64::from(work_days) * buffer_ratio * factor).ceil();
    if buffer <= 0.0 {
        0
    } else {
        buffer as u32
    }
}

pub struct TaskAllocator<'a> {
    graph: &'a TaskGraph,
    calendar: &'a WorkCalendar,
    options: &'a SchedulingOptions,
    critical_path: &'a CriticalPathResult,
    durations: &'a [u32],
}

impl<'a> TaskAllocator<'a> {
    pub fn new(
        graph: &'a TaskGraph,
        calendar: &'a WorkCalendar,
        options: &'a SchedulingOptions,
        critical_path: &'a CriticalPathResult,
        durations: &'a [u32],
    ) -> Self {
        Self {
            graph,
            calendar,
            options,
            critical_path,
            durations,
        }
    }

    /// Allocate every node in `order`, which must be topological.
    pub fn allocate(&self, order: &[NodeId]) -> Allocation {
        let mut due_dates: Vec<Option<NaiveDate>> = vec![None; self.graph.len()];
        let mut occupancy = OccupancyTracker::new();
        let mut allocation = Allocation::default();

        for &node in order {
            let schedule = self.allocate_task(node, &due_dates, &occupancy, &mut allocation.warnings);
            occupancy.add_busy_period(schedule.start_date, schedule.due_date);
            due_dates[node as usize] = Some(schedule.due_date);
            allocation.schedules.push(schedule);
        }

        allocation
    }

    fn allocate_task(
        &self,
        node: NodeId,
        due_dates: &[Option<NaiveDate>],
        occupancy: &OccupancyTracker,
        warnings: &mut Vec<SchedulingWarning>,
    ) -> TaskSchedule {
        let verbosity = self.options.verbosity;
        let project_end = self.options.project_end_date;
        let task_node = self.graph.node(node);
        let task = &task_node.task;
        let is_critical = self.critical_path.is_critical(node);
        let has_dependencies = !task_node.predecessors.is_empty();
        let work_days = self.durations[node as usize];

        let latest_dependency_due = task_node
            .predecessors
            .iter()
            .filter_map(|pred| due_dates[*pred as usize])
            .max();
        let mut start = match latest_dependency_due {
            Some(due) => self.calendar.add_work_days(due, 1),
            None => self
                .calendar
                .work_day_on_or_after(self.options.project_start_date),
        };

        // Work days after `start` that still fall inside the window. Spans are
        // capped one past it so huge estimates never walk the calendar.
        let room = self
            .calendar
            .calculate_work_days(start, project_end)
            .saturating_sub(1);
        let span_end = move |span: u32| {
            self.calendar
                .add_work_days(start, span.min(room.saturating_add(1)))
        };

        let mut buffer = buffer_days(work_days, self.options.buffer_ratio, is_critical);
        let mut due = span_end(work_days.saturating_add(buffer));

        if due > project_end {
            if start > project_end {
                log_checks!(
                    verbosity,
                    "  Task {} cannot start before project end ({} > {})",
                    task.id,
                    start,
                    project_end
                );
                buffer = 0;
                due = start;
                if has_dependencies {
                    warnings.push(SchedulingWarning::for_task(
                        WarningType::DependencyConflict,
                        Severity::High,
                        &task.id,
                        format!(
                            "Dependencies of \"{}\" finish too late for it to start before {}",
                            task.title, project_end
                        ),
                    ));
                }
                warnings.push(impossible_deadline(&task.id, &task.title, project_end));
            } else {
                // Work days past the end of the window
                let overflow = work_days.saturating_add(buffer).saturating_sub(room);
                let original_buffer = buffer;
                buffer = buffer.saturating_sub(overflow);
                due = span_end(work_days.saturating_add(buffer));
                log_checks!(
                    verbosity,
                    "  Task {} overflows by {} day(s), buffer {} -> {}",
                    task.id,
                    overflow,
                    original_buffer,
                    buffer
                );

                if original_buffer > 0 && buffer == 0 {
                    warnings.push(SchedulingWarning::for_task(
                        WarningType::TightSchedule,
                        Severity::High,
                        &task.id,
                        format!(
                            "Buffer for \"{}\" was removed to fit the project window",
                            task.title
                        ),
                    ));
                }

                if due > project_end && !is_critical && !has_dependencies {
                    if let Some((slot_start, slot_end)) = occupancy.find_free_run(
                        self.calendar,
                        self.options.project_start_date,
                        project_end,
                        work_days,
                    ) {
                        log_checks!(
                            verbosity,
                            "  Task {} moved to free slot {} - {}",
                            task.id,
                            slot_start,
                            slot_end
                        );
                        start = slot_start;
                        due = slot_end;
                    }
                }

                if due > project_end {
                    due = self
                        .calendar
                        .work_day_on_or_before(project_end, start)
                        .unwrap_or(start);
                    log_checks!(verbosity, "  Task {} clamped to {}", task.id, due);
                    warnings.push(impossible_deadline(&task.id, &task.title, project_end));
                }
            }
        }

        log_changes!(
            verbosity,
            "Allocated {} from {} to {} (buffer={}, critical={})",
            task.id,
            start,
            due,
            buffer,
            is_critical
        );

        TaskSchedule {
            task_id: task.id.clone(),
            title: task.title.clone(),
            start_date: start,
            due_date: due,
            estimated_hours: task.effective_hours(),
            dependencies: task_node
                .predecessors
                .iter()
                .map(|pred| self.graph.task_id(*pred).to_string())
                .collect(),
            assignee: task.assignee.clone(),
            buffer_days: buffer,
            is_critical_path: is_critical,
        }
    }
}

fn impossible_deadline(task_id: &str, title: &str, project_end: NaiveDate) -> SchedulingWarning {
    SchedulingWarning::for_task(
        WarningType::ImpossibleDeadline,
        Severity::Critical,
        task_id,
        format!("\"{}\" cannot be completed by {}", title, project_end),
    )
}
