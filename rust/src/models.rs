//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Effort assumed for a task without a usable estimate.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 2.0;

/// A task to be scheduled.
///
/// Identity is `id` alone; `dependencies` must reference other tasks' ids.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub title: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub assignee: Option<String>,
}

impl TaskInput {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            estimated_hours: None,
            dependencies: Vec::new(),
            assignee: None,
        }
    }

    /// Estimate in hours, falling back to the default when absent or unusable.
    pub fn effective_hours(&self) -> f64 {
        match self.estimated_hours {
            Some(h) if h.is_finite() && h > 0.0 => h,
            _ => DEFAULT_ESTIMATED_HOURS,
        }
    }
}

#[pymethods]
impl TaskInput {
    #[new]
    #[pyo3(signature = (id, title, estimated_hours=None, dependencies=None, assignee=None))]
    fn py_new(
        id: String,
        title: String,
        estimated_hours: Option<f64>,
        dependencies: Option<Vec<String>>,
        assignee: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            estimated_hours,
            dependencies: dependencies.unwrap_or_default(),
            assignee,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskInput(id={:?}, hours={:?}, deps={})",
            self.id,
            self.estimated_hours,
            self.dependencies.len()
        )
    }
}

/// Concrete dates assigned to one task.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSchedule {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub title: String,
    #[pyo3(get)]
    pub start_date: NaiveDate,
    #[pyo3(get)]
    pub due_date: NaiveDate,
    #[pyo3(get)]
    pub estimated_hours: f64,
    #[pyo3(get)]
    pub dependencies: Vec<String>,
    #[pyo3(get)]
    pub assignee: Option<String>,
    #[pyo3(get)]
    pub buffer_days: u32,
    #[pyo3(get)]
    pub is_critical_path: bool,
}

#[pymethods]
impl TaskSchedule {
    fn __repr__(&self) -> String {
        format!(
            "TaskSchedule(task_id={:?}, start={}, due={}, buffer={}, critical={})",
            self.task_id, self.start_date, self.due_date, self.buffer_days, self.is_critical_path
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    TightSchedule,
    Overallocation,
    DependencyConflict,
    ImpossibleDeadline,
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::TightSchedule => "tight_schedule",
            WarningType::Overallocation => "overallocation",
            WarningType::DependencyConflict => "dependency_conflict",
            WarningType::ImpossibleDeadline => "impossible_deadline",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A non-fatal scheduling diagnostic.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingWarning {
    #[serde(rename = "type")]
    pub kind: WarningType,
    #[pyo3(get)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[pyo3(get)]
    pub message: String,
    pub severity: Severity,
}

impl SchedulingWarning {
    pub fn new(kind: WarningType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: None,
            message: message.into(),
            severity,
        }
    }

    pub fn for_task(
        kind: WarningType,
        severity: Severity,
        task_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            task_id: Some(task_id.into()),
            ..Self::new(kind, severity, message)
        }
    }
}

#[pymethods]
impl SchedulingWarning {
    #[getter(warning_type)]
    fn py_warning_type(&self) -> &'static str {
        self.kind.as_str()
    }

    #[getter(severity)]
    fn py_severity(&self) -> &'static str {
        self.severity.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulingWarning(type={}, severity={}, task_id={:?})",
            self.kind.as_str(),
            self.severity.as_str(),
            self.task_id
        )
    }
}

/// Fields written back to task storage after a scheduling run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub task_id: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub buffer_days: u32,
    pub is_critical_path: bool,
}

/// Payload handed to an external suggestion service when a run has critical warnings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReviewRequest {
    pub warnings: Vec<SchedulingWarning>,
    pub tasks: Vec<TaskInput>,
    pub critical_path: Vec<String>,
    pub utilization_rate: f64,
}

/// Output of one scheduling run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingResult {
    /// One entry per input task, dependencies before dependents.
    #[pyo3(get)]
    pub schedules: Vec<TaskSchedule>,
    /// Work days available in the project window.
    #[pyo3(get)]
    pub total_duration: u32,
    /// Zero-slack task ids in forward-pass order.
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    /// Required over available work days, as a percentage clamped to 0-100.
    #[pyo3(get)]
    pub utilization_rate: f64,
    #[pyo3(get)]
    pub warnings: Vec<SchedulingWarning>,
    #[pyo3(get)]
    pub suggestions: Vec<String>,
}

impl SchedulingResult {
    pub fn schedule_for(&self, task_id: &str) -> Option<&TaskSchedule> {
        self.schedules.iter().find(|s| s.task_id == task_id)
    }

    pub fn has_warning(&self, kind: WarningType) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Schedules re-sorted by task id, for callers that do not want topological order.
    pub fn sorted_by_task_id(&self) -> Vec<TaskSchedule> {
        let mut schedules = self.schedules.clone();
        schedules.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        schedules
    }

    pub fn persistence_updates(&self) -> Vec<ScheduleUpdate> {
        self.schedules
            .iter()
            .map(|s| ScheduleUpdate {
                task_id: s.task_id.clone(),
                start_date: s.start_date,
                due_date: s.due_date,
                buffer_days: s.buffer_days,
                is_critical_path: s.is_critical_path,
            })
            .collect()
    }

    /// True when any warning is critical; the caller may then consult an external advisor.
    pub fn needs_ai_review(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == Severity::Critical)
    }

    pub fn ai_review_request(&self, tasks: &[TaskInput]) -> Option<AiReviewRequest> {
        if !self.needs_ai_review() {
            return None;
        }
        Some(AiReviewRequest {
            warnings: self.warnings.clone(),
            tasks: tasks.to_vec(),
            critical_path: self.critical_path.clone(),
            utilization_rate: self.utilization_rate,
        })
    }

    /// A copy of this result with externally produced suggestions appended.
    pub fn with_external_suggestions(&self, extra: impl IntoIterator<Item = String>) -> Self {
        let mut result = self.clone();
        result.suggestions.extend(extra);
        result
    }
}

#[pymethods]
impl SchedulingResult {
    #[pyo3(name = "needs_ai_review")]
    fn py_needs_ai_review(&self) -> bool {
        self.needs_ai_review()
    }

    #[pyo3(name = "sorted_by_task_id")]
    fn py_sorted_by_task_id(&self) -> Vec<TaskSchedule> {
        self.sorted_by_task_id()
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(self)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulingResult(schedules={}, critical_path={}, utilization={:.1}, warnings={})",
            self.schedules.len(),
            self.critical_path.len(),
            self.utilization_rate,
            self.warnings.len()
        )
    }
}
