//! Templated schedule-improvement suggestions derived from warnings.

use crate::models::{SchedulingWarning, Severity, TaskInput, WarningType};

/// Inputs the suggestion templates draw on.
#[derive(Clone, Debug)]
pub struct AdvisorContext<'a> {
    pub warnings: &'a [SchedulingWarning],
    pub tasks: &'a [TaskInput],
    pub critical_path: &'a [String],
    pub parallel_task_limit: u32,
    pub available_days: u32,
}

fn count_task_warnings(warnings: &[SchedulingWarning], kind: WarningType) -> usize {
    warnings
        .iter()
        .filter(|w| w.kind == kind && w.task_id.is_some())
        .count()
}

/// Suggestions in a fixed order: deadline problems first, capacity last.
pub fn suggest(ctx: &AdvisorContext<'_>) -> Vec<String> {
    let mut suggestions = Vec::new();
    let has = |kind: WarningType| ctx.warnings.iter().any(|w| w.kind == kind);

    let impossible = count_task_warnings(ctx.warnings, WarningType::ImpossibleDeadline);
    if impossible > 0 {
        suggestions.push(format!(
            "{} task(s) cannot finish within the project window; extend the end date or reduce their scope.",
            impossible
        ));
    }

    let blocked = count_task_warnings(ctx.warnings, WarningType::DependencyConflict);
    if blocked > 0 {
        suggestions.push(format!(
            "{} task(s) are blocked by dependencies that finish after the project end; split the longest dependency chain.",
            blocked
        ));
    }

    // Project-wide utilization warnings carry no task id
    let over_capacity = ctx.warnings.iter().any(|w| {
        w.kind == WarningType::TightSchedule && w.task_id.is_none() && w.severity == Severity::Critical
    });
    if over_capacity {
        suggestions.push(format!(
            "Required work exceeds the {} available work days; add people or move the deadline.",
            ctx.available_days
        ));
    } else if ctx
        .warnings
        .iter()
        .any(|w| w.kind == WarningType::TightSchedule && w.task_id.is_none())
    {
        suggestions.push(
            "Utilization is close to capacity; avoid adding scope during this project window."
                .to_string(),
        );
    }

    if !ctx.critical_path.is_empty()
        && (has(WarningType::TightSchedule) || has(WarningType::ImpossibleDeadline))
    {
        suggestions.push(format!(
            "The critical path has {} task(s); any delay on them delays the project, so staff them first.",
            ctx.critical_path.len()
        ));
    }

    let bufferless = count_task_warnings(ctx.warnings, WarningType::TightSchedule);
    if bufferless > 0 {
        suggestions.push(format!(
            "{} task(s) lost their buffer time; review their estimates or start them earlier.",
            bufferless
        ));
    }

    if has(WarningType::Overallocation) {
        let independent = ctx
            .tasks
            .iter()
            .filter(|t| t.dependencies.is_empty())
            .count();
        if independent > ctx.parallel_task_limit as usize {
            suggestions.push(format!(
                "{} independent tasks exceed the parallel limit of {}; stagger their start dates or assign more people.",
                independent, ctx.parallel_task_limit
            ));
        } else {
            suggestions.push(format!(
                "Some days exceed the parallel limit of {} tasks; spread the work more evenly.",
                ctx.parallel_task_limit
            ));
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        warnings: &'a [SchedulingWarning],
        tasks: &'a [TaskInput],
        critical_path: &'a [String],
    ) -> AdvisorContext<'a> {
        AdvisorContext {
            warnings,
            tasks,
            critical_path,
            parallel_task_limit: 3,
            available_days: 10,
        }
    }

    #[test]
    fn test_no_warnings_no_suggestions() {
        assert!(suggest(&ctx(&[], &[], &[])).is_empty());
    }

    #[test]
    fn test_overallocation_counts_independent_tasks() {
        let warnings = vec![SchedulingWarning::new(
            WarningType::Overallocation,
            Severity::Medium,
            "busy",
        )];
        let tasks: Vec<TaskInput> = (0..5)
            .map(|i| TaskInput::new(format!("t{}", i), "T"))
            .collect();
        let suggestions = suggest(&ctx(&warnings, &tasks, &[]));
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("5 independent tasks"));
    }

    #[test]
    fn test_deadline_problems_name_counts_and_critical_path() {
        let warnings = vec![
            SchedulingWarning::for_task(WarningType::TightSchedule, Severity::High, "a", "buffer"),
            SchedulingWarning::for_task(WarningType::ImpossibleDeadline, Severity::Critical, "b", "late"),
            SchedulingWarning::new(WarningType::TightSchedule, Severity::Critical, "over"),
        ];
        let critical = vec!["a".to_string(), "b".to_string()];
        let suggestions = suggest(&ctx(&warnings, &[], &critical));

        assert!(suggestions[0].starts_with("1 task(s) cannot finish"));
        assert!(suggestions[1].contains("10 available work days"));
        assert!(suggestions[2].contains("critical path has 2 task(s)"));
        assert!(suggestions[3].starts_with("1 task(s) lost their buffer"));
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_dependency_conflict_suggestion() {
        let warnings = vec![SchedulingWarning::for_task(
            WarningType::DependencyConflict,
            Severity::High,
            "c",
            "blocked",
        )];
        let suggestions = suggest(&ctx(&warnings, &[], &[]));
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("blocked by dependencies"));
    }
}
