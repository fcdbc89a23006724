//! Critical path calculation using forward and backward passes.
//!
//! Durations are whole work days; times are work-day offsets from the
//! project start, so slack comparisons are exact.

use crate::config::SchedulingOptions;
use crate::graph::TaskGraph;
use crate::interner::NodeId;

/// Per-task timing from the forward and backward passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    /// latest_start - earliest_start.
    pub slack: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

#[derive(Clone, Debug)]
pub struct CriticalPathResult {
    /// Timing per node, indexed by `NodeId`.
    pub timings: Vec<TaskTiming>,
    /// Zero-slack nodes in forward-pass order.
    pub critical_nodes: Vec<NodeId>,
    /// Longest earliest finish over all tasks.
    pub project_duration: i64,
}

impl CriticalPathResult {
    pub fn is_critical(&self, node: NodeId) -> bool {
        self.timings
            .get(node as usize)
            .map(TaskTiming::is_critical)
            .unwrap_or(false)
    }

    pub fn critical_task_ids(&self, graph: &TaskGraph) -> Vec<String> {
        self.critical_nodes
            .iter()
            .map(|node| graph.task_id(*node).to_string())
            .collect()
    }
}

/// Work-day duration of every node, indexed by `NodeId`.
pub fn task_durations(graph: &TaskGraph, options: &SchedulingOptions) -> Vec<u32> {
    (0..graph.len())
        .map(|node| options.hours_to_work_days(graph.node(node as NodeId).task.effective_hours()))
        .collect()
}

/// Run the forward and backward passes over a topological order.
///
/// `order` must list every node of `graph` with dependencies first.
pub fn calculate_critical_path(
    graph: &TaskGraph,
    order: &[NodeId],
    durations: &[u32],
) -> CriticalPathResult {
    let mut timings = vec![TaskTiming::default(); graph.len()];

    // Forward pass: earliest start = latest finish among predecessors
    for &node in order {
        let idx = node as usize;
        let earliest_start = graph
            .node(node)
            .predecessors
            .iter()
            .map(|pred| timings[*pred as usize].earliest_finish)
            .max()
            .unwrap_or(0);
        timings[idx].earliest_start = earliest_start;
        timings[idx].earliest_finish = earliest_start + i64::from(durations[idx]);
    }

    let project_duration = order
        .iter()
        .map(|node| timings[*node as usize].earliest_finish)
        .max()
        .unwrap_or(0);

    // Backward pass: latest finish = earliest latest start among successors
    for &node in order.iter().rev() {
        let idx = node as usize;
        let latest_finish = graph
            .node(node)
            .successors
            .iter()
            .map(|succ| timings[*succ as usize].latest_start)
            .min()
            .unwrap_or(project_duration);
        let timing = &mut timings[idx];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_finish - i64::from(durations[idx]);
        timing.slack = timing.latest_start - timing.earliest_start;
    }

    let critical_nodes = order
        .iter()
        .copied()
        .filter(|node| timings[*node as usize].is_critical())
        .collect();

    CriticalPathResult {
        timings,
        critical_nodes,
        project_duration,
    }
}
