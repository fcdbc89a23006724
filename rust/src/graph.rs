//! Task dependency graph and topological ordering.

use thiserror::Error;

use crate::interner::{NodeId, TaskIdInterner};
use crate::models::TaskInput;

/// Malformed task graphs that cannot be scheduled at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(String),
    #[error("Task '{task_id}' depends on unknown task '{dependency_id}'")]
    MissingDependency {
        task_id: String,
        dependency_id: String,
    },
    #[error("Cyclic dependency detected at task '{task_id}': {}", .cycle.join(" -> "))]
    CyclicDependency { task_id: String, cycle: Vec<String> },
}

/// A task together with its resolved edges.
#[derive(Clone, Debug)]
pub struct TaskNode {
    pub task: TaskInput,
    /// Tasks this one depends on, in declaration order.
    pub predecessors: Vec<NodeId>,
    /// Tasks that depend on this one, in input order.
    pub successors: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency graph over the input tasks, indexed by `NodeId` in input order.
#[derive(Clone, Debug)]
pub struct TaskGraph {
    nodes: Vec<TaskNode>,
    index: TaskIdInterner,
}

impl TaskGraph {
    /// Build the graph, rejecting duplicate ids and dangling dependencies.
    pub fn build(tasks: &[TaskInput]) -> Result<Self, GraphError> {
        let mut index = TaskIdInterner::with_capacity(tasks.len());
        for task in tasks {
            if index.insert(&task.id).is_none() {
                return Err(GraphError::DuplicateTaskId(task.id.clone()));
            }
        }

        let mut nodes: Vec<TaskNode> = tasks
            .iter()
            .map(|task| TaskNode {
                task: task.clone(),
                predecessors: Vec::with_capacity(task.dependencies.len()),
                successors: Vec::new(),
            })
            .collect();

        for (node, task) in tasks.iter().enumerate() {
            for dep_id in &task.dependencies {
                let dep = index
                    .get(dep_id)
                    .ok_or_else(|| GraphError::MissingDependency {
                        task_id: task.id.clone(),
                        dependency_id: dep_id.clone(),
                    })?;
                // Repeated entries collapse to one edge
                if nodes[node].predecessors.contains(&dep) {
                    continue;
                }
                nodes[node].predecessors.push(dep);
                nodes[dep as usize].successors.push(node as NodeId);
            }
        }

        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, node: NodeId) -> &TaskNode {
        &self.nodes[node as usize]
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskNode> {
        self.index.get(task_id).map(|node| self.node(node))
    }

    #[inline]
    pub fn task_id(&self, node: NodeId) -> &str {
        &self.nodes[node as usize].task.id
    }

    /// Order nodes so every task comes after all of its dependencies.
    ///
    /// Depth-first over predecessors with an explicit stack, starting from
    /// each task in input order. Re-entering an in-progress task is a cycle.
    pub fn topological_sort(&self) -> Result<Vec<NodeId>, GraphError> {
        let n = self.nodes.len();
        let mut state = vec![VisitState::Unvisited; n];
        let mut order: Vec<NodeId> = Vec::with_capacity(n);
        // (node, index of the next predecessor to visit)
        let mut stack: Vec<(NodeId, usize)> = Vec::new();

        for root in 0..n {
            if state[root] != VisitState::Unvisited {
                continue;
            }
            state[root] = VisitState::InProgress;
            stack.push((root as NodeId, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let predecessors = &self.nodes[node as usize].predecessors;

                if next < predecessors.len() {
                    frame.1 += 1;
                    let pred = predecessors[next];
                    match state[pred as usize] {
                        VisitState::Unvisited => {
                            state[pred as usize] = VisitState::InProgress;
                            stack.push((pred, 0));
                        }
                        VisitState::InProgress => return Err(self.cycle_error(&stack, pred)),
                        VisitState::Done => {}
                    }
                } else {
                    state[node as usize] = VisitState::Done;
                    order.push(node);
                    stack.pop();
                }
            }
        }

        Ok(order)
    }

    /// Tasks in topological order.
    pub fn sorted_tasks(&self) -> Result<Vec<&TaskInput>, GraphError> {
        Ok(self
            .topological_sort()?
            .into_iter()
            .map(|node| &self.node(node).task)
            .collect())
    }

    fn cycle_error(&self, stack: &[(NodeId, usize)], reentered: NodeId) -> GraphError {
        let start = stack
            .iter()
            .position(|(node, _)| *node == reentered)
            .unwrap_or(0);
        let mut cycle: Vec<String> = stack[start..]
            .iter()
            .map(|(node, _)| self.task_id(*node).to_string())
            .collect();
        let task_id = self.task_id(reentered).to_string();
        cycle.push(task_id.clone());
        GraphError::CyclicDependency { task_id, cycle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> TaskInput {
        TaskInput {
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..TaskInput::new(id, id.to_uppercase())
        }
    }

    fn ids(graph: &TaskGraph, order: &[NodeId]) -> Vec<String> {
        order.iter().map(|n| graph.task_id(*n).to_string()).collect()
    }

    #[test]
    fn test_build_links_predecessors_and_successors() {
        let graph = TaskGraph::build(&[task("a", &[]), task("b", &["a"]), task("c", &["a"])]).unwrap();
        let a = graph.get("a").unwrap();
        assert!(a.predecessors.is_empty());
        assert_eq!(a.successors, vec![1, 2]);
        assert_eq!(graph.get("c").unwrap().predecessors, vec![0]);
    }

    #[test]
    fn test_missing_dependency_is_reported() {
        let err = TaskGraph::build(&[task("a", &["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingDependency {
                task_id: "a".to_string(),
                dependency_id: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_id_is_reported() {
        let err = TaskGraph::build(&[task("a", &[]), task("a", &[])]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateTaskId("a".to_string()));
    }

    #[test]
    fn test_same_title_different_ids_do_not_collide() {
        let mut first = task("1", &[]);
        let mut second = task("2", &["1"]);
        first.title = "Review".to_string();
        second.title = "Review".to_string();
        let graph = TaskGraph::build(&[first, second]).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("2").unwrap().predecessors, vec![0]);
    }

    #[test]
    fn test_repeated_dependency_collapses() {
        let graph = TaskGraph::build(&[task("a", &[]), task("b", &["a", "a"])]).unwrap();
        assert_eq!(graph.get("b").unwrap().predecessors.len(), 1);
        assert_eq!(graph.get("a").unwrap().successors.len(), 1);
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        // Declared out of order on purpose
        let graph = TaskGraph::build(&[
            task("deploy", &["test", "build"]),
            task("test", &["build"]),
            task("build", &["design"]),
            task("design", &[]),
        ])
        .unwrap();
        let order = graph.topological_sort().unwrap();
        assert_eq!(ids(&graph, &order), vec!["design", "build", "test", "deploy"]);
    }

    #[test]
    fn test_sorted_tasks_yields_task_inputs() {
        let graph = TaskGraph::build(&[task("qa", &["api"]), task("api", &[])]).unwrap();
        let titles: Vec<&str> = graph
            .sorted_tasks()
            .unwrap()
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["API", "QA"]);

        let cyclic = TaskGraph::build(&[task("a", &["b"]), task("b", &["a"])]).unwrap();
        assert!(matches!(
            cyclic.sorted_tasks(),
            Err(GraphError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_independent_tasks_keep_input_order() {
        let graph = TaskGraph::build(&[task("x", &[]), task("y", &[]), task("z", &[])]).unwrap();
        let order = graph.topological_sort().unwrap();
        assert_eq!(ids(&graph, &order), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = TaskGraph::build(&[task("a", &["b"]), task("b", &["a"])]).unwrap();
        let err = graph.topological_sort().unwrap_err();
        assert_eq!(
            err,
            GraphError::CyclicDependency {
                task_id: "a".to_string(),
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let graph = TaskGraph::build(&[task("a", &["a"])]).unwrap();
        assert!(matches!(
            graph.topological_sort(),
            Err(GraphError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_long_chain_does_not_overflow_stack() {
        let n = 20_000;
        let tasks: Vec<TaskInput> = (0..n)
            .map(|i| {
                let deps: Vec<String> = if i + 1 < n {
                    vec![format!("t{}", i + 1)]
                } else {
                    vec![]
                };
                TaskInput {
                    dependencies: deps,
                    ..TaskInput::new(format!("t{}", i), "chain")
                }
            })
            .collect();
        let graph = TaskGraph::build(&tasks).unwrap();
        let order = graph.topological_sort().unwrap();
        assert_eq!(order.len(), n);
        assert_eq!(graph.task_id(order[0]), format!("t{}", n - 1));
    }
}
