//! Dense node indices for task identifiers.
//!
//! The dependency graph stores tasks in a `Vec` and refers to them by index;
//! this maps caller-assigned task ids to those indices and back.

use rustc_hash::FxHashMap;

/// Index of a task in the dependency graph.
pub type NodeId = u32;

#[derive(Debug, Clone)]
pub struct TaskIdInterner {
    to_node: FxHashMap<String, NodeId>,
    from_node: Vec<String>,
}

impl TaskIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_node: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_node: Vec::with_capacity(capacity),
        }
    }

    /// Register a new id. Returns `None` if the id was already registered.
    pub fn insert(&mut self, id: &str) -> Option<NodeId> {
        if self.to_node.contains_key(id) {
            return None;
        }
        let node = self.from_node.len() as NodeId;
        self.from_node.push(id.to_string());
        self.to_node.insert(id.to_string(), node);
        Some(node)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.to_node.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, node: NodeId) -> Option<&str> {
        self.from_node.get(node as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_node.is_empty()
    }
}

impl Default for TaskIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
