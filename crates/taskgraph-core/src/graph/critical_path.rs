/// Longest weighted path through the hard-edge DAG.
///
/// Tasks are scheduled as early as their hard predecessors allow. A task's
/// earliest start is the maximum, over incoming hard edges, of the source's
/// start plus the edge weight; its finish is its start plus its own weight.
/// With no explicit edge weight the edge costs the source's weight, so a
/// dependent task starts when its prerequisite finishes. The critical path
/// ends at the task with the latest finish and its length is that finish
/// time: the minimum project duration under unlimited parallelism.
///
/// Equivalently, `dist[n]` starts at the task's own weight and is relaxed as
/// `dist[u] - w(u) + edge(u, n) + w(n)` in topological order.
use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use super::DependencyGraph;
use crate::error::GraphResult;
use crate::newtypes::TaskId;

/// Result of [`DependencyGraph::critical_path`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CriticalPath {
    /// Tasks on the path, first prerequisite first.
    pub tasks: Vec<TaskId>,
    /// Finish time of the last task: the path's total weight.
    pub length: f64,
}

impl CriticalPath {
    /// Returns `true` for the empty graph's path.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl DependencyGraph {
    /// Computes the critical path.
    ///
    /// Returns an empty path for an empty graph and the single task for a
    /// one-task graph. Relaxation only replaces a predecessor on a strictly
    /// longer distance, and among tasks with equal maximal finish the one
    /// inserted last is chosen as the end, so results are deterministic.
    ///
    /// # Errors
    ///
    /// [`crate::GraphError::CyclicGraph`] when a hard-edge cycle exists. There
    /// is no fallback heuristic.
    pub fn critical_path(&self) -> GraphResult<CriticalPath> {
        let order = self.topo_indices()?;

        let mut start: HashMap<NodeIndex, f64> = order.iter().map(|&idx| (idx, 0.0)).collect();
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for &node in &order {
            let node_start = start.get(&node).copied().unwrap_or(0.0);
            for (edge, target) in self.hard_out_edges(node) {
                let candidate = node_start + self.edge_weight(edge);
                if let Some(target_start) = start.get_mut(&target) {
                    if candidate > *target_start {
                        *target_start = candidate;
                        prev.insert(target, node);
                    }
                }
            }
        }

        let mut end: Option<(NodeIndex, f64)> = None;
        for &idx in &order {
            let finish = start.get(&idx).copied().unwrap_or(0.0) + self.task_weight(idx);
            let better = match end {
                None => true,
                Some((best, best_finish)) => {
                    finish > best_finish
                        || (finish == best_finish && self.seq_of(idx) > self.seq_of(best))
                }
            };
            if better {
                end = Some((idx, finish));
            }
        }

        let Some((last, length)) = end else {
            return Ok(CriticalPath::default());
        };

        let mut path = vec![last];
        let mut cursor = last;
        while let Some(&p) = prev.get(&cursor) {
            path.push(p);
            cursor = p;
        }
        path.reverse();

        tracing::debug!(tasks = path.len(), length, "critical path computed");

        Ok(CriticalPath {
            tasks: self.owned_ids(path),
            length,
        })
    }
}
