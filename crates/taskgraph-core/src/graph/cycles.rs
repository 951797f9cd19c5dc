/// Cycle detection over the hard-edge subgraph.
///
/// Soft edges never participate, and neither do edges touching placeholder
/// vertices: a dangling edge cannot close a cycle between declared tasks.
///
/// # Algorithm Overview
///
/// Iterative depth-first traversal rooted at every unvisited task in
/// insertion order. The current DFS path is mirrored in an `on_path` set;
/// reaching a child that is already on the path is a back edge, and the
/// path suffix from that child to the current node, closed by the child
/// again, is reported as a cycle. Finished nodes move to a global visited
/// set and are never re-entered, so the whole scan is O(V + E). Scanning
/// continues after the first cycle, so disjoint cycles are all reported.
use std::collections::HashSet;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use super::DependencyGraph;
use crate::newtypes::TaskId;

/// Outcome of [`DependencyGraph::detect_cycles`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// `true` when at least one hard-edge cycle exists.
    pub has_cycles: bool,
    /// One closed cycle per back edge found, in discovery order. Each cycle
    /// starts and ends with the same task id.
    pub cycles: Vec<Vec<TaskId>>,
}

impl DependencyGraph {
    /// Detects directed cycles among hard edges.
    ///
    /// Never fails. Repeated calls on an unmutated graph return identical
    /// reports.
    pub fn detect_cycles(&self) -> CycleReport {
        let cycles: Vec<Vec<TaskId>> = self
            .cycle_indices()
            .into_iter()
            .map(|cycle| self.owned_ids(cycle))
            .collect();
        tracing::debug!(cycles = cycles.len(), "cycle detection finished");
        CycleReport {
            has_cycles: !cycles.is_empty(),
            cycles,
        }
    }

    /// The first cycle found, used as the payload of
    /// [`crate::GraphError::CyclicGraph`].
    pub(crate) fn first_cycle(&self) -> Vec<TaskId> {
        self.cycle_indices()
            .into_iter()
            .next()
            .map(|cycle| self.owned_ids(cycle))
            .unwrap_or_default()
    }

    fn cycle_indices(&self) -> Vec<Vec<NodeIndex>> {
        let mut all_cycles: Vec<Vec<NodeIndex>> = Vec::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();

        for start in self.declared_in_order() {
            if visited.contains(&start) {
                continue;
            }

            let mut path: Vec<NodeIndex> = vec![start];
            let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);

            // (node, hard successors, next child index)
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
                vec![(start, self.hard_successors(start), 0)];

            while let Some(frame) = stack.last_mut() {
                let (node, children, child_idx) = frame;
                let node = *node;

                let Some(&child) = children.get(*child_idx) else {
                    stack.pop();
                    path.pop();
                    on_path.remove(&node);
                    visited.insert(node);
                    continue;
                };
                *child_idx += 1;

                if on_path.contains(&child) {
                    if let Some(pos) = path.iter().position(|&n| n == child) {
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(child);
                        all_cycles.push(cycle);
                    }
                    continue;
                }

                if visited.contains(&child) {
                    continue;
                }

                path.push(child);
                on_path.insert(child);
                stack.push((child, self.hard_successors(child), 0));
            }
        }

        all_cycles
    }

    fn hard_successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.hard_out_edges(idx)
            .into_iter()
            .map(|(_, target)| target)
            .collect()
    }
}
