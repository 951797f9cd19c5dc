/// Ordering views: topological sort, best-effort order, parallel batches and
/// ready tasks.
///
/// All four are driven by Kahn's algorithm over hard edges between declared
/// tasks. Ties are broken by insertion order: the FIFO queue is seeded with
/// zero-in-degree tasks in insertion order and successors are visited in edge
/// insertion order.
use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use super::DependencyGraph;
use crate::error::{GraphError, GraphResult};
use crate::newtypes::TaskId;

/// Result of [`DependencyGraph::best_effort_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BestEffortOrder {
    /// Every task exactly once: the valid topological prefix first, then the
    /// unresolved tasks in insertion order.
    pub order: Vec<TaskId>,
    /// Tasks whose position could not be derived because they sit on a cycle
    /// or depend (transitively) on one. Empty on acyclic graphs.
    pub unresolved: Vec<TaskId>,
}

impl BestEffortOrder {
    /// Returns `true` when the order is a genuine topological order.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl DependencyGraph {
    /// Returns every task id in an order consistent with all hard edges.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicGraph`] when a hard-edge cycle exists. A partial
    /// order is never returned; use [`Self::best_effort_order`] to get one
    /// explicitly.
    pub fn topological_sort(&self) -> GraphResult<Vec<TaskId>> {
        let order = self.topo_indices()?;
        Ok(self.owned_ids(order))
    }

    /// Returns a total order even on cyclic graphs.
    ///
    /// This is the explicit fallback for callers that must proceed on a
    /// cyclic plan. The result says which tasks were ordered arbitrarily.
    pub fn best_effort_order(&self) -> BestEffortOrder {
        let prefix = self.kahn();
        let placed: HashSet<NodeIndex> = prefix.iter().copied().collect();
        let rest: Vec<NodeIndex> = self
            .declared_in_order()
            .into_iter()
            .filter(|idx| !placed.contains(idx))
            .collect();

        if !rest.is_empty() {
            tracing::warn!(
                unresolved = rest.len(),
                "best-effort order appended tasks blocked by cycles"
            );
        }

        let unresolved = self.owned_ids(rest.iter().copied());
        let order = self.owned_ids(prefix.into_iter().chain(rest));
        BestEffortOrder { order, unresolved }
    }

    /// Groups tasks into batches that can run concurrently.
    ///
    /// A task's level is 0 without hard predecessors, otherwise one more than
    /// the highest level among them. Batch `k` holds every task of level `k`
    /// in insertion order, so each batch is maximal.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicGraph`] when a hard-edge cycle exists.
    pub fn parallel_batches(&self) -> GraphResult<Vec<Vec<TaskId>>> {
        let order = self.topo_indices()?;

        let mut level: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        let mut batches: Vec<Vec<NodeIndex>> = Vec::new();

        for idx in order {
            let lvl = self
                .hard_predecessors(idx)
                .into_iter()
                .filter_map(|p| level.get(&p).map(|l| l + 1))
                .max()
                .unwrap_or(0);
            level.insert(idx, lvl);
            if batches.len() <= lvl {
                batches.resize_with(lvl + 1, Vec::new);
            }
            if let Some(batch) = batches.get_mut(lvl) {
                batch.push(idx);
            }
        }

        tracing::debug!(batches = batches.len(), "parallel batches computed");

        Ok(batches
            .into_iter()
            .map(|mut batch| {
                batch.sort_by_key(|&idx| self.seq_of(idx));
                self.owned_ids(batch)
            })
            .collect())
    }

    /// Returns the tasks that can start now, given the ids already completed.
    ///
    /// A task is ready when it is not in `completed` and every hard
    /// predecessor is. Unknown ids in `completed` are ignored. Tasks on a
    /// cycle never become ready, so this never fails. Result is in insertion
    /// order.
    pub fn ready_tasks<S: AsRef<str>>(&self, completed: &[S]) -> Vec<TaskId> {
        let done: HashSet<&str> = completed.iter().map(AsRef::as_ref).collect();
        let is_done = |idx: NodeIndex| {
            self.id_at(idx)
                .is_some_and(|id| done.contains(id.as_str()))
        };
        let ready = self
            .declared_in_order()
            .into_iter()
            .filter(|&idx| !is_done(idx) && self.hard_predecessors(idx).into_iter().all(is_done));
        self.owned_ids(ready)
    }

    /// Kahn order over hard edges, failing when it cannot cover every task.
    pub(crate) fn topo_indices(&self) -> GraphResult<Vec<NodeIndex>> {
        let order = self.kahn();
        if order.len() < self.node_count() {
            let cycle = self.first_cycle();
            tracing::warn!(
                ordered = order.len(),
                tasks = self.node_count(),
                "hard-edge cycle prevents a topological order"
            );
            return Err(GraphError::cyclic(cycle));
        }
        Ok(order)
    }

    /// Kahn's algorithm. Returns the (possibly partial) order it reaches.
    fn kahn(&self) -> Vec<NodeIndex> {
        let declared = self.declared_in_order();

        let mut in_degree: HashMap<NodeIndex, usize> = declared
            .iter()
            .map(|&idx| (idx, self.hard_predecessors(idx).len()))
            .collect();

        let mut queue: VecDeque<NodeIndex> = declared
            .iter()
            .copied()
            .filter(|idx| in_degree.get(idx) == Some(&0))
            .collect();

        let mut order: Vec<NodeIndex> = Vec::with_capacity(declared.len());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for (_, target) in self.hard_out_edges(node) {
                if let Some(deg) = in_degree.get_mut(&target) {
                    *deg = deg.saturating_sub(1);
                    if *deg == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
        order
    }
}
