/// Task dependency graph built on a `petgraph` [`StableDiGraph`].
///
/// [`DependencyGraph`] owns the node set (tasks) and the edge set
/// (dependencies). This module implements construction and mutation; the
/// derived views live in submodules:
///
/// - [`cycles`]: DFS cycle detection over hard edges.
/// - [`order`]: Kahn topological sort, the explicit best-effort fallback,
///   parallel batch grouping, and ready-task queries.
/// - [`critical_path`]: longest weighted path over the hard-edge DAG.
///
/// # Placeholder vertices
///
/// Edges may name tasks that have not been added yet (incremental task
/// generation). Such endpoints are stored as placeholder vertices that carry
/// an id but no [`TaskNode`]. Placeholders are not nodes: they are excluded
/// from [`DependencyGraph::node_count`] and from every derived view, and edges
/// touching them are reported as dangling by validation. Adding a node with
/// the placeholder's id promotes it in place, so earlier edges attach to it.
/// A placeholder that loses its last edge is pruned.
///
/// # Ordering
///
/// Every node and edge receives a monotonically increasing sequence number on
/// first insertion. Node iteration, neighbor lists, and all tie-breaking in
/// derived views follow these numbers, so results are deterministic across
/// repeated calls on an unchanged graph.
pub mod critical_path;
pub mod cycles;
pub mod order;

#[cfg(test)]
mod tests;

pub use critical_path::CriticalPath;
pub use cycles::CycleReport;
pub use order::BestEffortOrder;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::Serialize;

use crate::error::{GraphError, GraphResult, check_weight};
use crate::newtypes::TaskId;
use crate::task::{DEFAULT_WEIGHT, DependencyEdge, DependencyKind, TaskNode};

// ---------------------------------------------------------------------------
// Weight types
// ---------------------------------------------------------------------------

/// Weight stored on each petgraph vertex.
#[derive(Debug, Clone)]
struct Vertex {
    id: TaskId,
    /// `None` for placeholder vertices created by an edge to an unknown id.
    task: Option<TaskNode>,
    /// Declaration sequence number; meaningful only when `task` is `Some`.
    seq: u64,
}

/// Weight stored on each petgraph edge.
#[derive(Debug, Clone)]
struct EdgeData {
    kind: DependencyKind,
    weight: Option<f64>,
    seq: u64,
}

/// A self-loop that was rejected by [`DependencyGraph::add_edge`].
///
/// Kept so that [`DependencyGraph::validate`] can report the attempt as an
/// error instead of it vanishing silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEdge {
    /// The task named as both endpoints.
    pub id: TaskId,
    /// The kind the caller requested.
    pub kind: DependencyKind,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// Directed task dependency graph.
///
/// A plain instantiable value with no global state; callers own and pass
/// instances explicitly. Mutation requires `&mut self`; concurrent readers of
/// an unmutated graph are safe.
///
/// # Example
///
/// ```
/// use taskgraph_core::{DependencyGraph, DependencyKind, TaskId, TaskNode};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let a = TaskId::try_from("A")?;
/// let b = TaskId::try_from("B")?;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_node(TaskNode::new(a.clone(), "Set up repository"));
/// graph.add_node(TaskNode::new(b.clone(), "Implement login"));
/// graph.add_edge(a, b, DependencyKind::Hard, None)?;
///
/// let order = graph.topological_sort()?;
/// assert_eq!(order, ["A", "B"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: StableDiGraph<Vertex, EdgeData>,
    id_to_index: HashMap<TaskId, NodeIndex>,
    rejected: Vec<RejectedEdge>,
    declared: usize,
    next_seq: u64,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_to_index: HashMap::new(),
            rejected: Vec::new(),
            declared: 0,
            next_seq: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Returns the number of task nodes (placeholders excluded).
    pub fn node_count(&self) -> usize {
        self.declared
    }

    /// Returns the number of edges, including dangling ones.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no task nodes.
    pub fn is_empty(&self) -> bool {
        self.declared == 0
    }

    /// Returns `true` if a task node with this id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Returns the task node with this id, if declared.
    pub fn node(&self, id: &str) -> Option<&TaskNode> {
        let idx = self.id_to_index.get(id)?;
        self.graph.node_weight(*idx)?.task.as_ref()
    }

    /// Returns all task nodes in insertion order.
    pub fn nodes(&self) -> Vec<&TaskNode> {
        self.declared_in_order()
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx)?.task.as_ref())
            .collect()
    }

    /// Returns all task ids in insertion order.
    pub fn node_ids(&self) -> Vec<&TaskId> {
        self.ids(self.declared_in_order())
    }

    /// Returns the edge `from → to`, if present.
    pub fn edge(&self, from: &str, to: &str) -> Option<DependencyEdge> {
        let a = *self.id_to_index.get(from)?;
        let b = *self.id_to_index.get(to)?;
        let e = self.graph.find_edge(a, b)?;
        self.edge_snapshot(e)
    }

    /// Returns every edge, dangling ones included, in insertion order.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut indices: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        indices.sort_by_key(|&e| self.graph.edge_weight(e).map_or(u64::MAX, |d| d.seq));
        indices
            .into_iter()
            .filter_map(|e| self.edge_snapshot(e))
            .collect()
    }

    /// Returns the self-loops rejected so far, one entry per `(id, kind)` in
    /// the order first attempted.
    pub fn rejected_edges(&self) -> &[RejectedEdge] {
        &self.rejected
    }

    /// Returns the targets of edges whose source is `id` (tasks that depend
    /// on `id`), in edge insertion order. Unknown ids yield an empty list.
    pub fn neighbors(&self, id: &str) -> Vec<&TaskId> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Returns the sources of edges whose target is `id` (tasks `id` depends
    /// on), in edge insertion order. Unknown ids yield an empty list.
    pub fn predecessors(&self, id: &str) -> Vec<&TaskId> {
        self.adjacent(id, Direction::Incoming)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Inserts a task, or replaces the attributes of the task with the same id.
    ///
    /// Existing edges and the task's original insertion position are kept.
    pub fn add_node(&mut self, node: TaskNode) {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            if let Some(vertex) = self.graph.node_weight_mut(idx) {
                if vertex.task.is_none() {
                    vertex.seq = self.next_seq;
                    self.next_seq += 1;
                    self.declared += 1;
                }
                vertex.task = Some(node);
            }
            return;
        }

        let id = node.id.clone();
        let seq = self.bump_seq();
        let idx = self.graph.add_node(Vertex {
            id: id.clone(),
            task: Some(node),
            seq,
        });
        self.id_to_index.insert(id, idx);
        self.declared += 1;
    }

    /// Deletes the task and every edge incident to it, in both directions.
    ///
    /// Any self-loops rejected for `id` are forgotten as well. Removing an
    /// unknown id is otherwise a no-op.
    pub fn remove_node(&mut self, id: &str) {
        self.rejected.retain(|r| r.id.as_str() != id);

        let Some(&idx) = self.id_to_index.get(id) else {
            return;
        };
        if !self.is_declared(idx) {
            return;
        }

        let adjacent: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .chain(self.graph.neighbors_directed(idx, Direction::Incoming))
            .collect();

        self.graph.remove_node(idx);
        self.id_to_index.remove(id);
        self.declared -= 1;

        for other in adjacent {
            self.prune_placeholder(other);
        }
    }

    /// Upserts the directed edge `from → to`.
    ///
    /// Endpoints need not exist yet; edges to unknown ids are kept and
    /// reported as dangling by [`DependencyGraph::validate`]. Re-adding an
    /// existing pair replaces its kind and weight in place.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidEdge`] when `from == to`. The edge set is left
    ///   unchanged and the attempt is recorded once in [`Self::rejected_edges`].
    /// - [`GraphError::InvalidWeight`] when `weight` is negative or not finite.
    pub fn add_edge(
        &mut self,
        from: TaskId,
        to: TaskId,
        kind: DependencyKind,
        weight: Option<f64>,
    ) -> GraphResult<()> {
        if from == to {
            tracing::warn!(task = %from, %kind, "rejected self-loop dependency");
            let attempt = RejectedEdge {
                id: from.clone(),
                kind,
            };
            if !self.rejected.contains(&attempt) {
                self.rejected.push(attempt);
            }
            return Err(GraphError::InvalidEdge { id: from });
        }
        let weight = weight.map(check_weight).transpose()?;

        let a = self.ensure_vertex(from);
        let b = self.ensure_vertex(to);

        if let Some(e) = self.graph.find_edge(a, b) {
            if let Some(data) = self.graph.edge_weight_mut(e) {
                data.kind = kind;
                data.weight = weight;
            }
            return Ok(());
        }

        let seq = self.bump_seq();
        self.graph.add_edge(a, b, EdgeData { kind, weight, seq });
        Ok(())
    }

    /// Deletes the edge `from → to` if present; otherwise a no-op.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let (Some(&a), Some(&b)) = (self.id_to_index.get(from), self.id_to_index.get(to)) else {
            return;
        };
        if let Some(e) = self.graph.find_edge(a, b) {
            self.graph.remove_edge(e);
            self.prune_placeholder(a);
            self.prune_placeholder(b);
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers shared by the derived views
    // -----------------------------------------------------------------------

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Returns the vertex for `id`, creating a placeholder if needed.
    fn ensure_vertex(&mut self, id: TaskId) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(Vertex {
            id: id.clone(),
            task: None,
            seq: 0,
        });
        self.id_to_index.insert(id, idx);
        idx
    }

    /// Removes `idx` if it is a placeholder with no remaining edges.
    fn prune_placeholder(&mut self, idx: NodeIndex) {
        let Some(vertex) = self.graph.node_weight(idx) else {
            return;
        };
        if vertex.task.is_some() {
            return;
        }
        let has_edges = self.has_any_edge(idx);
        if has_edges {
            return;
        }
        let id = vertex.id.clone();
        self.graph.remove_node(idx);
        self.id_to_index.remove(&id);
    }

    fn adjacent(&self, id: &str, direction: Direction) -> Vec<&TaskId> {
        let Some(&idx) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.weight().seq, other)
            })
            .collect();
        edges.sort_by_key(|&(seq, _)| seq);
        self.ids(edges.into_iter().map(|(_, other)| other))
    }

    fn edge_snapshot(&self, e: EdgeIndex) -> Option<DependencyEdge> {
        let (a, b) = self.graph.edge_endpoints(e)?;
        let data = self.graph.edge_weight(e)?;
        Some(DependencyEdge {
            from: self.graph.node_weight(a)?.id.clone(),
            to: self.graph.node_weight(b)?.id.clone(),
            kind: data.kind,
            weight: data.weight,
        })
    }

    pub(crate) fn id_at(&self, idx: NodeIndex) -> Option<&TaskId> {
        self.graph.node_weight(idx).map(|v| &v.id)
    }

    /// Maps vertex indices to their ids, skipping stale indices.
    pub(crate) fn ids(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<&TaskId> {
        indices
            .into_iter()
            .filter_map(|idx| self.id_at(idx))
            .collect()
    }

    pub(crate) fn owned_ids(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<TaskId> {
        self.ids(indices).into_iter().cloned().collect()
    }

    pub(crate) fn is_declared(&self, idx: NodeIndex) -> bool {
        self.graph
            .node_weight(idx)
            .is_some_and(|v| v.task.is_some())
    }

    /// Declaration sequence number of a task vertex.
    pub(crate) fn seq_of(&self, idx: NodeIndex) -> u64 {
        self.graph.node_weight(idx).map_or(u64::MAX, |v| v.seq)
    }

    /// Declared task vertices in insertion order.
    pub(crate) fn declared_in_order(&self) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.is_declared(idx))
            .collect();
        indices.sort_by_key(|&idx| self.seq_of(idx));
        indices
    }

    /// Effective weight of a task vertex; placeholders count as [`DEFAULT_WEIGHT`].
    pub(crate) fn task_weight(&self, idx: NodeIndex) -> f64 {
        self.graph
            .node_weight(idx)
            .and_then(|v| v.task.as_ref())
            .map_or(DEFAULT_WEIGHT, TaskNode::effective_weight)
    }

    /// Effective edge weight: explicit, else the source task's weight.
    pub(crate) fn edge_weight(&self, e: EdgeIndex) -> f64 {
        let explicit = self.graph.edge_weight(e).and_then(|d| d.weight);
        match explicit {
            Some(w) => w,
            None => self
                .graph
                .edge_endpoints(e)
                .map_or(DEFAULT_WEIGHT, |(a, _)| self.task_weight(a)),
        }
    }

    /// Hard edges leaving `idx` towards declared tasks, in edge insertion order.
    pub(crate) fn hard_out_edges(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        self.hard_edges(idx, Direction::Outgoing)
    }

    /// Declared tasks with a hard edge into `idx`, in edge insertion order.
    pub(crate) fn hard_predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.hard_edges(idx, Direction::Incoming)
            .into_iter()
            .map(|(_, other)| other)
            .collect()
    }

    fn hard_edges(&self, idx: NodeIndex, direction: Direction) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut edges: Vec<(u64, EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| e.weight().kind == DependencyKind::Hard)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.weight().seq, e.id(), other)
            })
            .filter(|&(_, _, other)| self.is_declared(other))
            .collect();
        edges.sort_by_key(|&(seq, _, _)| seq);
        edges.into_iter().map(|(_, e, other)| (e, other)).collect()
    }

    /// Every edge with its endpoints and kind, in insertion order.
    pub(crate) fn raw_edges(&self) -> Vec<(NodeIndex, NodeIndex, DependencyKind)> {
        let mut edges: Vec<(u64, NodeIndex, NodeIndex, DependencyKind)> = self
            .graph
            .edge_references()
            .map(|e| (e.weight().seq, e.source(), e.target(), e.weight().kind))
            .collect();
        edges.sort_by_key(|&(seq, _, _, _)| seq);
        edges
            .into_iter()
            .map(|(_, a, b, kind)| (a, b, kind))
            .collect()
    }

    /// Returns `true` if the vertex has any incident edge, of any kind.
    pub(crate) fn has_any_edge(&self, idx: NodeIndex) -> bool {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .next()
            .is_some()
            || self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_some()
    }
}
