/// Error types for graph mutation, derived views, and plan ingestion.
///
/// Only two kinds of operation can fail: mutations that would break a model
/// invariant (self-loops, invalid weights) and derived views that require an
/// acyclic hard-edge graph. Dangling edges and isolated nodes are never
/// errors; they surface through [`crate::ValidationReport`].
use crate::newtypes::TaskId;

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by [`crate::DependencyGraph`] operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// An edge from a task to itself was rejected at the mutation boundary.
    #[error("task {id} cannot depend on itself")]
    InvalidEdge {
        /// The task named as both endpoints.
        id: TaskId,
    },

    /// The hard-edge graph contains a cycle, so no execution order exists.
    ///
    /// `cycle` is one closed example cycle (first and last entries equal).
    #[error("dependency cycle detected: {}", format_cycle(.cycle))]
    CyclicGraph {
        /// One example cycle, closed back to its start node.
        cycle: Vec<TaskId>,
    },

    /// A task or edge weight was negative, NaN, or infinite.
    #[error("invalid weight {value}: weights must be finite and non-negative")]
    InvalidWeight {
        /// The rejected value.
        value: f64,
    },
}

impl GraphError {
    /// Creates a cyclic-graph error for the given closed cycle.
    pub fn cyclic(cycle: Vec<TaskId>) -> Self {
        Self::CyclicGraph { cycle }
    }
}

/// Errors raised while turning a JSON task plan into a graph.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The document is not valid JSON or does not match the plan schema
    /// (including task ids that fail [`TaskId`] validation).
    #[error("invalid task plan: {0}")]
    Json(#[from] serde_json::Error),

    /// A task or edge in the plan carries an invalid weight.
    #[error("invalid task plan: {0}")]
    Graph(#[from] GraphError),
}

/// Checks that `value` is usable as a task or edge weight.
pub(crate) fn check_weight(value: f64) -> GraphResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GraphError::InvalidWeight { value })
    }
}

fn format_cycle(cycle: &[TaskId]) -> String {
    cycle
        .iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn tid(s: &str) -> TaskId {
        TaskId::try_from(s).expect("valid TaskId")
    }

    #[test]
    fn cyclic_graph_display_joins_path() {
        let err = GraphError::cyclic(vec![tid("A"), tid("B"), tid("A")]);
        assert_eq!(err.to_string(), "dependency cycle detected: A -> B -> A");
    }

    #[test]
    fn invalid_edge_display_names_task() {
        let err = GraphError::InvalidEdge { id: tid("X") };
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn check_weight_rejects_negative_and_non_finite() {
        assert!(check_weight(0.0).is_ok());
        assert!(check_weight(2.5).is_ok());
        assert!(check_weight(-1.0).is_err());
        assert!(check_weight(f64::NAN).is_err());
        assert!(check_weight(f64::INFINITY).is_err());
    }
}
