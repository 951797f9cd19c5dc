/// One-shot analysis combining validation with every derived view.
use serde::Serialize;

use crate::graph::{CriticalPath, DependencyGraph};
use crate::newtypes::TaskId;
use crate::validation::{Diagnostic, ValidationReport};

/// Everything a caller needs to render or export a plan.
///
/// The derived views are `None` when the graph has a hard-edge cycle; the
/// report then says why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAnalysis {
    /// Structural findings.
    pub report: ValidationReport,
    /// Flattened findings, errors first.
    pub diagnostics: Vec<Diagnostic>,
    /// Topological order.
    pub order: Option<Vec<TaskId>>,
    /// Longest weighted path.
    pub critical_path: Option<CriticalPath>,
    /// Parallel batches.
    pub batches: Option<Vec<Vec<TaskId>>>,
}

impl PlanAnalysis {
    /// Returns `true` when the derived views could be computed.
    pub fn is_schedulable(&self) -> bool {
        self.order.is_some()
    }
}

/// Validates `graph` and computes order, critical path and batches.
///
/// Cycle detection runs once; the derived views are skipped entirely on a
/// cyclic graph instead of each failing separately.
pub fn analyze(graph: &DependencyGraph) -> PlanAnalysis {
    let report = graph.validate();
    let diagnostics = report.diagnostics();

    if report.has_cycles {
        return PlanAnalysis {
            report,
            diagnostics,
            order: None,
            critical_path: None,
            batches: None,
        };
    }

    PlanAnalysis {
        report,
        diagnostics,
        order: graph.topological_sort().ok(),
        critical_path: graph.critical_path().ok(),
        batches: graph.parallel_batches().ok(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::task::{DependencyKind, TaskNode};

    fn tid(s: &str) -> TaskId {
        TaskId::try_from(s).expect("valid TaskId")
    }

    fn graph_of(ids: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for id in ids {
            g.add_node(TaskNode::new(tid(id), *id));
        }
        for (from, to) in edges {
            g.add_edge(tid(from), tid(to), DependencyKind::Hard, None)
                .expect("valid edge");
        }
        g
    }

    #[test]
    fn acyclic_graph_gets_every_view() {
        let g = graph_of(&["A", "B", "C"], &[("A", "B"), ("A", "C")]);
        let analysis = analyze(&g);

        assert!(analysis.is_schedulable());
        assert_eq!(analysis.order, Some(vec![tid("A"), tid("B"), tid("C")]));
        assert_eq!(
            analysis.batches,
            Some(vec![vec![tid("A")], vec![tid("B"), tid("C")]])
        );
        let cp = analysis.critical_path.expect("critical path");
        assert_eq!(cp.tasks, vec![tid("A"), tid("C")]);
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn cyclic_graph_gets_report_only() {
        let g = graph_of(&["A", "B"], &[("A", "B"), ("B", "A")]);
        let analysis = analyze(&g);

        assert!(!analysis.is_schedulable());
        assert!(analysis.report.has_cycles);
        assert!(analysis.critical_path.is_none());
        assert!(analysis.batches.is_none());
        assert!(!analysis.diagnostics.is_empty());
    }

    #[test]
    fn analysis_serializes_nulls_for_missing_views() {
        let g = graph_of(&["A", "B"], &[("A", "B"), ("B", "A")]);
        let value = serde_json::to_value(analyze(&g)).expect("serialize");
        assert!(value["order"].is_null());
        assert_eq!(value["report"]["has_cycles"], serde_json::json!(true));
    }
}
