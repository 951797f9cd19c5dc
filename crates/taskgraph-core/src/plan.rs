/// JSON task-plan ingestion.
///
/// A [`TaskPlan`] is the flat document a task generator emits: a list of
/// tasks, each optionally naming the tasks it depends on, plus an optional
/// list of explicit edges carrying a kind or weight.
///
/// ```json
/// {
///   "tasks": [
///     { "id": "setup", "title": "Create repository", "category": "setup" },
///     { "id": "login", "title": "Implement login", "depends_on": ["setup"] }
///   ],
///   "edges": [
///     { "from": "login", "to": "docs", "kind": "soft" }
///   ]
/// }
/// ```
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, PlanError};
use crate::graph::DependencyGraph;
use crate::newtypes::TaskId;
use crate::task::{DependencyKind, TaskCategory, TaskNode};

/// One task as described by a plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Stable unique identifier.
    pub id: TaskId,
    /// Human-readable label.
    pub title: String,
    /// Explicit cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Classification used for weight estimation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    /// Ids this task cannot start before; each becomes a hard edge `dep → id`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<TaskId>,
}

/// An explicit edge in a plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    /// Prerequisite task id.
    pub from: TaskId,
    /// Dependent task id.
    pub to: TaskId,
    /// Defaults to `hard`.
    #[serde(default)]
    pub kind: DependencyKind,
    /// Explicit edge cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// A complete plan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    /// Tasks in generation order; this order becomes the insertion order.
    pub tasks: Vec<TaskDescriptor>,
    /// Extra edges, applied after every `depends_on` entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeDescriptor>,
}

impl TaskPlan {
    /// Parses a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// [`PlanError::Json`] when the input is not valid JSON, does not match
    /// the plan shape, or contains an invalid task id.
    pub fn from_json(input: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes the plan to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`PlanError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DependencyGraph {
    /// Builds a graph from a plan.
    ///
    /// Tasks are added first, then `depends_on` edges, then explicit edges,
    /// so an explicit edge overrides the kind and weight of a declared
    /// dependency between the same pair. A repeated task id replaces the
    /// earlier task. Self-dependencies are recorded as rejected edges and
    /// surface through [`DependencyGraph::validate`]; they do not fail the
    /// build.
    ///
    /// # Errors
    ///
    /// [`PlanError::Graph`] when a task or edge weight is negative or not
    /// finite.
    pub fn from_plan(plan: &TaskPlan) -> Result<Self, PlanError> {
        let mut graph = Self::new();

        for task in &plan.tasks {
            if graph.contains_node(&task.id) {
                tracing::warn!(task = %task.id, "duplicate task id in plan; later entry wins");
            }
            let mut node = TaskNode::new(task.id.clone(), task.title.clone());
            if let Some(weight) = task.weight {
                node = node.with_weight(weight)?;
            }
            if let Some(category) = &task.category {
                node = node.with_category(category.clone());
            }
            graph.add_node(node);
        }

        for task in &plan.tasks {
            for dep in &task.depends_on {
                tolerate_self_loop(graph.add_edge(
                    dep.clone(),
                    task.id.clone(),
                    DependencyKind::Hard,
                    None,
                ))?;
            }
        }

        for edge in &plan.edges {
            tolerate_self_loop(graph.add_edge(
                edge.from.clone(),
                edge.to.clone(),
                edge.kind,
                edge.weight,
            ))?;
        }

        tracing::debug!(
            tasks = graph.node_count(),
            edges = graph.edge_count(),
            "graph built from plan"
        );
        Ok(graph)
    }
}

fn tolerate_self_loop(result: Result<(), GraphError>) -> Result<(), GraphError> {
    match result {
        Err(GraphError::InvalidEdge { .. }) => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    const SAMPLE: &str = r#"{
        "tasks": [
            { "id": "setup", "title": "Create repository", "category": "setup" },
            { "id": "login", "title": "Implement login", "depends_on": ["setup"] },
            { "id": "docs", "title": "Write docs", "weight": 0.5 }
        ],
        "edges": [
            { "from": "login", "to": "docs", "kind": "soft" }
        ]
    }"#;

    #[test]
    fn parses_and_builds_sample_plan() {
        let plan = TaskPlan::from_json(SAMPLE).expect("valid plan");
        assert_eq!(plan.tasks.len(), 3);
        assert_eq!(plan.edges[0].kind, DependencyKind::Soft);

        let graph = DependencyGraph::from_plan(&plan).expect("build");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors("setup"), ["login"]);
        assert_eq!(
            graph.node("setup").map(TaskNode::effective_weight),
            Some(2.0)
        );
    }

    #[test]
    fn explicit_edge_overrides_depends_on() {
        let json = r#"{
            "tasks": [
                { "id": "a", "title": "A" },
                { "id": "b", "title": "B", "depends_on": ["a"] }
            ],
            "edges": [ { "from": "a", "to": "b", "kind": "soft", "weight": 4 } ]
        }"#;
        let graph = DependencyGraph::from_plan(&TaskPlan::from_json(json).expect("parse"))
            .expect("build");
        let edge = graph.edge("a", "b").expect("edge");
        assert_eq!(edge.kind, DependencyKind::Soft);
        assert_eq!(edge.weight, Some(4.0));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn edge_kind_defaults_to_hard() {
        let json = r#"{ "tasks": [], "edges": [ { "from": "a", "to": "b" } ] }"#;
        let plan = TaskPlan::from_json(json).expect("parse");
        assert_eq!(plan.edges[0].kind, DependencyKind::Hard);
    }

    #[test]
    fn self_dependency_is_recorded_not_fatal() {
        let json = r#"{ "tasks": [ { "id": "a", "title": "A", "depends_on": ["a"] } ] }"#;
        let graph = DependencyGraph::from_plan(&TaskPlan::from_json(json).expect("parse"))
            .expect("build");
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.rejected_edges().len(), 1);
        assert!(graph.validate().is_blocking());
    }

    #[test]
    fn unknown_dependency_becomes_dangling_edge() {
        let json = r#"{ "tasks": [ { "id": "a", "title": "A", "depends_on": ["ghost"] } ] }"#;
        let graph = DependencyGraph::from_plan(&TaskPlan::from_json(json).expect("parse"))
            .expect("build");
        let report = graph.validate();
        assert_eq!(report.dangling_edges.len(), 1);
        assert_eq!(report.dangling_edges[0].from, "ghost");
    }

    #[test]
    fn negative_weight_fails_the_build() {
        let json = r#"{ "tasks": [ { "id": "a", "title": "A", "weight": -1 } ] }"#;
        let plan = TaskPlan::from_json(json).expect("parse");
        let err = DependencyGraph::from_plan(&plan).expect_err("invalid weight");
        assert!(matches!(
            err,
            PlanError::Graph(GraphError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn invalid_task_id_is_a_json_error() {
        let json = r#"{ "tasks": [ { "id": "", "title": "A" } ] }"#;
        assert!(matches!(TaskPlan::from_json(json), Err(PlanError::Json(_))));
    }

    #[test]
    fn duplicate_task_id_keeps_later_entry() {
        let json = r#"{ "tasks": [
            { "id": "a", "title": "First" },
            { "id": "b", "title": "B" },
            { "id": "a", "title": "Second" }
        ] }"#;
        let graph = DependencyGraph::from_plan(&TaskPlan::from_json(json).expect("parse"))
            .expect("build");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node("a").map(|n| n.title.as_str()), Some("Second"));
        let ids: Vec<&str> = graph.node_ids().into_iter().map(TaskId::as_str).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn plan_round_trips_through_json() {
        let plan = TaskPlan::from_json(SAMPLE).expect("parse");
        let json = plan.to_json_pretty().expect("serialize");
        assert_eq!(TaskPlan::from_json(&json).expect("reparse"), plan);
    }
}
