/// Structural validation report for a [`DependencyGraph`].
///
/// [`DependencyGraph::validate`] never fails. It gathers every finding into a
/// [`ValidationReport`] and leaves the decision to block downstream work to
/// the caller: cycles, dangling edges and rejected self-loops should normally
/// block ([`ValidationReport::is_blocking`]), isolated tasks should not.
///
/// [`ValidationReport::diagnostics`] flattens the report into [`Diagnostic`]
/// values with a [`Check`], a [`Severity`] and a [`Location`], ready to be
/// rendered by a front end.
use std::collections::HashMap;
use std::fmt;

use petgraph::stable_graph::NodeIndex;
use serde::{Serialize, Serializer};

use crate::graph::{DependencyGraph, RejectedEdge};
use crate::newtypes::TaskId;
use crate::task::DependencyKind;


// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// The severity level of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The plan is structurally broken; downstream work should not start.
    Error,
    /// The plan is usable but suspect.
    Warning,
    /// Observation only.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("Error"),
            Self::Warning => f.write_str("Warning"),
            Self::Info => f.write_str("Info"),
        }
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Machine-readable identifier of the check that produced a finding.
///
/// [`Check::code`] returns the stable kebab-case form used in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Check {
    /// A directed cycle among hard edges.
    Cycle,
    /// An edge whose endpoint has no task.
    DanglingEdge,
    /// An attempted edge from a task to itself.
    SelfLoop,
    /// A task with no edges at all.
    IsolatedTask,
    /// Most tasks are isolated; the plan generator likely failed.
    MostlyIsolated,
    /// A soft edge that the hard-edge order does not honour.
    SoftEdgeViolation,
}

impl Check {
    /// Returns the stable kebab-case code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::DanglingEdge => "dangling-edge",
            Self::SelfLoop => "self-loop",
            Self::IsolatedTask => "isolated-task",
            Self::MostlyIsolated => "mostly-isolated",
            Self::SoftEdgeViolation => "soft-edge-violation",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Check {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Where in the graph a finding applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// A single task.
    Task {
        /// The task id.
        id: TaskId,
    },
    /// A single edge.
    Edge {
        /// Source task id.
        from: TaskId,
        /// Target task id.
        to: TaskId,
    },
    /// A closed cycle of tasks.
    Cycle {
        /// The cycle, first and last entries equal.
        path: Vec<TaskId>,
    },
    /// The graph as a whole.
    Global,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task { id } => write!(f, "task \"{id}\""),
            Self::Edge { from, to } => write!(f, "edge \"{from}\" -> \"{to}\""),
            Self::Cycle { path } => {
                let joined: Vec<&str> = path.iter().map(TaskId::as_str).collect();
                write!(f, "cycle {}", joined.join(" -> "))
            }
            Self::Global => f.write_str("(global)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The check that produced this finding.
    pub check: Check,
    /// How serious the finding is.
    pub severity: Severity,
    /// Where the problem was detected.
    pub location: Location,
    /// A human-readable explanation.
    pub message: String,
}

impl Diagnostic {
    /// Constructs a new [`Diagnostic`].
    pub fn new(
        check: Check,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check,
            severity,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_char = match self.severity {
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Info => 'I',
        };
        write!(
            f,
            "[{level_char}] {} {}: {}",
            self.check, self.location, self.message
        )
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// An edge with at least one endpoint that is not a declared task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEdge {
    /// Source task id.
    pub from: TaskId,
    /// Target task id.
    pub to: TaskId,
    /// Edge kind.
    pub kind: DependencyKind,
    /// The endpoint ids with no task, `from` before `to`.
    pub missing: Vec<TaskId>,
}

/// A soft edge `from → to` where the hard-edge order places `to` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftViolation {
    /// Task the hint says should come first.
    pub from: TaskId,
    /// Task the hint says should come later.
    pub to: TaskId,
}

/// Tuning knobs for [`DependencyGraph::validate_with`].
///
/// ```
/// use taskgraph_core::ValidationConfig;
///
/// let cfg = ValidationConfig::default();
/// assert_eq!(cfg.isolation_ratio, 0.5);
/// assert!(cfg.check_soft_edges);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Share of isolated tasks above which the plan is flagged as mostly
    /// isolated. Only applies when there is more than one task.
    pub isolation_ratio: f64,
    /// Compare soft edges against the hard-edge order (acyclic graphs only).
    pub check_soft_edges: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            isolation_ratio: 0.5,
            check_soft_edges: true,
        }
    }
}

/// The collected output of [`DependencyGraph::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// `true` when at least one hard-edge cycle exists.
    pub has_cycles: bool,
    /// Closed cycles, as reported by [`DependencyGraph::detect_cycles`].
    pub cycles: Vec<Vec<TaskId>>,
    /// Edges referencing ids with no task, in edge insertion order.
    pub dangling_edges: Vec<DanglingEdge>,
    /// Tasks with no incoming and no outgoing edges, in insertion order.
    pub isolated_nodes: Vec<TaskId>,
    /// More than [`ValidationConfig::isolation_ratio`] of several tasks are
    /// isolated.
    pub mostly_isolated: bool,
    /// Self-loops rejected at the mutation boundary.
    pub rejected_edges: Vec<RejectedEdge>,
    /// Soft edges the hard-edge order contradicts.
    pub soft_violations: Vec<SoftViolation>,
    /// Number of tasks at validation time.
    pub node_count: usize,
}

impl ValidationReport {
    /// Returns `true` when any error-severity finding is present.
    pub fn is_blocking(&self) -> bool {
        self.has_cycles || !self.dangling_edges.is_empty() || !self.rejected_edges.is_empty()
    }

    /// Returns `true` when there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        !self.is_blocking()
            && self.isolated_nodes.is_empty()
            && !self.mostly_isolated
            && self.soft_violations.is_empty()
    }

    /// Flattens the report into diagnostics, errors first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        for cycle in &self.cycles {
            out.push(Diagnostic::new(
                Check::Cycle,
                Severity::Error,
                Location::Cycle {
                    path: cycle.clone(),
                },
                "hard dependencies form a cycle; no execution order exists",
            ));
        }

        for edge in &self.dangling_edges {
            let missing: Vec<&str> = edge.missing.iter().map(TaskId::as_str).collect();
            out.push(Diagnostic::new(
                Check::DanglingEdge,
                Severity::Error,
                Location::Edge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                },
                format!("{} edge references unknown task(s): {}", edge.kind, missing.join(", ")),
            ));
        }

        for rejected in &self.rejected_edges {
            out.push(Diagnostic::new(
                Check::SelfLoop,
                Severity::Error,
                Location::Task {
                    id: rejected.id.clone(),
                },
                format!("{} self-dependency was rejected", rejected.kind),
            ));
        }

        if self.mostly_isolated {
            out.push(Diagnostic::new(
                Check::MostlyIsolated,
                Severity::Warning,
                Location::Global,
                format!(
                    "{} of {} tasks have no dependencies; dependency generation likely failed",
                    self.isolated_nodes.len(),
                    self.node_count
                ),
            ));
        }

        for violation in &self.soft_violations {
            out.push(Diagnostic::new(
                Check::SoftEdgeViolation,
                Severity::Warning,
                Location::Edge {
                    from: violation.from.clone(),
                    to: violation.to.clone(),
                },
                "soft dependency is not honoured by the execution order",
            ));
        }

        for id in &self.isolated_nodes {
            out.push(Diagnostic::new(
                Check::IsolatedTask,
                Severity::Info,
                Location::Task { id: id.clone() },
                "task has no dependencies and no dependents",
            ));
        }

        out
    }
}

// ---------------------------------------------------------------------------
// DependencyGraph entry points
// ---------------------------------------------------------------------------

impl DependencyGraph {
    /// Validates the graph with [`ValidationConfig::default`].
    pub fn validate(&self) -> ValidationReport {
        self.validate_with(&ValidationConfig::default())
    }

    /// Validates the graph. Never fails.
    pub fn validate_with(&self, config: &ValidationConfig) -> ValidationReport {
        let cycle_report = self.detect_cycles();
        let node_count = self.node_count();

        let mut dangling_edges = Vec::new();
        let mut soft_edges = Vec::new();
        for (a, b, kind) in self.raw_edges() {
            let (Some(from), Some(to)) = (self.id_at(a), self.id_at(b)) else {
                continue;
            };
            let missing: Vec<TaskId> = [(a, from), (b, to)]
                .into_iter()
                .filter(|&(idx, _)| !self.is_declared(idx))
                .map(|(_, id)| id.clone())
                .collect();
            if !missing.is_empty() {
                dangling_edges.push(DanglingEdge {
                    from: from.clone(),
                    to: to.clone(),
                    kind,
                    missing,
                });
            } else if kind == DependencyKind::Soft {
                soft_edges.push((a, b, from, to));
            }
        }

        let isolated = self
            .declared_in_order()
            .into_iter()
            .filter(|&idx| !self.has_any_edge(idx));
        let isolated_nodes = self.owned_ids(isolated);

        #[allow(clippy::cast_precision_loss)]
        let mostly_isolated = node_count > 1
            && (isolated_nodes.len() as f64 / node_count as f64) > config.isolation_ratio;

        let mut soft_violations = Vec::new();
        if config.check_soft_edges && !cycle_report.has_cycles && !soft_edges.is_empty() {
            if let Ok(order) = self.topo_indices() {
                let position: HashMap<NodeIndex, usize> =
                    order.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
                for (a, b, from, to) in soft_edges {
                    if let (Some(pa), Some(pb)) = (position.get(&a), position.get(&b)) {
                        if pb < pa {
                            soft_violations.push(SoftViolation {
                                from: from.clone(),
                                to: to.clone(),
                            });
                        }
                    }
                }
            }
        }

        let report = ValidationReport {
            has_cycles: cycle_report.has_cycles,
            cycles: cycle_report.cycles,
            dangling_edges,
            isolated_nodes,
            mostly_isolated,
            rejected_edges: self.rejected_edges().to_vec(),
            soft_violations,
            node_count,
        };

        tracing::debug!(
            cycles = report.cycles.len(),
            dangling = report.dangling_edges.len(),
            isolated = report.isolated_nodes.len(),
            blocking = report.is_blocking(),
            "validation finished"
        );

        report
    }
}
