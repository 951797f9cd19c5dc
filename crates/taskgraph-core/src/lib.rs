#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod analysis;
pub mod error;
pub mod graph;
pub mod newtypes;
pub mod plan;
pub mod task;
pub mod validation;

pub use analysis::{PlanAnalysis, analyze};
pub use error::{GraphError, GraphResult, PlanError};
pub use graph::{BestEffortOrder, CriticalPath, CycleReport, DependencyGraph, RejectedEdge};
pub use newtypes::{TaskId, TaskIdError};
pub use plan::{EdgeDescriptor, TaskDescriptor, TaskPlan};
pub use task::{DEFAULT_WEIGHT, DependencyEdge, DependencyKind, TaskCategory, TaskNode};
pub use validation::{
    Check, DanglingEdge, Diagnostic, Location, Severity, SoftViolation, ValidationConfig,
    ValidationReport,
};

/// Returns the current version of the taskgraph-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
