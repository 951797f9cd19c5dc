/// Task and dependency data model.
///
/// [`TaskNode`] is one unit of work; [`DependencyEdge`] is a directed
/// `from → to` relation meaning "`to` cannot start until `from` completes".
/// Every optional field has a stated default, resolved through
/// [`TaskNode::effective_weight`] rather than at each call site.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::{GraphResult, check_weight};
use crate::newtypes::TaskId;

/// Weight used when neither an explicit weight nor a category estimate exists.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ---------------------------------------------------------------------------
// TaskCategory
// ---------------------------------------------------------------------------

/// Classification of a task, used only for weight estimation and reporting.
///
/// Serializes to a lowercase string. Unknown strings deserialize into
/// [`TaskCategory::Extension`] rather than failing, so task generators can
/// introduce new categories without breaking ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskCategory {
    /// Project scaffolding, environment, tooling.
    Setup,
    /// User-facing functionality.
    Feature,
    /// Wiring components or external services together.
    Integration,
    /// Test suites and QA work.
    Testing,
    /// Docs, guides, READMEs.
    Documentation,
    /// Release, packaging, infrastructure rollout.
    Deployment,
    /// Any category not recognised by this crate.
    Extension(String),
}

impl TaskCategory {
    /// Returns the lowercase string form of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Setup => "setup",
            Self::Feature => "feature",
            Self::Integration => "integration",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
            Self::Deployment => "deployment",
            Self::Extension(s) => s.as_str(),
        }
    }

    /// Heuristic cost estimate for a task of this category.
    pub fn estimated_weight(&self) -> f64 {
        match self {
            Self::Feature | Self::Integration => 3.0,
            Self::Setup | Self::Testing | Self::Deployment => 2.0,
            Self::Documentation | Self::Extension(_) => DEFAULT_WEIGHT,
        }
    }

    fn from_str_lossless(s: &str) -> Self {
        match s {
            "setup" => Self::Setup,
            "feature" => Self::Feature,
            "integration" => Self::Integration,
            "testing" => Self::Testing,
            "documentation" => Self::Documentation,
            "deployment" => Self::Deployment,
            other => Self::Extension(other.to_owned()),
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaskCategoryVisitor;

        impl de::Visitor<'_> for TaskCategoryVisitor {
            type Value = TaskCategory;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string naming a task category")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(TaskCategory::from_str_lossless(v))
            }
        }

        deserializer.deserialize_str(TaskCategoryVisitor)
    }
}

// ---------------------------------------------------------------------------
// DependencyKind
// ---------------------------------------------------------------------------

/// Strength of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Strict precedence; every ordering must respect it.
    #[default]
    Hard,
    /// Advisory ordering hint; violating it is a warning, not an error.
    Soft,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hard => f.write_str("hard"),
            Self::Soft => f.write_str("soft"),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskNode
// ---------------------------------------------------------------------------

/// One unit of work in a planning session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskNode {
    /// Stable unique identifier.
    pub id: TaskId,
    /// Human-readable label; may repeat across tasks.
    pub title: String,
    /// Explicit cost, if the generator supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    /// Optional classification used for weight estimation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
}

impl TaskNode {
    /// Creates a task with no explicit weight and no category.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            weight: None,
            category: None,
        }
    }

    /// Sets an explicit weight.
    ///
    /// # Errors
    ///
    /// [`crate::GraphError::InvalidWeight`] when `weight` is negative or not finite.
    pub fn with_weight(mut self, weight: f64) -> GraphResult<Self> {
        self.weight = Some(check_weight(weight)?);
        Ok(self)
    }

    /// Sets the task category.
    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns the explicit weight, if one was set.
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Returns the cost used for critical-path computation.
    ///
    /// Explicit weight, else the category estimate, else [`DEFAULT_WEIGHT`].
    pub fn effective_weight(&self) -> f64 {
        self.weight
            .or_else(|| self.category.as_ref().map(TaskCategory::estimated_weight))
            .unwrap_or(DEFAULT_WEIGHT)
    }
}

// ---------------------------------------------------------------------------
// DependencyEdge
// ---------------------------------------------------------------------------

/// A directed dependency: `to` cannot start until `from` completes.
///
/// This is a read-only snapshot handed out by the graph; edges are created
/// through [`crate::DependencyGraph::add_edge`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEdge {
    /// The prerequisite task.
    pub from: TaskId,
    /// The dependent task.
    pub to: TaskId,
    /// Hard or soft.
    pub kind: DependencyKind,
    /// Explicit edge cost, if one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn tid(s: &str) -> TaskId {
        TaskId::try_from(s).expect("valid TaskId")
    }

    #[test]
    fn effective_weight_prefers_explicit_weight() {
        let node = TaskNode::new(tid("a"), "A")
            .with_category(TaskCategory::Feature)
            .with_weight(5.0)
            .expect("valid weight");
        assert_eq!(node.effective_weight(), 5.0);
    }

    #[test]
    fn effective_weight_falls_back_to_category_then_default() {
        let categorised = TaskNode::new(tid("a"), "A").with_category(TaskCategory::Feature);
        assert_eq!(categorised.effective_weight(), 3.0);

        let bare = TaskNode::new(tid("b"), "B");
        assert_eq!(bare.effective_weight(), DEFAULT_WEIGHT);
    }

    #[test]
    fn zero_weight_is_allowed() {
        let node = TaskNode::new(tid("a"), "A")
            .with_weight(0.0)
            .expect("zero is valid");
        assert_eq!(node.effective_weight(), 0.0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let result = TaskNode::new(tid("a"), "A").with_weight(-2.0);
        assert!(result.is_err());
    }

    #[test]
    fn category_round_trips_known_and_extension() {
        let known: TaskCategory = serde_json::from_str("\"testing\"").expect("parse");
        assert_eq!(known, TaskCategory::Testing);
        assert_eq!(serde_json::to_string(&known).expect("ser"), "\"testing\"");

        let ext: TaskCategory = serde_json::from_str("\"research\"").expect("parse");
        assert_eq!(ext, TaskCategory::Extension("research".to_owned()));
        assert_eq!(ext.estimated_weight(), DEFAULT_WEIGHT);
    }

    #[test]
    fn dependency_kind_defaults_to_hard() {
        assert_eq!(DependencyKind::default(), DependencyKind::Hard);
        let soft: DependencyKind = serde_json::from_str("\"soft\"").expect("parse");
        assert_eq!(soft, DependencyKind::Soft);
    }

    #[test]
    fn edge_display_shows_direction_and_kind() {
        let edge = DependencyEdge {
            from: tid("a"),
            to: tid("b"),
            kind: DependencyKind::Soft,
            weight: None,
        };
        assert_eq!(edge.to_string(), "a -> b (soft)");
    }
}
