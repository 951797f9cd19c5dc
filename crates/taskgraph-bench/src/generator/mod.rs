//! Task plan generator.
//!
//! Produces [`TaskPlan`] instances with a layered dependency structure,
//! mixed hard and soft edges, optional explicit weights and an optional
//! number of injected cycles.

pub mod edges;
pub mod tasks;

use rand::SeedableRng;
use rand::rngs::StdRng;
use taskgraph_core::{TaskIdError, TaskPlan};

/// Configuration for the plan generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of tasks that take part in the layered structure.
    pub num_tasks: usize,
    /// Number of tasks with no edges at all, appended after the layers.
    pub num_isolated: usize,
    /// Number of dependency layers; tasks in layer 0 have no prerequisites.
    pub num_layers: usize,
    /// Maximum number of hard prerequisites per task.
    pub max_fan_in: usize,
    /// Probability that a prerequisite comes from any earlier layer rather
    /// than the layer directly above (0.0-1.0).
    pub skip_layer_ratio: f64,
    /// Probability that a prerequisite is written as an explicit weighted
    /// edge instead of a `depends_on` entry (0.0-1.0).
    pub edge_weight_ratio: f64,
    /// Probability that a task gets one extra soft edge (0.0-1.0).
    pub soft_edge_ratio: f64,
    /// Probability that a task carries an explicit weight (0.0-1.0).
    pub weighted_ratio: f64,
    /// Number of back edges to add; each one closes a hard cycle.
    pub inject_cycles: usize,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 50 tasks in 5 layers
    Small,
    /// 500 tasks in 10 layers
    Medium,
    /// 2 000 tasks in 20 layers
    Large,
    /// 10 000 tasks in 40 layers
    XLarge,
}

impl SizeTier {
    /// Returns the default [`GeneratorConfig`] for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        let (num_tasks, num_isolated, num_layers, max_fan_in) = match self {
            SizeTier::Small => (48, 2, 5, 3),
            SizeTier::Medium => (490, 10, 10, 4),
            SizeTier::Large => (1_980, 20, 20, 5),
            SizeTier::XLarge => (9_950, 50, 40, 6),
        };
        GeneratorConfig {
            seed,
            num_tasks,
            num_isolated,
            num_layers,
            max_fan_in,
            skip_layer_ratio: 0.2,
            edge_weight_ratio: 0.1,
            soft_edge_ratio: 0.15,
            weighted_ratio: 0.6,
            inject_cycles: 0,
        }
    }
}

/// Generates a task plan from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
///
/// # Errors
///
/// Only if a generated id fails [`taskgraph_core::TaskId`] validation, which
/// the `T00042` id scheme never does.
pub fn generate_plan(config: &GeneratorConfig) -> Result<TaskPlan, TaskIdError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tasks = tasks::build_tasks(config, &mut rng)?;
    let layers = tasks::layer_bounds(config.num_tasks, config.num_layers);
    let mut edges = edges::link_layers(config, &layers, &mut tasks, &mut rng);
    edges.extend(edges::soft_edges(config, &layers, &tasks, &mut rng));
    edges.extend(edges::back_edges(config.inject_cycles, &tasks, &mut rng));
    Ok(TaskPlan { tasks, edges })
}
