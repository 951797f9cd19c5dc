//! Task descriptors: ids, titles, categories, weights and layer layout.

use std::ops::Range;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use taskgraph_core::{TaskCategory, TaskDescriptor, TaskId, TaskIdError};

use super::GeneratorConfig;

/// Picks a category; features are twice as likely as anything else.
fn random_category(rng: &mut StdRng) -> TaskCategory {
    match rng.gen_range(0u8..7) {
        0 => TaskCategory::Setup,
        1 | 2 => TaskCategory::Feature,
        3 => TaskCategory::Integration,
        4 => TaskCategory::Testing,
        5 => TaskCategory::Documentation,
        _ => TaskCategory::Deployment,
    }
}

const VERBS: &[&str] = &[
    "Implement", "Wire up", "Review", "Refactor", "Document", "Benchmark", "Harden",
];

const SUBJECTS: &[&str] = &[
    "auth service",
    "billing API",
    "search index",
    "CI pipeline",
    "audit log",
    "user dashboard",
    "export job",
    "rate limiter",
];

/// Returns the id of the `index`-th generated task.
pub fn task_id(index: usize) -> Result<TaskId, TaskIdError> {
    TaskId::try_from(format!("T{index:05}"))
}

/// Builds every task descriptor, layered tasks first, isolated tasks last.
///
/// `depends_on` is left empty; edges are added by [`super::edges`].
pub fn build_tasks(
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Vec<TaskDescriptor>, TaskIdError> {
    let total = config.num_tasks + config.num_isolated;
    let mut tasks = Vec::with_capacity(total);
    for i in 0..total {
        let category = Some(random_category(rng));
        let verb = VERBS.choose(rng).copied().unwrap_or("Build");
        let subject = SUBJECTS.choose(rng).copied().unwrap_or("component");
        let weight = rng
            .gen_bool(config.weighted_ratio.clamp(0.0, 1.0))
            .then(|| f64::from(rng.gen_range(1u8..=8)));
        tasks.push(TaskDescriptor {
            id: task_id(i)?,
            title: format!("{verb} {subject}"),
            weight,
            category,
            depends_on: Vec::new(),
        });
    }
    Ok(tasks)
}

/// Splits `num_tasks` into `num_layers` contiguous, near-equal index ranges.
///
/// Empty layers are dropped, so fewer ranges than requested come back when
/// there are more layers than tasks.
pub fn layer_bounds(num_tasks: usize, num_layers: usize) -> Vec<Range<usize>> {
    let layers = num_layers.max(1);
    (0..layers)
        .map(|k| (k * num_tasks / layers)..((k + 1) * num_tasks / layers))
        .filter(|range| !range.is_empty())
        .collect()
}
