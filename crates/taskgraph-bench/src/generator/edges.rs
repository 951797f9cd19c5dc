//! Edge strategies: layered hard prerequisites, soft hints, and optional
//! cycle injection.

use std::collections::HashSet;
use std::ops::Range;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use taskgraph_core::{DependencyKind, EdgeDescriptor, TaskDescriptor};

use super::GeneratorConfig;

/// Gives every task outside layer 0 between one and `max_fan_in` hard
/// prerequisites from earlier layers.
///
/// Most prerequisites are recorded in `depends_on`; a fraction becomes
/// explicit weighted edges, which are returned. Every layer-0 task ends up
/// as a prerequisite of something, so only the appended isolated tasks are
/// edge-free.
pub fn link_layers(
    config: &GeneratorConfig,
    layers: &[Range<usize>],
    tasks: &mut [TaskDescriptor],
    rng: &mut StdRng,
) -> Vec<EdgeDescriptor> {
    let mut explicit = Vec::new();
    let mut used: HashSet<usize> = HashSet::new();
    for (k, layer) in layers.iter().enumerate().skip(1) {
        let above = &layers[k - 1];
        for i in layer.clone() {
            let fan_in = rng.gen_range(1..=config.max_fan_in.max(1));
            let mut chosen: HashSet<usize> = HashSet::with_capacity(fan_in);
            for _ in 0..fan_in {
                let pred = if rng.gen_bool(config.skip_layer_ratio.clamp(0.0, 1.0)) {
                    rng.gen_range(0..above.end)
                } else {
                    rng.gen_range(above.clone())
                };
                if !chosen.insert(pred) {
                    continue;
                }
                used.insert(pred);
                let from = tasks[pred].id.clone();
                if rng.gen_bool(config.edge_weight_ratio.clamp(0.0, 1.0)) {
                    explicit.push(EdgeDescriptor {
                        from,
                        to: tasks[i].id.clone(),
                        kind: DependencyKind::Hard,
                        weight: Some(f64::from(rng.gen_range(0u8..=4))),
                    });
                } else {
                    tasks[i].depends_on.push(from);
                }
            }
        }
    }

    if let (Some(roots), Some(next)) = (layers.first(), layers.get(1)) {
        for root in roots.clone().filter(|r| !used.contains(r)) {
            let dependent = rng.gen_range(next.clone());
            let from = tasks[root].id.clone();
            tasks[dependent].depends_on.push(from);
        }
    }
    explicit
}

/// Adds one soft edge into a fraction of the layered tasks, always from a
/// strictly earlier layer. Pairs already linked through `depends_on` are
/// skipped.
pub fn soft_edges(
    config: &GeneratorConfig,
    layers: &[Range<usize>],
    tasks: &[TaskDescriptor],
    rng: &mut StdRng,
) -> Vec<EdgeDescriptor> {
    let mut soft = Vec::new();
    for layer in layers.iter().skip(1) {
        for i in layer.clone() {
            if !rng.gen_bool(config.soft_edge_ratio.clamp(0.0, 1.0)) {
                continue;
            }
            let from = rng.gen_range(0..layer.start);
            let already_hard = tasks[i].depends_on.contains(&tasks[from].id);
            if already_hard {
                continue;
            }
            soft.push(EdgeDescriptor {
                from: tasks[from].id.clone(),
                to: tasks[i].id.clone(),
                kind: DependencyKind::Soft,
                weight: None,
            });
        }
    }
    soft
}

/// Returns `count` hard edges that each reverse an existing `depends_on`
/// entry, so every one of them closes a two-task cycle.
pub fn back_edges(
    count: usize,
    tasks: &[TaskDescriptor],
    rng: &mut StdRng,
) -> Vec<EdgeDescriptor> {
    let candidates: Vec<&TaskDescriptor> =
        tasks.iter().filter(|t| !t.depends_on.is_empty()).collect();
    candidates
        .choose_multiple(rng, count)
        .filter_map(|task| {
            let pred = task.depends_on.choose(rng)?;
            Some(EdgeDescriptor {
                from: task.id.clone(),
                to: pred.clone(),
                kind: DependencyKind::Hard,
                weight: None,
            })
        })
        .collect()
}
