//! Post-operation invariant checkers for correctness validation.
//!
//! Each checker recomputes what a derived view must satisfy from the graph's
//! public edge list and returns a description of the first violation.

use std::collections::{HashMap, HashSet};

use taskgraph_core::{
    CriticalPath, CycleReport, DependencyGraph, DependencyKind, TaskId, TaskPlan,
};

/// Hard edges whose endpoints are both declared tasks.
fn hard_edges(graph: &DependencyGraph) -> Vec<(TaskId, TaskId)> {
    graph
        .edges()
        .into_iter()
        .filter(|e| e.kind == DependencyKind::Hard)
        .filter(|e| graph.contains_node(&e.from) && graph.contains_node(&e.to))
        .map(|e| (e.from, e.to))
        .collect()
}

/// Checks that `ids` lists every declared task exactly once.
fn check_permutation(graph: &DependencyGraph, ids: &[TaskId], what: &str) -> Result<(), String> {
    let unique: HashSet<&TaskId> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(format!("{what} contains repeated tasks"));
    }
    if ids.len() != graph.node_count() {
        return Err(format!(
            "{what} has {} tasks, graph has {}",
            ids.len(),
            graph.node_count()
        ));
    }
    if let Some(unknown) = ids.iter().find(|id| !graph.contains_node(id)) {
        return Err(format!("{what} contains unknown task {unknown}"));
    }
    Ok(())
}

/// Verifies that every plan task became a node and no extra node exists.
pub fn check_graph_invariants(plan: &TaskPlan, graph: &DependencyGraph) -> Result<(), String> {
    let declared: HashSet<&TaskId> = plan.tasks.iter().map(|t| &t.id).collect();
    if graph.node_count() != declared.len() {
        return Err(format!(
            "node count mismatch: graph={}, plan={}",
            graph.node_count(),
            declared.len()
        ));
    }
    for id in declared {
        if !graph.contains_node(id) {
            return Err(format!("task {id} not found in graph"));
        }
    }
    Ok(())
}

/// Verifies a topological order: a permutation that respects every hard edge.
pub fn check_topological_order(graph: &DependencyGraph, order: &[TaskId]) -> Result<(), String> {
    check_permutation(graph, order, "order")?;
    let position: HashMap<&TaskId, usize> =
        order.iter().enumerate().map(|(i, id)| (id, i)).collect();
    for (from, to) in hard_edges(graph) {
        if position[&from] >= position[&to] {
            return Err(format!("{from} must precede {to}"));
        }
    }
    Ok(())
}

/// Verifies parallel batches:
/// - together they list every task exactly once
/// - no batch is empty
/// - every hard edge points into a strictly later batch
/// - every task past the first batch has a hard prerequisite in the batch
///   directly before it
pub fn check_batches(graph: &DependencyGraph, batches: &[Vec<TaskId>]) -> Result<(), String> {
    let flat: Vec<TaskId> = batches.iter().flatten().cloned().collect();
    check_permutation(graph, &flat, "batches")?;
    if batches.iter().any(Vec::is_empty) {
        return Err("empty batch".to_owned());
    }

    let batch_of: HashMap<&TaskId, usize> = batches
        .iter()
        .enumerate()
        .flat_map(|(k, batch)| batch.iter().map(move |id| (id, k)))
        .collect();

    let mut has_pred_in_prev: HashSet<TaskId> = HashSet::new();
    for (from, to) in hard_edges(graph) {
        let (bf, bt) = (batch_of[&from], batch_of[&to]);
        if bf >= bt {
            return Err(format!("{from} (batch {bf}) must come before {to} (batch {bt})"));
        }
        if bf + 1 == bt {
            has_pred_in_prev.insert(to);
        }
    }
    for batch in batches.iter().skip(1) {
        if let Some(id) = batch.iter().find(|id| !has_pred_in_prev.contains(*id)) {
            return Err(format!("{id} could run in an earlier batch"));
        }
    }
    Ok(())
}

/// Verifies a critical path:
/// - consecutive tasks are joined by hard edges
/// - `length` matches the path's own weight
/// - no single task outweighs the whole path
pub fn check_critical_path(graph: &DependencyGraph, path: &CriticalPath) -> Result<(), String> {
    let weight = |id: &TaskId| {
        graph
            .node(id)
            .map(taskgraph_core::TaskNode::effective_weight)
            .ok_or_else(|| format!("path task {id} is not declared"))
    };

    let Some(last) = path.tasks.last() else {
        return if graph.is_empty() {
            Ok(())
        } else {
            Err("empty critical path on a non-empty graph".to_owned())
        };
    };

    let mut total = weight(last)?;
    for pair in path.tasks.windows(2) {
        let edge = graph
            .edge(&pair[0], &pair[1])
            .filter(|e| e.kind == DependencyKind::Hard)
            .ok_or_else(|| format!("no hard edge {} -> {}", pair[0], pair[1]))?;
        total += match edge.weight {
            Some(w) => w,
            None => weight(&pair[0])?,
        };
    }
    if (total - path.length).abs() > 1e-9 {
        return Err(format!(
            "reported length {} but path weighs {total}",
            path.length
        ));
    }

    for node in graph.nodes() {
        if node.effective_weight() > path.length + 1e-9 {
            return Err(format!("task {} alone outweighs the critical path", node.id));
        }
    }
    Ok(())
}

/// Verifies a cycle report: each cycle is closed, at least two tasks long,
/// and walks real hard edges.
pub fn check_cycle_report(graph: &DependencyGraph, report: &CycleReport) -> Result<(), String> {
    if report.has_cycles == report.cycles.is_empty() {
        return Err("has_cycles disagrees with the cycle list".to_owned());
    }
    let hard: HashSet<(TaskId, TaskId)> = hard_edges(graph).into_iter().collect();
    for cycle in &report.cycles {
        if cycle.len() < 3 || cycle.first() != cycle.last() {
            return Err(format!("cycle {cycle:?} is not closed"));
        }
        for pair in cycle.windows(2) {
            if !hard.contains(&(pair[0].clone(), pair[1].clone())) {
                return Err(format!("cycle step {} -> {} is not a hard edge", pair[0], pair[1]));
            }
        }
    }
    Ok(())
}

/// Verifies a ready set: none completed, all hard prerequisites completed,
/// and no runnable task left out.
pub fn check_ready(
    graph: &DependencyGraph,
    completed: &[TaskId],
    ready: &[TaskId],
) -> Result<(), String> {
    let done: HashSet<&TaskId> = completed.iter().collect();
    let mut prereqs: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    for (from, to) in hard_edges(graph) {
        prereqs.entry(to).or_default().push(from);
    }
    let runnable = |id: &TaskId| {
        !done.contains(id)
            && prereqs
                .get(id)
                .is_none_or(|preds| preds.iter().all(|p| done.contains(p)))
    };

    let reported: HashSet<&TaskId> = ready.iter().collect();
    for id in graph.node_ids() {
        if runnable(id) != reported.contains(id) {
            return Err(format!("readiness of {id} misreported"));
        }
    }
    Ok(())
}
