#![allow(clippy::expect_used)]

use super::*;
use crate::task::TaskCategory;

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

fn tid(s: &str) -> TaskId {
    TaskId::try_from(s).expect("valid TaskId")
}

fn task(id: &str) -> TaskNode {
    TaskNode::new(tid(id), format!("Task {id}"))
}

fn weighted(id: &str, weight: f64) -> TaskNode {
    task(id).with_weight(weight).expect("valid weight")
}

fn hard(g: &mut DependencyGraph, from: &str, to: &str) {
    g.add_edge(tid(from), tid(to), DependencyKind::Hard, None)
        .expect("valid edge");
}

fn soft(g: &mut DependencyGraph, from: &str, to: &str) {
    g.add_edge(tid(from), tid(to), DependencyKind::Soft, None)
        .expect("valid edge");
}

/// Builds a graph with the given task ids (in order) and hard edges.
fn graph_of(ids: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
    let mut g = DependencyGraph::new();
    for id in ids {
        g.add_node(task(id));
    }
    for (from, to) in edges {
        hard(&mut g, from, to);
    }
    g
}

fn strs(ids: &[TaskId]) -> Vec<&str> {
    ids.iter().map(TaskId::as_str).collect()
}

fn batch_strs(batches: &[Vec<TaskId>]) -> Vec<Vec<&str>> {
    batches.iter().map(|b| strs(b)).collect()
}

// ---------------------------------------------------------------------------
// Construction & mutation
// ---------------------------------------------------------------------------

#[test]
fn empty_graph_has_no_nodes_or_edges() {
    let g = DependencyGraph::new();
    assert!(g.is_empty());
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
}

/// Re-adding a node replaces its attributes but keeps edges and position.
#[test]
fn add_node_updates_in_place() {
    let mut g = graph_of(&["A", "B"], &[("A", "B")]);
    g.add_node(TaskNode::new(tid("A"), "Renamed").with_category(TaskCategory::Setup));

    assert_eq!(g.node_count(), 2);
    assert_eq!(g.node("A").map(|n| n.title.as_str()), Some("Renamed"));
    assert_eq!(g.neighbors("A"), ["B"]);
    let ids: Vec<&str> = g.node_ids().into_iter().map(TaskId::as_str).collect();
    assert_eq!(ids, ["A", "B"]);
}

#[test]
fn add_edge_twice_keeps_one_edge() {
    let mut g = graph_of(&["A", "B"], &[]);
    hard(&mut g, "A", "B");
    hard(&mut g, "A", "B");
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn add_edge_upsert_replaces_kind_and_weight() {
    let mut g = graph_of(&["A", "B"], &[("A", "B")]);
    g.add_edge(tid("A"), tid("B"), DependencyKind::Soft, Some(4.0))
        .expect("valid edge");

    let edge = g.edge("A", "B").expect("edge exists");
    assert_eq!(edge.kind, DependencyKind::Soft);
    assert_eq!(edge.weight, Some(4.0));
    assert_eq!(g.edge_count(), 1);
}

/// Scenario D: a self-loop is rejected and the edge set stays unchanged.
#[test]
fn self_loop_is_rejected() {
    let mut g = graph_of(&["X", "Y"], &[("X", "Y")]);
    let before = g.edges();

    let err = g
        .add_edge(tid("X"), tid("X"), DependencyKind::Hard, None)
        .expect_err("self-loop must fail");

    assert_eq!(err, GraphError::InvalidEdge { id: tid("X") });
    assert_eq!(g.edges(), before);
    assert_eq!(g.rejected_edges().len(), 1);
    assert_eq!(g.rejected_edges()[0].id, "X");
}

#[test]
fn repeated_self_loop_is_recorded_once_per_kind() {
    let mut g = graph_of(&["X"], &[]);
    for kind in [DependencyKind::Hard, DependencyKind::Hard, DependencyKind::Soft] {
        g.add_edge(tid("X"), tid("X"), kind, None)
            .expect_err("self-loop must fail");
    }

    let kinds: Vec<DependencyKind> = g.rejected_edges().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, [DependencyKind::Hard, DependencyKind::Soft]);
}

#[test]
fn remove_node_forgets_its_rejected_self_loops() {
    let mut g = graph_of(&["X", "Y"], &[]);
    for id in ["X", "Y"] {
        g.add_edge(tid(id), tid(id), DependencyKind::Hard, None)
            .expect_err("self-loop must fail");
    }

    g.remove_node("X");
    assert_eq!(g.rejected_edges().len(), 1);
    assert_eq!(g.rejected_edges()[0].id, "Y");

    g.remove_node("Y");
    assert!(g.rejected_edges().is_empty());
}

#[test]
fn negative_edge_weight_is_rejected_without_side_effects() {
    let mut g = DependencyGraph::new();
    let result = g.add_edge(tid("A"), tid("B"), DependencyKind::Hard, Some(-1.0));
    assert!(matches!(result, Err(GraphError::InvalidWeight { .. })));
    assert_eq!(g.edge_count(), 0);
    assert!(g.neighbors("A").is_empty());
}

#[test]
fn remove_node_drops_incident_edges() {
    let mut g = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    g.remove_node("B");

    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
    assert!(g.neighbors("A").is_empty());
    assert!(g.predecessors("C").is_empty());
}

#[test]
fn remove_unknown_node_and_edge_are_noops() {
    let mut g = graph_of(&["A", "B"], &[("A", "B")]);
    g.remove_node("Z");
    g.remove_edge("B", "A");
    g.remove_edge("Z", "A");
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn neighbors_and_predecessors_follow_edge_insertion_order() {
    let mut g = graph_of(&["A", "B", "C", "D"], &[]);
    hard(&mut g, "A", "D");
    hard(&mut g, "A", "B");
    soft(&mut g, "A", "C");
    hard(&mut g, "C", "D");
    hard(&mut g, "B", "D");

    assert_eq!(g.neighbors("A"), ["D", "B", "C"]);
    assert_eq!(g.predecessors("D"), ["A", "C", "B"]);
    assert!(g.neighbors("missing").is_empty());
}

// ---------------------------------------------------------------------------
// Placeholders (edges to not-yet-added tasks)
// ---------------------------------------------------------------------------

#[test]
fn edge_to_unknown_task_is_kept_but_not_counted_as_node() {
    let mut g = graph_of(&["A"], &[]);
    hard(&mut g, "A", "B");

    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 1);
    assert!(!g.contains_node("B"));
    assert_eq!(g.neighbors("A"), ["B"]);
}

/// Declaring a task that an earlier edge referenced attaches the edge to it.
#[test]
fn late_node_declaration_promotes_placeholder() {
    let mut g = DependencyGraph::new();
    hard(&mut g, "A", "B");
    g.add_node(task("B"));
    g.add_node(task("A"));

    assert_eq!(g.node_count(), 2);
    let order = g.topological_sort().expect("acyclic");
    assert_eq!(strs(&order), ["A", "B"]);
    // Insertion order follows declaration, not first mention.
    let ids: Vec<&str> = g.node_ids().into_iter().map(TaskId::as_str).collect();
    assert_eq!(ids, ["B", "A"]);
}

#[test]
fn placeholder_is_pruned_with_its_last_edge() {
    let mut g = graph_of(&["A"], &[("A", "B")]);
    g.remove_edge("A", "B");
    assert_eq!(g.edge_count(), 0);
    assert!(g.neighbors("B").is_empty());
    assert!(g.edges().is_empty());
}

#[test]
fn dangling_edges_do_not_affect_derived_views() {
    let mut g = graph_of(&["A", "B"], &[("A", "B")]);
    hard(&mut g, "B", "ghost");
    hard(&mut g, "ghost", "A");

    assert!(!g.detect_cycles().has_cycles);
    let order = g.topological_sort().expect("acyclic among declared tasks");
    assert_eq!(strs(&order), ["A", "B"]);
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

/// Scenario C: a two-node cycle is reported closed and blocks ordering.
#[test]
fn two_node_cycle_is_detected() {
    let g = graph_of(&["A", "B"], &[("A", "B"), ("B", "A")]);
    let report = g.detect_cycles();

    assert!(report.has_cycles);
    assert_eq!(report.cycles.len(), 1);
    assert_eq!(strs(&report.cycles[0]), ["A", "B", "A"]);

    let err = g.topological_sort().expect_err("cyclic");
    assert!(matches!(err, GraphError::CyclicGraph { .. }));
}

#[test]
fn soft_edges_never_form_cycles() {
    let mut g = graph_of(&["A", "B"], &[("A", "B")]);
    soft(&mut g, "B", "A");

    assert!(!g.detect_cycles().has_cycles);
    assert!(g.topological_sort().is_ok());
}

#[test]
fn disjoint_cycles_are_all_reported() {
    let g = graph_of(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("B", "A"), ("C", "D"), ("D", "E"), ("E", "C")],
    );
    let report = g.detect_cycles();

    assert_eq!(report.cycles.len(), 2);
    assert_eq!(strs(&report.cycles[0]), ["A", "B", "A"]);
    assert_eq!(strs(&report.cycles[1]), ["C", "D", "E", "C"]);
}

#[test]
fn cycle_error_carries_a_closed_cycle() {
    let g = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "B")]);
    let Err(GraphError::CyclicGraph { cycle }) = g.topological_sort() else {
        unreachable!("expected a cyclic-graph error");
    };
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(strs(&cycle), ["B", "C", "B"]);
}

/// Every acyclicity-requiring view fails exactly when a cycle is reported.
#[test]
fn derived_views_agree_with_cycle_detection() {
    let cyclic = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
    assert!(cyclic.detect_cycles().has_cycles);
    assert!(cyclic.topological_sort().is_err());
    assert!(cyclic.critical_path().is_err());
    assert!(cyclic.parallel_batches().is_err());

    let acyclic = graph_of(&["A", "B", "C"], &[("A", "B"), ("A", "C")]);
    assert!(!acyclic.detect_cycles().has_cycles);
    assert!(acyclic.topological_sort().is_ok());
    assert!(acyclic.critical_path().is_ok());
    assert!(acyclic.parallel_batches().is_ok());
}

// ---------------------------------------------------------------------------
// Topological sort & best-effort order
// ---------------------------------------------------------------------------

/// Scenario A: a chain sorts, routes, and batches in chain order.
#[test]
fn chain_scenario() {
    let g = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);

    assert_eq!(strs(&g.topological_sort().expect("acyclic")), ["A", "B", "C"]);
    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["A", "B", "C"]);
    assert_eq!(cp.length, 3.0);
    assert_eq!(
        batch_strs(&g.parallel_batches().expect("acyclic")),
        vec![vec!["A"], vec!["B"], vec!["C"]]
    );
}

#[test]
fn ties_are_broken_by_insertion_order() {
    let g = graph_of(&["C", "A", "B", "D"], &[("A", "D"), ("C", "D")]);
    assert_eq!(
        strs(&g.topological_sort().expect("acyclic")),
        ["C", "A", "B", "D"]
    );
}

/// Scenario E: an isolated task does not block ordering.
#[test]
fn isolated_task_is_still_ordered() {
    let mut g = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    g.add_node(task("D"));

    let order = g.topological_sort().expect("acyclic");
    assert_eq!(order.len(), 4);
    assert!(order.contains(&tid("D")));
}

#[test]
fn best_effort_order_matches_topological_sort_when_acyclic() {
    let g = graph_of(&["A", "B", "C"], &[("B", "A"), ("C", "A")]);
    let best = g.best_effort_order();
    assert!(best.is_complete());
    assert_eq!(best.order, g.topological_sort().expect("acyclic"));
}

#[test]
fn best_effort_order_appends_blocked_tasks() {
    let g = graph_of(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "B"), ("C", "D")],
    );
    let best = g.best_effort_order();

    assert_eq!(strs(&best.order), ["A", "B", "C", "D"]);
    assert_eq!(strs(&best.unresolved), ["B", "C", "D"]);
    assert!(!best.is_complete());
}

#[test]
fn repeated_queries_are_deterministic() {
    let g = graph_of(
        &["A", "B", "C", "D", "E"],
        &[("A", "C"), ("B", "C"), ("C", "D"), ("B", "E")],
    );
    assert_eq!(g.topological_sort(), g.topological_sort());
    assert_eq!(g.critical_path(), g.critical_path());
}

// ---------------------------------------------------------------------------
// Critical path
// ---------------------------------------------------------------------------

#[test]
fn critical_path_of_empty_and_single_node_graphs() {
    let empty = DependencyGraph::new();
    let cp = empty.critical_path().expect("empty is acyclic");
    assert!(cp.is_empty());
    assert_eq!(cp.length, 0.0);

    let single = graph_of(&["A"], &[]);
    let cp = single.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["A"]);
    assert_eq!(cp.length, 1.0);
}

#[test]
fn critical_path_follows_heaviest_branch() {
    let mut g = DependencyGraph::new();
    g.add_node(weighted("start", 1.0));
    g.add_node(weighted("light", 1.0));
    g.add_node(weighted("heavy", 5.0));
    g.add_node(weighted("end", 2.0));
    hard(&mut g, "start", "light");
    hard(&mut g, "start", "heavy");
    hard(&mut g, "light", "end");
    hard(&mut g, "heavy", "end");

    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["start", "heavy", "end"]);
    assert_eq!(cp.length, 8.0);
}

#[test]
fn explicit_edge_weight_overrides_source_weight() {
    let mut g = DependencyGraph::new();
    g.add_node(weighted("A", 1.0));
    g.add_node(weighted("B", 1.0));
    g.add_node(weighted("C", 3.0));
    g.add_edge(tid("A"), tid("B"), DependencyKind::Hard, Some(10.0))
        .expect("valid edge");

    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["A", "B"]);
    assert_eq!(cp.length, 11.0);
}

/// A prerequisite's weight is counted once along the chain, so a short
/// follow-up does not outweigh a single heavier task.
#[test]
fn source_weight_counts_once_per_chain() {
    let mut g = DependencyGraph::new();
    g.add_node(weighted("P", 3.0));
    g.add_node(weighted("Q", 0.1));
    g.add_node(weighted("R", 5.0));
    hard(&mut g, "P", "Q");

    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["R"]);
    assert_eq!(cp.length, 5.0);
}

#[test]
fn category_weight_is_used_when_no_explicit_weight() {
    let mut g = DependencyGraph::new();
    g.add_node(task("docs").with_category(TaskCategory::Documentation));
    g.add_node(task("feature").with_category(TaskCategory::Feature));

    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["feature"]);
    assert_eq!(cp.length, 3.0);
}

/// Equal-length paths resolve to the end task inserted last.
#[test]
fn critical_path_tie_prefers_later_insertion() {
    let g = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
    let cp = g.critical_path().expect("acyclic");
    assert_eq!(strs(&cp.tasks), ["C", "D"]);
}

#[test]
fn soft_edges_do_not_extend_critical_path() {
    let mut g = graph_of(&["A", "B"], &[]);
    soft(&mut g, "A", "B");
    let cp = g.critical_path().expect("acyclic");
    assert_eq!(cp.tasks.len(), 1);
    assert_eq!(cp.length, 1.0);
}

// ---------------------------------------------------------------------------
// Parallel batches & ready tasks
// ---------------------------------------------------------------------------

/// Scenario B: independent tasks form a single batch.
#[test]
fn independent_tasks_form_one_batch() {
    let g = graph_of(&["A", "B", "C"], &[]);
    assert!(!g.detect_cycles().has_cycles);
    assert_eq!(
        batch_strs(&g.parallel_batches().expect("acyclic")),
        vec![vec!["A", "B", "C"]]
    );
}

#[test]
fn batches_use_longest_predecessor_chain() {
    let g = graph_of(
        &["D", "A", "B", "C"],
        &[("A", "B"), ("B", "C"), ("A", "C"), ("D", "C")],
    );
    assert_eq!(
        batch_strs(&g.parallel_batches().expect("acyclic")),
        vec![vec!["D", "A"], vec!["B"], vec!["C"]]
    );
}

#[test]
fn empty_graph_has_no_batches() {
    let g = DependencyGraph::new();
    assert!(g.parallel_batches().expect("acyclic").is_empty());
}

#[test]
fn ready_tasks_respect_completed_set() {
    let g = graph_of(
        &["A", "B", "C", "D"],
        &[("A", "C"), ("B", "C"), ("C", "D")],
    );

    assert_eq!(strs(&g.ready_tasks::<&str>(&[])), ["A", "B"]);
    assert_eq!(strs(&g.ready_tasks(&["A"])), ["B"]);
    assert_eq!(strs(&g.ready_tasks(&["A", "B"])), ["C"]);
    assert_eq!(strs(&g.ready_tasks(&["A", "B", "C", "unknown"])), ["D"]);
    assert!(g.ready_tasks(&["A", "B", "C", "D"]).is_empty());
}

#[test]
fn ready_tasks_ignore_soft_edges_and_skip_cycles() {
    let mut g = graph_of(&["A", "B", "C"], &[("B", "C"), ("C", "B")]);
    soft(&mut g, "A", "B");
    assert_eq!(strs(&g.ready_tasks::<&str>(&[])), ["A"]);
}
