//! Integration tests for graph construction and community detection.
//!
//! Random matrices come from a seeded generator so failures are reproducible.

use std::collections::{BTreeSet, HashSet};

use holoscope_cluster::{
    build_graph, detect_communities, ClusterAssignment, CommunityDetector, Graph, RelationMatrix, TieBreak,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

// ─── helpers ─────────────────────────────────────────────────────────────────

fn matrix(value: serde_json::Value) -> RelationMatrix {
    RelationMatrix::from_value(&value).expect("fixture is a JSON object")
}

/// Random sparse matrix; about a third of entries are zero
fn random_matrix(seed: u64) -> RelationMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let entity_count = rng.gen_range(0..25);
    let mut matrix = RelationMatrix::new();

    for source in 0..entity_count {
        let source_id = format!("s{}", source);
        matrix.ensure_row(&source_id);
        for _ in 0..rng.gen_range(0..6) {
            let target_id = format!("s{}", rng.gen_range(0..entity_count + 5));
            let weight = if rng.gen_bool(0.3) { 0.0 } else { rng.gen_range(0.01..1.0) };
            matrix.insert(&source_id, &target_id, weight);
        }
    }

    matrix
}

fn cluster_ids(assignment: &ClusterAssignment) -> BTreeSet<usize> {
    assignment.iter().map(|(_, c)| c).collect()
}

fn node_ids(graph: &Graph) -> Vec<String> {
    graph.nodes.iter().map(|n| n.id.clone()).collect()
}

// ─── properties ──────────────────────────────────────────────────────────────

#[test]
fn assignment_covers_exactly_the_node_set() {
    for seed in 0..50 {
        let graph = build_graph(&random_matrix(seed));
        let assignment = detect_communities(&graph);

        assert_eq!(assignment.len(), graph.node_count(), "seed {}", seed);
        for node in &graph.nodes {
            assert!(assignment.get(&node.id).is_some(), "seed {} missing {}", seed, node.id);
        }
    }
}

#[test]
fn edges_exist_only_for_positive_entries() {
    for seed in 0..50 {
        let matrix = random_matrix(seed);
        let graph = build_graph(&matrix);

        let positive: usize = matrix
            .rows()
            .map(|(_, targets)| targets.iter().filter(|(_, w)| *w > 0.0).count())
            .sum();
        assert_eq!(graph.edge_count(), positive, "seed {}", seed);

        for edge in &graph.edges {
            assert!(edge.weight > 0.0);
            assert_eq!(matrix.weight(&edge.source, &edge.target), edge.weight);
        }

        let pairs: HashSet<(&str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs.len(), graph.edge_count(), "seed {} has duplicate edges", seed);
    }
}

#[test]
fn nodes_are_union_of_all_keys() {
    for seed in 0..50 {
        let matrix = random_matrix(seed);
        let graph = build_graph(&matrix);

        let mut expected = HashSet::new();
        for (source, targets) in matrix.rows() {
            expected.insert(source.to_string());
            for (target, _) in targets {
                expected.insert(target.clone());
            }
        }

        let ids = node_ids(&graph);
        let unique: HashSet<String> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len(), "seed {} has duplicate nodes", seed);
        assert_eq!(unique, expected, "seed {}", seed);
    }
}

#[test]
fn edgeless_graphs_keep_singletons() {
    let graph = build_graph(&matrix(json!({
        "a": {"b": 0, "c": -1},
        "d": {},
        "e": {"a": "strong"},
    })));
    assert_eq!(graph.edge_count(), 0);

    let assignment = detect_communities(&graph);
    assert_eq!(cluster_ids(&assignment).len(), graph.node_count());
}

#[test]
fn detection_is_deterministic() {
    for seed in 0..30 {
        let graph = build_graph(&random_matrix(seed));
        let first = detect_communities(&graph);
        let second = detect_communities(&graph.clone());
        assert_eq!(first, second, "seed {}", seed);

        let rebuilt = build_graph(&random_matrix(seed));
        assert_eq!(first, detect_communities(&rebuilt), "seed {}", seed);
    }
}

#[test]
fn cluster_ids_are_contiguous_from_zero() {
    for seed in 0..50 {
        let graph = build_graph(&random_matrix(seed));
        let assignment = detect_communities(&graph);
        let ids = cluster_ids(&assignment);

        let expected: BTreeSet<usize> = (0..ids.len()).collect();
        assert_eq!(ids, expected, "seed {}", seed);
        assert!(ids.len() <= graph.node_count());
    }
}

#[test]
fn complete_graph_collapses_to_one_community() {
    let mut matrix = RelationMatrix::new();
    for a in 0..200 {
        for b in 0..200 {
            if a != b {
                matrix.insert(&format!("n{}", a), &format!("n{}", b), 1.0);
            }
        }
    }

    let graph = build_graph(&matrix);
    assert_eq!(graph.edge_count(), 200 * 199);

    for tie_break in [TieBreak::LowestLabel, TieBreak::FirstSeen] {
        let outcome = CommunityDetector::default().with_tie_break(tie_break).run(&graph);
        assert!(outcome.converged);
        assert_eq!(outcome.assignment.community_count(), 1);
    }
}

// ─── tie-breaks ──────────────────────────────────────────────────────────────

/// `hub` links equally to `x` and `y`, each of which has a strong partner.
/// Its neighbor list starts with `x`, which was discovered after `y`.
fn contested_hub() -> Graph {
    build_graph(&matrix(json!({
        "hub": {"y": 0, "x": 0.5},
        "y": {"hub": 0.5, "y2": 5},
        "x": {"x2": 5},
    })))
}

#[test]
fn lowest_label_sends_hub_to_earlier_discovered_group() {
    let assignment = CommunityDetector::default()
        .with_tie_break(TieBreak::LowestLabel)
        .detect(&contested_hub());

    assert_eq!(assignment.get("hub"), assignment.get("y"));
    assert_eq!(assignment.get("y"), assignment.get("y2"));
    assert_ne!(assignment.get("hub"), assignment.get("x"));
    assert_eq!(assignment.labels(), &[0, 0, 1, 0, 1]);
}

#[test]
fn first_seen_sends_hub_to_first_listed_neighbor() {
    let assignment = CommunityDetector::default()
        .with_tie_break(TieBreak::FirstSeen)
        .detect(&contested_hub());

    assert_eq!(assignment.get("hub"), assignment.get("x"));
    assert_eq!(assignment.get("x"), assignment.get("x2"));
    assert_ne!(assignment.get("hub"), assignment.get("y"));
    assert_eq!(assignment.labels(), &[0, 1, 0, 1, 0]);
}

// ─── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_mutual_pair_and_isolate() {
    let graph = build_graph(&matrix(json!({"a": {"b": 5}, "b": {"a": 5}, "c": {}})));

    assert_eq!(node_ids(&graph), vec!["a", "b", "c"]);
    let edges: Vec<(&str, &str, f64)> = graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.weight))
        .collect();
    assert!(edges.contains(&("a", "b", 5.0)));
    assert!(edges.contains(&("b", "a", 5.0)));

    let assignment = detect_communities(&graph);
    assert_eq!(assignment.get("a"), assignment.get("b"));
    assert_ne!(assignment.get("a"), assignment.get("c"));
}

#[test]
fn scenario_zero_weights_only() {
    let graph = build_graph(&matrix(json!({"x": {"y": 0}, "y": {"x": 0}})));
    assert_eq!(graph.edge_count(), 0);

    let assignment = detect_communities(&graph);
    assert_ne!(assignment.get("x"), assignment.get("y"));
}

#[test]
fn scenario_empty_matrix() {
    let graph = build_graph(&matrix(json!({})));
    assert!(graph.is_empty());
    assert!(detect_communities(&graph).is_empty());
}

#[test]
fn scenario_triangle_single_cluster() {
    let graph = build_graph(&matrix(json!({
        "a": {"b": 1, "c": 1},
        "b": {"c": 1},
    })));

    let assignment = detect_communities(&graph);
    assert_eq!(assignment.get("a"), Some(0));
    assert_eq!(assignment.get("b"), Some(0));
    assert_eq!(assignment.get("c"), Some(0));
}

#[test]
fn scenario_symmetric_triangle_single_cluster() {
    let graph = build_graph(&matrix(json!({
        "a": {"b": 1, "c": 1},
        "b": {"a": 1, "c": 1},
        "c": {"a": 1, "b": 1},
    })));

    assert_eq!(detect_communities(&graph).community_count(), 1);
}
