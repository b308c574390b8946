//! Cluster statistics and metrics

use crate::cluster::{Cluster, ClusterAssignment, ClusterCentralNodes};
use crate::graph::WeightedAdjacency;
use itertools::Itertools;
use petgraph::graph::UnGraph;
use rayon::prelude::*;
use std::collections::HashSet;

/// Number of central nodes reported per cluster
const CENTRAL_NODE_COUNT: usize = 5;

/// Build per-community summaries, largest first.
///
/// Communities smaller than `min_cluster_size` are left out.
pub fn summarize_clusters(
    adjacency: &WeightedAdjacency,
    assignment: &ClusterAssignment,
    min_cluster_size: usize,
) -> Vec<Cluster> {
    let groups = assignment.members_by_cluster();
    log::info!("Summarizing {} communities", groups.len());

    let mut clusters: Vec<Cluster> = groups
        .into_par_iter()
        .enumerate()
        .filter(|(_, members)| members.len() >= min_cluster_size)
        .map(|(id, members)| {
            let density = calculate_density(adjacency, &members);
            let internal_weight = internal_weight(adjacency, &members);
            let central_nodes = identify_central_nodes(adjacency, &members);
            Cluster {
                id: id as u32,
                size: members.len(),
                members,
                internal_weight,
                density,
                central_nodes,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    clusters
}

/// Fraction of member pairs that share a positive combined weight
pub fn calculate_density(adjacency: &WeightedAdjacency, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_pairs = n * (n - 1) / 2;
    let member_set: HashSet<u32> = members.iter().copied().collect();

    let mut actual_pairs = 0;
    for &node in members {
        for (neighbor, _) in adjacency.neighbors(node as usize) {
            // Each undirected pair is seen from both ends; count it once
            if neighbor > node && member_set.contains(&neighbor) {
                actual_pairs += 1;
            }
        }
    }

    actual_pairs as f32 / potential_pairs as f32
}

/// Sum of combined weights on pairs inside the cluster, self-loops included
pub fn internal_weight(adjacency: &WeightedAdjacency, members: &[u32]) -> f64 {
    let member_set: HashSet<u32> = members.iter().copied().collect();

    members
        .iter()
        .flat_map(|&node| {
            adjacency
                .neighbors(node as usize)
                .filter(move |&(neighbor, _)| neighbor >= node)
        })
        .filter(|(neighbor, _)| member_set.contains(neighbor))
        .map(|(_, w)| w)
        .sum()
}

/// Members with the highest weighted degree toward the rest of the cluster
pub fn identify_central_nodes(adjacency: &WeightedAdjacency, members: &[u32]) -> ClusterCentralNodes {
    let member_set: HashSet<u32> = members.iter().copied().collect();

    let degree = members
        .iter()
        .map(|&node| {
            let strength: f64 = adjacency
                .neighbors(node as usize)
                .filter(|(neighbor, _)| *neighbor != node && member_set.contains(neighbor))
                .map(|(_, w)| w)
                .sum();
            (node, strength)
        })
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(CENTRAL_NODE_COUNT)
        .map(|(node, _)| node)
        .collect();

    ClusterCentralNodes { degree }
}

/// Newman modularity of an assignment over the symmetrized weights.
///
/// Returns `0.0` for graphs without weight.
pub fn modularity(adjacency: &WeightedAdjacency, assignment: &ClusterAssignment) -> f64 {
    let two_m: f64 = (0..adjacency.node_count)
        .map(|node| adjacency.weighted_degree(node))
        .sum();
    if two_m <= 0.0 {
        return 0.0;
    }

    let community_count = assignment.community_count();
    let mut inside = vec![0.0; community_count];
    let mut totals = vec![0.0; community_count];

    for node in 0..adjacency.node_count {
        let community = assignment.cluster_of(node);
        totals[community] += adjacency.weighted_degree(node);
        for (neighbor, weight) in adjacency.neighbors(node) {
            if assignment.cluster_of(neighbor as usize) == community {
                inside[community] += weight;
            }
        }
    }

    inside
        .iter()
        .zip(&totals)
        .map(|(&inner, &total)| inner / two_m - (total / two_m).powi(2))
        .sum()
}

/// Number of connected components in the symmetrized graph
pub fn connected_components(adjacency: &WeightedAdjacency) -> usize {
    let mut graph = UnGraph::<(), f64>::with_capacity(adjacency.node_count, adjacency.entry_count() / 2);
    for _ in 0..adjacency.node_count {
        graph.add_node(());
    }

    graph.extend_with_edges((0..adjacency.node_count).flat_map(|node| {
        adjacency
            .neighbors(node)
            .filter(move |&(neighbor, _)| neighbor as usize > node)
            .map(move |(neighbor, weight)| (node as u32, neighbor, weight))
    }));

    petgraph::algo::connected_components(&graph)
}
