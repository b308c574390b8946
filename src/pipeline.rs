//! End-to-end analysis: matrix -> graph -> communities -> summaries

use crate::cluster::metrics::{connected_components, modularity, summarize_clusters};
use crate::cluster::{Cluster, ClusterAssignment, CommunityDetector};
use crate::config::Config;
use crate::data::RelationMatrix;
use crate::graph::{annotate_graph, build_graph, Graph, WeightedAdjacency};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Graph with each node's cluster id attached
    pub graph: Graph,
    pub assignment: ClusterAssignment,
    pub clusters: Vec<Cluster>,
    pub stats: GraphStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: f64,
    pub community_count: usize,
    pub modularity: f64,
    pub connected_components: usize,
    pub passes: usize,
    pub converged: bool,
    pub mean_cluster_size: f64,
    pub cluster_size_std_dev: f64,
}

/// Run the full clustering pipeline over a relation matrix
pub fn analyze(matrix: &RelationMatrix, config: &Config) -> Analysis {
    let mut graph = build_graph(matrix);
    log::info!(
        "Built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let adjacency = WeightedAdjacency::from_graph(&graph);
    log::debug!("Neighbor table uses {} bytes", adjacency.memory_usage());

    let outcome = CommunityDetector::new(config.detection()).run_on(&adjacency);
    annotate_graph(&mut graph, &outcome.assignment);

    let clusters = summarize_clusters(&adjacency, &outcome.assignment, config.min_cluster_size);

    let sizes: Vec<f64> = outcome
        .assignment
        .members_by_cluster()
        .iter()
        .map(|members| members.len() as f64)
        .collect();
    let mean_cluster_size = if sizes.is_empty() { 0.0 } else { sizes.iter().mean() };
    let cluster_size_std_dev = if sizes.len() < 2 { 0.0 } else { sizes.iter().std_dev() };

    let stats = GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        total_weight: adjacency.total_weight(),
        community_count: outcome.assignment.community_count(),
        modularity: modularity(&adjacency, &outcome.assignment),
        connected_components: connected_components(&adjacency),
        passes: outcome.passes,
        converged: outcome.converged,
        mean_cluster_size,
        cluster_size_std_dev,
    };

    Analysis {
        graph,
        assignment: outcome.assignment,
        clusters,
        stats,
    }
}
