//! Graph construction module

use crate::data::RelationMatrix;
use crate::graph::{Graph, GraphEdge, GraphNode};
use std::collections::HashMap;

/// Builder for incrementally constructing a Graph
pub struct GraphBuilder {
    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Nodes in the order they were first seen
    nodes: Vec<GraphNode>,

    /// Accepted edges
    edges: Vec<GraphEdge>,

    /// Relations dropped for carrying no positive weight
    dropped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            edges: Vec::new(),
            dropped: 0,
        }
    }

    /// Get or create a node index for the given string ID
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.nodes.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.nodes.push(GraphNode::new(id));

        idx
    }

    /// Record a relation from one node to another.
    ///
    /// Both endpoints become nodes regardless of weight; only strictly
    /// positive weights produce an edge. Returns whether an edge was added.
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str, weight: f64) -> bool {
        self.get_or_create_node(src_id);
        self.get_or_create_node(dst_id);

        if weight > 0.0 {
            self.edges.push(GraphEdge::new(src_id, dst_id, weight));
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finish construction
    pub fn build(self) -> Graph {
        log::debug!(
            "Built graph with {} nodes and {} edges ({} relations dropped)",
            self.nodes.len(),
            self.edges.len(),
            self.dropped
        );

        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a relation matrix into a node/edge graph.
///
/// Every outer and inner key becomes a node, in first-seen order. Every
/// strictly positive entry becomes one edge; zero entries are dropped.
pub fn build_graph(matrix: &RelationMatrix) -> Graph {
    let mut builder = GraphBuilder::with_capacity(matrix.len());

    for (source, targets) in matrix.rows() {
        builder.get_or_create_node(source);
        for (target, weight) in targets {
            builder.add_edge(source, target, *weight);
        }
    }

    builder.build()
}
