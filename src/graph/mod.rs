//! Graph representation and construction module

pub mod adjacency;
pub mod annotate;
pub mod builder;

pub use adjacency::WeightedAdjacency;
pub use annotate::annotate_graph;
pub use builder::{build_graph, GraphBuilder};

use serde::{Deserialize, Serialize};

/// Node/edge view of a relation matrix, shaped for a force-graph renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in discovery order
    pub nodes: Vec<GraphNode>,

    /// One edge per strictly positive relation, in matrix order
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by its entity id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            data: NodeData {
                id: id.to_string(),
                group: group_of(id).to_string(),
                cluster: None,
            },
        }
    }
}

/// Display payload carried by each node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,

    /// Namespace prefix of the id (text before the first `/`)
    pub group: String,

    /// Community id, set once detection has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, weight: f64) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }
}

/// Namespace prefix of an entity id
pub fn group_of(id: &str) -> &str {
    id.split('/').next().unwrap_or(id)
}
