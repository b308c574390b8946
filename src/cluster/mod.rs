//! Community detection and cluster analysis module

pub mod detection;
pub mod metrics;

pub use detection::{detect_communities, CommunityDetector, DetectionConfig, DetectionOutcome, TieBreak};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Final node -> community id mapping.
///
/// Ids are dense and zero based. Entries are kept in node order so the
/// serialized form is stable across runs over the same input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterAssignment {
    node_ids: Vec<String>,
    clusters: Vec<usize>,
    index: HashMap<String, usize>,
}

impl ClusterAssignment {
    /// Build from parallel node-id and cluster-id vectors
    pub(crate) fn from_parts(node_ids: Vec<String>, clusters: Vec<usize>) -> Self {
        debug_assert_eq!(node_ids.len(), clusters.len());
        let index = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self {
            node_ids,
            clusters,
            index,
        }
    }

    /// Community id of a node, if the node was part of the graph
    pub fn get(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| self.clusters[i])
    }

    /// Community id by node index
    pub fn cluster_of(&self, node: usize) -> usize {
        self.clusters[node]
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// `(node id, community id)` pairs in node order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.node_ids
            .iter()
            .map(String::as_str)
            .zip(self.clusters.iter().copied())
    }

    /// Community ids indexed by node
    pub fn labels(&self) -> &[usize] {
        &self.clusters
    }

    /// Number of distinct communities
    pub fn community_count(&self) -> usize {
        self.clusters.iter().max().map_or(0, |&max| max + 1)
    }

    /// Node indices grouped by community id
    pub fn members_by_cluster(&self) -> Vec<Vec<u32>> {
        let mut members = vec![Vec::new(); self.community_count()];
        for (node, &cluster) in self.clusters.iter().enumerate() {
            members[cluster].push(node as u32);
        }
        members
    }
}

impl Serialize for ClusterAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, cluster) in self.iter() {
            map.serialize_entry(id, &cluster)?;
        }
        map.end()
    }
}

/// Summary of one detected community
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Community id from the assignment
    pub id: u32,

    /// Members of this cluster (node indices)
    pub members: Vec<u32>,

    /// Size of the cluster
    pub size: usize,

    /// Sum of combined weights between members
    pub internal_weight: f64,

    /// Density: connected member pairs / potential pairs
    pub density: f32,

    /// Most connected members
    pub central_nodes: ClusterCentralNodes,
}

/// Key nodes in a cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterCentralNodes {
    /// Members with the highest weighted degree inside the cluster
    pub degree: Vec<u32>,
}
