//! Symmetrized neighbor-weight table in compressed sparse form

use std::collections::HashMap;
use std::mem;

use crate::graph::Graph;

/// Undirected weighted adjacency derived from a [`Graph`].
///
/// Every edge `(s, t, w)` contributes `w` to both `s -> t` and `t -> s`, so a
/// pair related in both directions carries `weight(s,t) + weight(t,s)`.
/// Self-loops contribute their weight once.
#[derive(Debug, Clone)]
pub struct WeightedAdjacency {
    /// Number of nodes in the table
    pub node_count: usize,

    /// Offset array: neighbors of node i live in offsets[i]..offsets[i+1]
    pub offsets: Vec<u32>,

    /// Concatenated neighbor lists, each in first-encounter order
    pub neighbors: Vec<u32>,

    /// Combined weight for the matching entry in `neighbors`
    pub weights: Vec<f64>,

    /// Entity ids by node index
    pub node_ids: Vec<String>,

    id_to_index: HashMap<String, u32>,

    /// Sum of all accepted edge weights
    total_weight: f64,
}

impl WeightedAdjacency {
    /// Build the table from a graph's nodes and edges
    pub fn from_graph(graph: &Graph) -> Self {
        let mut id_to_index: HashMap<String, u32> = HashMap::with_capacity(graph.nodes.len());
        let mut node_ids = Vec::with_capacity(graph.nodes.len());

        for node in &graph.nodes {
            if id_to_index.contains_key(&node.id) {
                log::warn!("Duplicate node id '{}' ignored", node.id);
                continue;
            }
            id_to_index.insert(node.id.clone(), node_ids.len() as u32);
            node_ids.push(node.id.clone());
        }

        let node_count = node_ids.len();
        let mut lists: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_count];
        let mut slots: Vec<HashMap<u32, usize>> = vec![HashMap::new(); node_count];
        let mut total_weight = 0.0;

        for edge in &graph.edges {
            let (src, dst) = match (id_to_index.get(&edge.source), id_to_index.get(&edge.target)) {
                (Some(&src), Some(&dst)) => (src, dst),
                _ => {
                    log::warn!("Edge '{}' references an unknown node; skipped", edge.id);
                    continue;
                }
            };

            if edge.weight.is_nan() || edge.weight <= 0.0 {
                continue;
            }

            total_weight += edge.weight;
            accumulate(&mut lists, &mut slots, src, dst, edge.weight);
            if src != dst {
                accumulate(&mut lists, &mut slots, dst, src, edge.weight);
            }
        }

        let entry_count: usize = lists.iter().map(|list| list.len()).sum();
        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut neighbors = Vec::with_capacity(entry_count);
        let mut weights = Vec::with_capacity(entry_count);

        offsets.push(0);
        for list in lists {
            for (neighbor, weight) in list {
                neighbors.push(neighbor);
                weights.push(weight);
            }
            offsets.push(neighbors.len() as u32);
        }

        Self {
            node_count,
            offsets,
            neighbors,
            weights,
            node_ids,
            id_to_index,
            total_weight,
        }
    }

    /// Neighbors of a node with their combined weights
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        self.neighbors[start..end]
            .iter()
            .copied()
            .zip(self.weights[start..end].iter().copied())
    }

    /// Combined weight between two nodes, `0.0` when unrelated
    pub fn weight_between(&self, a: usize, b: u32) -> f64 {
        self.neighbors(a)
            .find(|&(neighbor, _)| neighbor == b)
            .map(|(_, w)| w)
            .unwrap_or(0.0)
    }

    /// Number of distinct neighbors of a node
    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    /// Sum of combined weights incident to a node
    pub fn weighted_degree(&self, node: usize) -> f64 {
        self.neighbors(node).map(|(_, w)| w).sum()
    }

    /// Sum of all edge weights the table was built from
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Number of stored (directed) neighbor entries
    pub fn entry_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn node_id(&self, node: usize) -> &str {
        &self.node_ids[node]
    }

    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let neighbors = self.neighbors.capacity() * mem::size_of::<u32>();
        let weights = self.weights.capacity() * mem::size_of::<f64>();
        let ids = self.node_ids.iter().map(|s| s.capacity()).sum::<usize>();

        base + offsets + neighbors + weights + ids
    }
}

fn accumulate(
    lists: &mut [Vec<(u32, f64)>],
    slots: &mut [HashMap<u32, usize>],
    from: u32,
    to: u32,
    weight: f64,
) {
    let list = &mut lists[from as usize];
    match slots[from as usize].get(&to) {
        Some(&slot) => list[slot].1 += weight,
        None => {
            slots[from as usize].insert(to, list.len());
            list.push((to, weight));
        }
    }
}
