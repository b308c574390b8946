//! Community detection by greedy local moves

use crate::cluster::ClusterAssignment;
use crate::graph::{Graph, WeightedAdjacency};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default cap on detection passes
pub const DEFAULT_MAX_PASSES: usize = 5;

/// How to choose between neighboring communities with equal weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Smallest community label wins; independent of neighbor order
    #[default]
    LowestLabel,

    /// First community met while walking the node's neighbors
    FirstSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Upper bound on full passes over the nodes
    pub max_passes: usize,

    pub tie_break: TieBreak,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            tie_break: TieBreak::default(),
        }
    }
}

/// Result of a detection run with bookkeeping for reports
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub assignment: ClusterAssignment,

    /// Passes actually executed
    pub passes: usize,

    /// Whether the last pass made no moves
    pub converged: bool,
}

/// Single-level greedy community detector.
///
/// Every node starts in its own community. Each pass visits the nodes in
/// discovery order and moves a node into the neighboring community it is most
/// strongly tied to, provided that tie is stronger than the one to its current
/// community. Passes repeat until nothing moves or `max_passes` is reached,
/// then labels are renumbered densely in node order.
#[derive(Debug, Clone, Default)]
pub struct CommunityDetector {
    config: DetectionConfig,
}

impl CommunityDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    /// Assign every node of the graph to a community
    pub fn detect(&self, graph: &Graph) -> ClusterAssignment {
        self.run(graph).assignment
    }

    /// Run detection and report pass statistics
    pub fn run(&self, graph: &Graph) -> DetectionOutcome {
        let adjacency = WeightedAdjacency::from_graph(graph);
        self.run_on(&adjacency)
    }

    /// Run detection over a prebuilt neighbor-weight table
    pub fn run_on(&self, adjacency: &WeightedAdjacency) -> DetectionOutcome {
        let node_count = adjacency.node_count;
        let mut labels: Vec<u32> = (0..node_count as u32).collect();
        let mut tally = LabelTally::with_label_count(node_count);
        let mut passes = 0;
        let mut converged = node_count == 0;

        while !converged && passes < self.config.max_passes {
            passes += 1;
            let mut moves = 0;

            for node in 0..node_count {
                let current = labels[node];
                tally.fill(adjacency, &labels, node);
                let current_weight = tally.weight_of(current);

                if let Some((best, best_weight)) = self.best_candidate(tally.entries(), current) {
                    if best_weight > 0.0 && best_weight > current_weight {
                        labels[node] = best;
                        moves += 1;
                    }
                }
            }

            log::debug!("Pass {}: {} nodes moved", passes, moves);
            if moves == 0 {
                converged = true;
            }
        }

        let assignment = renumber(adjacency, &labels);
        log::info!(
            "Detected {} communities among {} nodes after {} passes (converged: {})",
            assignment.community_count(),
            node_count,
            passes,
            converged
        );

        DetectionOutcome {
            assignment,
            passes,
            converged,
        }
    }

    /// Strongest neighboring community other than `current`
    fn best_candidate(&self, tally: &[(u32, f64)], current: u32) -> Option<(u32, f64)> {
        let mut best: Option<(u32, f64)> = None;

        for &(label, weight) in tally {
            if label == current {
                continue;
            }

            let replace = match best {
                None => true,
                Some((best_label, best_weight)) => match self.config.tie_break {
                    TieBreak::FirstSeen => weight > best_weight,
                    TieBreak::LowestLabel => {
                        weight > best_weight || (weight == best_weight && label < best_label)
                    }
                },
            };

            if replace {
                best = Some((label, weight));
            }
        }

        best
    }
}

/// Detect communities with the default configuration
pub fn detect_communities(graph: &Graph) -> ClusterAssignment {
    CommunityDetector::default().detect(graph)
}

/// Per-node neighbor weight summed by community label.
///
/// Entries keep first-seen order; `slots` maps a label to its entry so each
/// neighbor costs O(1).
struct LabelTally {
    entries: Vec<(u32, f64)>,
    slots: Vec<Option<usize>>,
}

impl LabelTally {
    fn with_label_count(label_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            slots: vec![None; label_count],
        }
    }

    /// Replace the tally with the neighbor labels of `node`, self-loops skipped
    fn fill(&mut self, adjacency: &WeightedAdjacency, labels: &[u32], node: usize) {
        for &(label, _) in &self.entries {
            self.slots[label as usize] = None;
        }
        self.entries.clear();

        for (neighbor, weight) in adjacency.neighbors(node) {
            if neighbor as usize == node {
                continue;
            }

            let label = labels[neighbor as usize];
            match self.slots[label as usize] {
                Some(slot) => self.entries[slot].1 += weight,
                None => {
                    self.slots[label as usize] = Some(self.entries.len());
                    self.entries.push((label, weight));
                }
            }
        }
    }

    fn weight_of(&self, label: u32) -> f64 {
        self.slots[label as usize].map_or(0.0, |slot| self.entries[slot].1)
    }

    fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }
}

/// Map raw labels to dense ids in order of first appearance
fn renumber(adjacency: &WeightedAdjacency, labels: &[u32]) -> ClusterAssignment {
    let mut dense: HashMap<u32, usize> = HashMap::new();
    let clusters = labels
        .iter()
        .map(|&label| {
            let next = dense.len();
            *dense.entry(label).or_insert(next)
        })
        .collect();

    ClusterAssignment::from_parts(adjacency.node_ids.clone(), clusters)
}
