//! Configuration management for the stream cluster analyzer

use crate::cluster::detection::{DetectionConfig, TieBreak, DEFAULT_MAX_PASSES};

/// Default configuration for the stream cluster analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of detection passes over the nodes
    pub max_passes: usize,

    /// Tie-break rule between equally weighted neighbor communities
    pub tie_break: TieBreak,

    /// Minimum community size reported in cluster summaries
    pub min_cluster_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            tie_break: TieBreak::LowestLabel,
            min_cluster_size: 1,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(max_passes: usize, tie_break: TieBreak, min_cluster_size: usize) -> Self {
        Self {
            max_passes,
            tie_break,
            min_cluster_size,
        }
    }

    /// Settings handed to the community detector
    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            max_passes: self.max_passes,
            tie_break: self.tie_break,
        }
    }
}
