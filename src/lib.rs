//! Core library functions for the stream cluster analyzer

pub mod config;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod pipeline;
pub mod storage;
pub mod viz;

pub use anyhow::{Result, anyhow};

pub use cluster::{detect_communities, ClusterAssignment, CommunityDetector, DetectionConfig, TieBreak};
pub use config::Config;
pub use data::{RelationError, RelationMatrix};
pub use graph::{build_graph, Graph, GraphEdge, GraphNode};
pub use pipeline::{analyze, Analysis};
