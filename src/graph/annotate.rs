//! Attach community ids to graph nodes for display

use crate::cluster::ClusterAssignment;
use crate::graph::Graph;

/// Copy each node's community id into its display data.
///
/// Returns the number of nodes that received a cluster id.
pub fn annotate_graph(graph: &mut Graph, assignment: &ClusterAssignment) -> usize {
    let mut annotated = 0;

    for node in &mut graph.nodes {
        node.data.cluster = assignment.get(&node.id);
        if node.data.cluster.is_some() {
            annotated += 1;
        }
    }

    if annotated < graph.nodes.len() {
        log::warn!(
            "{} of {} nodes have no cluster assignment",
            graph.nodes.len() - annotated,
            graph.nodes.len()
        );
    }

    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detection::detect_communities;
    use crate::data::RelationMatrix;
    use crate::graph::build_graph;
    use serde_json::json;

    #[test]
    fn every_node_gets_its_cluster() {
        let matrix = RelationMatrix::from_value(&json!({
            "a": {"b": 1.0},
            "c": {},
        }))
        .unwrap();
        let mut graph = build_graph(&matrix);
        let assignment = detect_communities(&graph);

        assert_eq!(annotate_graph(&mut graph, &assignment), 3);
        let a = graph.node("a").unwrap().data.cluster;
        let b = graph.node("b").unwrap().data.cluster;
        let c = graph.node("c").unwrap().data.cluster;
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
