//! Results persistence module

use anyhow::Result;
use crate::cluster::Cluster;
use crate::graph::Graph;
use crate::pipeline::Analysis;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Save analysis results to the specified directory
pub fn save_results(analysis: &Analysis, output_dir: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    log::info!(
        "Saving {} clusters to {}",
        analysis.clusters.len(),
        output_dir.display()
    );

    fs::create_dir_all(output_dir)?;

    save_summary(analysis, output_dir)?;
    save_graph(&analysis.graph, output_dir)?;
    write_json(output_dir.join("assignment.json"), &json!(analysis.assignment))?;
    save_clusters(&analysis.clusters, &analysis.graph, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn save_summary(analysis: &Analysis, output_dir: &Path) -> Result<()> {
    log::info!("Saving summary information");

    let clusters = &analysis.clusters;
    let summary = json!({
        "graph_stats": analysis.stats,
        "cluster_stats": {
            "reported_cluster_count": clusters.len(),
            "total_clustered_nodes": clusters.iter().map(|c| c.size).sum::<usize>(),
            "largest_cluster_size": clusters.first().map_or(0, |c| c.size),
            "smallest_cluster_size": clusters.last().map_or(0, |c| c.size),
            "avg_density": clusters.iter().map(|c| c.density as f64).sum::<f64>() /
                           if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        }
    });

    write_json(output_dir.join("summary.json"), &summary)
}

/// Save the annotated graph in renderer shape
fn save_graph(graph: &Graph, output_dir: &Path) -> Result<()> {
    log::info!("Saving annotated graph");
    write_json(output_dir.join("graph.json"), &json!(graph))
}

/// Save cluster summaries with member ids resolved
fn save_clusters(clusters: &[Cluster], graph: &Graph, output_dir: &Path) -> Result<()> {
    log::info!("Saving individual cluster information");

    let resolve = |ids: &[u32]| -> Vec<String> {
        ids.iter()
            .map(|&idx| {
                graph
                    .nodes
                    .get(idx as usize)
                    .map_or_else(|| idx.to_string(), |node| node.id.clone())
            })
            .collect()
    };

    let clusters_json = json!({
        "clusters": clusters.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "density": c.density,
                "internal_weight": c.internal_weight,
                "central_nodes": {
                    "degree": resolve(&c.central_nodes.degree)
                },
                "members": resolve(&c.members)
            })
        }).collect::<Vec<_>>()
    });

    write_json(output_dir.join("clusters.json"), &clusters_json)
}

fn write_json(path: impl AsRef<Path>, value: &serde_json::Value) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::RelationMatrix;
    use crate::pipeline::analyze;
    use serde_json::Value;

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn writes_all_result_files() {
        let matrix = RelationMatrix::from_value(&json!({
            "a": {"b": 5},
            "b": {"a": 5},
            "c": {},
        }))
        .unwrap();
        let analysis = analyze(&matrix, &Config::default());
        let dir = tempfile::tempdir().unwrap();

        save_results(&analysis, dir.path()).unwrap();

        let assignment = read(&dir.path().join("assignment.json"));
        assert_eq!(assignment, json!({"a": 0, "b": 0, "c": 1}));

        let graph = read(&dir.path().join("graph.json"));
        assert_eq!(graph["nodes"][2]["data"]["cluster"], json!(1));
        assert_eq!(graph["edges"][0]["id"], json!("a-b"));

        let clusters = read(&dir.path().join("clusters.json"));
        assert_eq!(clusters["clusters"][0]["members"], json!(["a", "b"]));

        let summary = read(&dir.path().join("summary.json"));
        assert_eq!(summary["graph_stats"]["community_count"], json!(2));
        assert_eq!(summary["cluster_stats"]["largest_cluster_size"], json!(2));
    }
}
