//! Export of clustered graphs for external visualization tools

use anyhow::Result;
use crate::cluster::Cluster;
use crate::graph::Graph;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write GraphML and CSV exports of an annotated graph
pub fn generate_visualizations(
    graph: &Graph,
    clusters: &[Cluster],
    output_dir: impl AsRef<Path>,
) -> Result<()> {
    log::info!("Generating visualization exports for {} nodes", graph.node_count());

    let viz_dir = output_dir.as_ref().join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    write_graphml(graph, &viz_dir.join("graph.graphml"))?;
    write_nodes_csv(graph, &viz_dir.join("nodes.csv"))?;
    write_cluster_stats(clusters, &viz_dir.join("cluster_stats.csv"))?;

    log::info!("Visualization exports generated successfully");

    Ok(())
}

/// Write the graph as GraphML with weight and cluster attributes
pub fn write_graphml(graph: &Graph, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"group\" for=\"node\" attr.name=\"group\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"cluster\" for=\"node\" attr.name=\"cluster\" attr.type=\"int\"/>")?;
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>")?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"directed\">")?;

    for node in &graph.nodes {
        writeln!(file, "    <node id=\"{}\">", xml_escape(&node.id))?;
        writeln!(file, "      <data key=\"label\">{}</data>", xml_escape(&node.label))?;
        writeln!(file, "      <data key=\"group\">{}</data>", xml_escape(&node.data.group))?;
        if let Some(cluster) = node.data.cluster {
            writeln!(file, "      <data key=\"cluster\">{}</data>", cluster)?;
        }
        writeln!(file, "    </node>")?;
    }

    for edge in &graph.edges {
        writeln!(
            file,
            "    <edge id=\"{}\" source=\"{}\" target=\"{}\">",
            xml_escape(&edge.id),
            xml_escape(&edge.source),
            xml_escape(&edge.target)
        )?;
        writeln!(file, "      <data key=\"weight\">{}</data>", edge.weight)?;
        writeln!(file, "    </edge>")?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

fn write_nodes_csv(graph: &Graph, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "id,group,cluster_id")?;
    for node in &graph.nodes {
        let cluster = node.data.cluster.map(|c| c.to_string()).unwrap_or_default();
        writeln!(file, "{},{},{}", csv_field(&node.id), csv_field(&node.data.group), cluster)?;
    }
    file.flush()?;

    Ok(())
}

fn write_cluster_stats(clusters: &[Cluster], path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "cluster_id,size,density,internal_weight,central_nodes_count")?;
    for cluster in clusters {
        writeln!(
            file,
            "{},{},{:.6},{:.6},{}",
            cluster.id,
            cluster.size,
            cluster.density,
            cluster.internal_weight,
            cluster.central_nodes.degree.len()
        )?;
    }
    file.flush()?;

    Ok(())
}

fn xml_escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn csv_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}
