//! Flowchart DOT Exporter
//!
//! Exports the filtered call graph as a Graphviz digraph with flowchart
//! styling. The text is what `dot` consumes to render the PNG/SVG images.

use std::collections::BTreeSet;

use crate::domain::callgraph::CallGraph;

pub struct FlowchartExporter;

impl FlowchartExporter {
    /// Convert a call graph to DOT text. `display_name` becomes the graph
    /// label, normally the analyzed file's name.
    pub fn to_dot(graph: &CallGraph, display_name: &str) -> String {
        let mut lines = Vec::new();

        // Graph configuration for left-to-right flowchart layout
        lines.push("digraph G {".to_string());
        lines.push(format!("  label=\"{}\";", display_name));
        lines.push("  labelloc=t;".to_string());
        lines.push("  rankdir=LR;".to_string());
        lines.push("  node [shape=box, style=rounded, fontname=\"Helvetica\"];".to_string());
        lines.push("  edge [fontname=\"Helvetica\"];".to_string());

        // Declare every name that appears anywhere, sorted for stable output.
        let mut all_names: BTreeSet<&str> = BTreeSet::new();
        for node in &graph.nodes {
            all_names.insert(node.name.as_str());
            for callee in &node.callees {
                all_names.insert(callee.as_str());
            }
        }
        for name in &all_names {
            lines.push(format!("  \"{}\";", name));
        }

        // Edges per caller in definition order, deduplicated and sorted.
        for node in &graph.nodes {
            let targets: BTreeSet<&str> = node.callees.iter().map(String::as_str).collect();
            for callee in targets {
                lines.push(format!("  \"{}\" -> \"{}\";", node.name, callee));
            }
        }

        lines.push("}".to_string());

        lines.join("\n")
    }
}
