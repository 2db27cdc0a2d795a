//! CFG visualization module
//!
//! DOT export with protected blocks grouped per try-block.

use crate::cfg::{Block, Cfg, EdgeKind};
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;

/// DOT generation options
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Include edge labels
    pub include_labels: bool,
    /// Include edge colors
    pub include_colors: bool,
    /// Group protected blocks into one cluster per try-block
    pub cluster_try_blocks: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            include_labels: true,
            include_colors: true,
            cluster_try_blocks: true,
        }
    }
}

/// Generate DOT representation of a CFG
///
/// `handler_blocks` are drawn with a double border.
pub fn generate_dot(cfg: &Cfg, handler_blocks: &[NodeIndex], options: &DotOptions) -> String {
    let graph = cfg.graph();
    let mut dot = String::new();
    dot.push_str("digraph CFG {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box];\n\n");

    let mut clusters: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
    let mut loose = Vec::new();
    for node in graph.node_indices() {
        match graph[node].try_block() {
            Some(tb) if options.cluster_try_blocks => {
                clusters.entry(tb.index()).or_default().push(node)
            }
            _ => loose.push(node),
        }
    }

    for (tb, nodes) in &clusters {
        dot.push_str(&format!("  subgraph cluster_try_{} {{\n", tb));
        dot.push_str(&format!("    label=\"try #{}\";\n", tb));
        dot.push_str("    style=dashed;\n");
        for &node in nodes {
            dot.push_str(&format!(
                "    {}\n",
                format_node(node, &graph[node], cfg, handler_blocks)
            ));
        }
        dot.push_str("  }\n");
    }
    for node in loose {
        dot.push_str(&format!(
            "  {}\n",
            format_node(node, &graph[node], cfg, handler_blocks)
        ));
    }

    dot.push('\n');

    for edge in graph.edge_indices() {
        let Some((tail, head)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let edge_kind = &graph[edge];

        let mut edge_str = format!("  {} -> {}", tail.index(), head.index());
        let mut attributes = Vec::new();

        if options.include_labels {
            if let Some(label) = get_edge_label(edge_kind) {
                attributes.push(format!("label=\"{}\"", label));
            }
        }

        if options.include_colors {
            if let Some(color) = get_edge_color(edge_kind) {
                attributes.push(format!("color=\"{}\"", color));
            }
        }
        if *edge_kind == EdgeKind::Exception {
            attributes.push("style=dashed".to_string());
        }

        if !attributes.is_empty() {
            edge_str.push_str(&format!(" [{}]", attributes.join(", ")));
        }

        edge_str.push_str(";\n");
        dot.push_str(&edge_str);
    }

    dot.push_str("}\n");
    dot
}

fn format_node(node: NodeIndex, block: &Block, cfg: &Cfg, handler_blocks: &[NodeIndex]) -> String {
    let mut attrs = vec![format!(
        "label=\"Block {} @{}\"",
        node.index(),
        block.offset()
    )];
    if handler_blocks.contains(&node) {
        attrs.push("peripheries=2".to_string());
    }
    if cfg.entry_node() == Some(node) {
        attrs.push("style=bold".to_string());
    }
    format!("{} [{}];", node.index(), attrs.join(", "))
}

/// Get edge label for DOT
fn get_edge_label(edge_kind: &EdgeKind) -> Option<String> {
    match edge_kind {
        EdgeKind::True => Some("T".to_string()),
        EdgeKind::False => Some("F".to_string()),
        EdgeKind::Switch(idx) => Some(format!("Sw{}", idx)),
        EdgeKind::Default => Some("Def".to_string()),
        EdgeKind::Fall => Some("Fall".to_string()),
        EdgeKind::Exception => Some("Exc".to_string()),
        EdgeKind::Uncond => None,
    }
}

/// Get edge color for DOT
fn get_edge_color(edge_kind: &EdgeKind) -> Option<&'static str> {
    match edge_kind {
        EdgeKind::True => Some("green"),
        EdgeKind::False => Some("red"),
        EdgeKind::Switch(_) => Some("blue"),
        EdgeKind::Default => Some("orange"),
        EdgeKind::Fall => Some("gray"),
        EdgeKind::Exception => Some("purple"),
        EdgeKind::Uncond => Some("black"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trycatch::TryBlockId;

    #[test]
    fn test_dot_clusters_protected_blocks() {
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let b1 = cfg.add_block(Block::guarded(4, TryBlockId(0)));
        let h = cfg.add_block(Block::new(8));
        cfg.add_edge(b0, b1, EdgeKind::Fall);
        cfg.add_edge(b1, h, EdgeKind::Exception);

        let dot = cfg.to_dot(&[h]);
        assert!(dot.contains("subgraph cluster_try_0"));
        assert!(dot.contains("2 [label=\"Block 2 @8\", peripheries=2];"));
        assert!(dot.contains("1 -> 2 [label=\"Exc\", color=\"purple\", style=dashed];"));
    }
}
