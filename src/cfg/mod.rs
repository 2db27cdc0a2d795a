//! Control Flow Graph (CFG) module
//!
//! Basic-block graph of a single method, the dominance oracle built on top of
//! it, and DOT export.

pub mod analysis;
pub mod block;
pub mod visualization;

pub use analysis::DominatorAnalysis;
pub use block::Block;

use crate::trycatch::TryBlockId;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Edge kind in the control flow graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Fallthrough to next block
    #[default]
    Fall,
    /// Unconditional jump
    Uncond,
    /// Conditional jump (true branch)
    True,
    /// Conditional jump (false branch)
    False,
    /// Switch case jump
    Switch(usize),
    /// Default case for switch
    Default,
    /// Protected block to exception handler entry
    Exception,
}

/// Basic-block graph of one method
#[derive(Debug, Clone, Default)]
pub struct Cfg {
    /// The underlying graph
    graph: DiGraph<Block, EdgeKind>,
    /// Method entry (first block added unless set explicitly)
    entry: Option<NodeIndex>,
}

impl Cfg {
    /// Create a new empty CFG
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block, the first one becomes the entry
    pub fn add_block(&mut self, block: Block) -> NodeIndex {
        let node = self.graph.add_node(block);
        if self.entry.is_none() {
            self.entry = Some(node);
        }
        node
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        self.graph.add_edge(from, to, kind);
    }

    pub fn set_entry(&mut self, entry: NodeIndex) {
        self.entry = Some(entry);
    }

    /// Get the entry node for the method
    pub fn entry_node(&self) -> Option<NodeIndex> {
        self.entry
    }

    /// Get the underlying graph
    pub fn graph(&self) -> &DiGraph<Block, EdgeKind> {
        &self.graph
    }

    /// Get the underlying graph mutably
    pub fn graph_mut(&mut self) -> &mut DiGraph<Block, EdgeKind> {
        &mut self.graph
    }

    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn block(&self, node: NodeIndex) -> Option<&Block> {
        self.graph.node_weight(node)
    }

    /// Compute dominator sets for every block
    pub fn analyze_dominators(&self) -> DominatorAnalysis {
        DominatorAnalysis::compute(self)
    }

    /// Distinct try-blocks referenced by block guard attributes, in id order
    pub fn try_blocks_in_use(&self) -> BTreeSet<TryBlockId> {
        self.graph
            .node_weights()
            .filter_map(Block::try_block)
            .collect()
    }

    /// All blocks protected by `try_block`
    pub fn blocks_guarded_by(&self, try_block: TryBlockId) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&node| self.graph[node].is_guarded_by(try_block))
            .collect()
    }

    /// Export CFG to DOT format for visualization
    pub fn to_dot(&self, handler_blocks: &[NodeIndex]) -> String {
        visualization::generate_dot(self, handler_blocks, &visualization::DotOptions::default())
    }
}
