//! Dominator analysis
//!
//! Per-block dominator sets derived from petgraph's dominator tree. This is the
//! dominance oracle the try/catch pass asks "does A dominate B".

use crate::cfg::Cfg;
use petgraph::algo::dominators::simple_fast;
use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use petgraph::visit::NodeFiltered;
use std::collections::{BTreeSet, HashMap};

/// Dominator analysis results
#[derive(Debug, Clone, Default)]
pub struct DominatorAnalysis {
    /// Every block that dominates the key block, the key itself included
    dominators: HashMap<NodeIndex, BTreeSet<NodeIndex>>,
    immediate_dominators: HashMap<NodeIndex, NodeIndex>,
}

impl DominatorAnalysis {
    /// Compute dominators of all blocks reachable from the CFG entry
    ///
    /// Unreachable blocks get an empty dominator set.
    pub fn compute(cfg: &Cfg) -> Self {
        let mut analysis = Self::default();
        let Some(entry) = cfg.entry_node() else {
            return analysis;
        };

        let doms = simple_fast(cfg.graph(), entry);
        for node in cfg.graph().node_indices() {
            let set: BTreeSet<NodeIndex> = doms
                .dominators(node)
                .map(|iter| iter.collect())
                .unwrap_or_default();
            if let Some(idom) = doms.immediate_dominator(node) {
                analysis.immediate_dominators.insert(node, idom);
            }
            analysis.dominators.insert(node, set);
        }

        log::debug!(
            "Computed dominators for {} blocks from entry {}",
            analysis.dominators.len(),
            entry.index()
        );
        analysis
    }

    /// Build the analysis from externally computed dominator sets
    pub fn from_sets(sets: impl IntoIterator<Item = (NodeIndex, BTreeSet<NodeIndex>)>) -> Self {
        Self {
            dominators: sets.into_iter().collect(),
            immediate_dominators: HashMap::new(),
        }
    }

    /// Dominator set of `node`, including `node` when it is reachable
    pub fn dominators_of(&self, node: NodeIndex) -> BTreeSet<NodeIndex> {
        self.dominators.get(&node).cloned().unwrap_or_default()
    }

    /// Dominators of `node` other than `node` itself
    pub fn strict_dominators_of(&self, node: NodeIndex) -> BTreeSet<NodeIndex> {
        let mut set = self.dominators_of(node);
        set.remove(&node);
        set
    }

    /// Check if `dominator` dominates `node`
    pub fn dominates(&self, dominator: NodeIndex, node: NodeIndex) -> bool {
        self.dominators
            .get(&node)
            .map(|doms| doms.contains(&dominator))
            .unwrap_or(false)
    }

    pub fn immediate_dominator(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.immediate_dominators.get(&node).copied()
    }

    /// Can `to` be reached from `from` without passing through a dominator of `from`
    ///
    /// Paths may leave the blocks `from` dominates, so join points after
    /// `from` are reachable. Back-edges into the blocks dominating `from`
    /// (a loop header the handler jumps back to) are not followed.
    pub fn reaches_forward(&self, cfg: &Cfg, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to {
            return true;
        }
        let before = self.strict_dominators_of(from);
        if before.contains(&to) {
            return false;
        }
        let forward = NodeFiltered::from_fn(cfg.graph(), |node| !before.contains(&node));
        has_path_connecting(&forward, from, to, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{Block, EdgeKind};

    #[test]
    fn test_diamond_dominators() {
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let b1 = cfg.add_block(Block::new(1));
        let b2 = cfg.add_block(Block::new(2));
        let b3 = cfg.add_block(Block::new(3));
        cfg.add_edge(b0, b1, EdgeKind::True);
        cfg.add_edge(b0, b2, EdgeKind::False);
        cfg.add_edge(b1, b3, EdgeKind::Uncond);
        cfg.add_edge(b2, b3, EdgeKind::Fall);

        let doms = cfg.analyze_dominators();
        assert_eq!(doms.dominators_of(b3), BTreeSet::from([b0, b3]));
        assert_eq!(doms.strict_dominators_of(b3), BTreeSet::from([b0]));
        assert!(doms.dominates(b0, b1));
        assert!(!doms.dominates(b1, b3));
        assert_eq!(doms.immediate_dominator(b3), Some(b0));
    }

    #[test]
    fn test_unreachable_block_has_no_dominators() {
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let orphan = cfg.add_block(Block::new(1));

        let doms = cfg.analyze_dominators();
        assert_eq!(doms.dominators_of(b0), BTreeSet::from([b0]));
        assert!(doms.dominators_of(orphan).is_empty());
    }

    #[test]
    fn test_reaches_forward_skips_loop_back_edges() {
        // 0 -> 1 -> 2 -> 0 loop, handler 3 reached from 1 and looping back to 0
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let b1 = cfg.add_block(Block::new(1));
        let b2 = cfg.add_block(Block::new(2));
        let h = cfg.add_block(Block::new(3));
        let h_tail = cfg.add_block(Block::new(4));
        cfg.add_edge(b0, b1, EdgeKind::Fall);
        cfg.add_edge(b1, b2, EdgeKind::Fall);
        cfg.add_edge(b2, b0, EdgeKind::Uncond);
        cfg.add_edge(b1, h, EdgeKind::Exception);
        cfg.add_edge(h, h_tail, EdgeKind::Fall);
        cfg.add_edge(h_tail, b0, EdgeKind::Uncond);

        let doms = cfg.analyze_dominators();
        assert!(doms.reaches_forward(&cfg, h, h));
        assert!(doms.reaches_forward(&cfg, h, h_tail));
        assert!(!doms.reaches_forward(&cfg, h, b0));
        assert!(!doms.reaches_forward(&cfg, h, b1));
        assert!(!doms.reaches_forward(&cfg, h, b2));
    }

    #[test]
    fn test_reaches_forward_follows_join_points() {
        // 0 -> 1(try) -> 2, handler 1 -exc-> 3 -> 2
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let b1 = cfg.add_block(Block::new(1));
        let join = cfg.add_block(Block::new(2));
        let h = cfg.add_block(Block::new(3));
        cfg.add_edge(b0, b1, EdgeKind::Fall);
        cfg.add_edge(b1, join, EdgeKind::Fall);
        cfg.add_edge(b1, h, EdgeKind::Exception);
        cfg.add_edge(h, join, EdgeKind::Uncond);

        let doms = cfg.analyze_dominators();
        assert!(!doms.dominates(h, join));
        assert!(doms.reaches_forward(&cfg, h, join));
        assert!(!doms.reaches_forward(&cfg, h, b1));
        assert!(!doms.reaches_forward(&cfg, join, h));
    }
}
