//! Container-level queries against the CFG

use super::{Container, RegionTree};
use crate::cfg::{Cfg, DominatorAnalysis};
use petgraph::graph::NodeIndex;

/// Is every block of `container` dominated by `dominator`
///
/// A block dominates itself; an empty region is trivially dominated.
pub fn is_dominated_by(
    doms: &DominatorAnalysis,
    tree: &RegionTree,
    dominator: NodeIndex,
    container: Container,
) -> bool {
    match container {
        Container::Block(block) => block == dominator || doms.dominates(dominator, block),
        Container::Region(region) => tree
            .sub_blocks(region)
            .iter()
            .all(|&child| is_dominated_by(doms, tree, dominator, child)),
    }
}

/// Can control reach `container` from `start`
///
/// For a region every sub-container must be reachable, so an empty region
/// counts as reachable and ends a try body like handler code does.
pub fn has_path_through(
    cfg: &Cfg,
    doms: &DominatorAnalysis,
    tree: &RegionTree,
    start: NodeIndex,
    container: Container,
) -> bool {
    match container {
        Container::Block(block) => doms.reaches_forward(cfg, start, block),
        Container::Region(region) => tree
            .sub_blocks(region)
            .iter()
            .all(|&child| has_path_through(cfg, doms, tree, start, child)),
    }
}
