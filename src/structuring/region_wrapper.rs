//! Region wrapper
//!
//! Moves the run of sub-containers that form a try body into a new region
//! tagged with the try-block's guard attribute.

use super::handler_path::on_handler_path;
use crate::cfg::{Cfg, DominatorAnalysis};
use crate::regions::utils::is_dominated_by;
use crate::regions::{Container, RegionId, RegionKind, RegionTree};
use crate::trycatch::TryCatchBlock;
use petgraph::graph::NodeIndex;

/// Extract the containers of `region` dominated by `dominator` into a try region
///
/// Collection stops at the first dominated container that lies on a handler
/// path. Returns false, leaving `region` untouched, when nothing was collected
/// or the region refuses the splice.
pub fn wrap_blocks(
    cfg: &Cfg,
    doms: &DominatorAnalysis,
    tree: &mut RegionTree,
    region: RegionId,
    try_block: &TryCatchBlock,
    dominator: NodeIndex,
) -> bool {
    let mut body = Vec::new();
    for &container in tree.sub_blocks(region) {
        if !is_dominated_by(doms, tree, dominator, container) {
            continue;
        }
        if on_handler_path(cfg, doms, tree, try_block, container) {
            break;
        }
        body.push(container);
    }

    if body.is_empty() {
        log::debug!(
            "Nothing dominated by block {} in region {}",
            dominator.index(),
            region.index()
        );
        return false;
    }
    if !tree.can_splice(region, &body) {
        log::debug!(
            "{:?} region {} refuses to splice {} containers",
            tree[region].kind(),
            region.index(),
            body.len()
        );
        return false;
    }

    let try_region = tree.create_region(Some(region), RegionKind::Sequence, body.clone());
    if !tree.splice(region, &body, try_region) {
        return false;
    }
    tree.set_catch_attr(try_region, try_block.catch_attr());

    for container in &body {
        if let Container::Region(moved) = *container {
            tree.set_parent(moved, Some(try_region));
        }
    }

    log::debug!(
        "Wrapped {} containers of region {} into region {} for {}",
        body.len(),
        region.index(),
        try_region.index(),
        try_block.id()
    );
    true
}
