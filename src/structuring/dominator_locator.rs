//! Nearest common dominator of each try-block
//!
//! The region that should hold a try body starts at the block dominating every
//! protected block and dominated by no other such block.

use crate::cfg::DominatorAnalysis;
use crate::error::{Error, Result};
use crate::method::Method;
use crate::regions::{Container, RegionId, RegionTree};
use crate::trycatch::TryBlockId;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Try-blocks waiting to be wrapped, keyed by their dominator block
///
/// Lives for a single run of the pass. Entries are removed as soon as they are
/// resolved, whether wrapping worked or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingWraps {
    entries: BTreeMap<NodeIndex, TryBlockId>,
}

impl PendingWraps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `try_block` under `dominator`, keeping an existing mapping
    ///
    /// Returns the try-block already recorded for `dominator`, in which case
    /// `try_block` is not recorded.
    pub fn insert(&mut self, dominator: NodeIndex, try_block: TryBlockId) -> Option<TryBlockId> {
        match self.entries.get(&dominator) {
            Some(&existing) => Some(existing),
            None => {
                self.entries.insert(dominator, try_block);
                None
            }
        }
    }

    pub fn remove(&mut self, dominator: NodeIndex) -> Option<TryBlockId> {
        self.entries.remove(&dominator)
    }

    pub fn get(&self, dominator: NodeIndex) -> Option<TryBlockId> {
        self.entries.get(&dominator).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, TryBlockId)> + '_ {
        self.entries.iter().map(|(&dom, &tb)| (dom, tb))
    }

    /// First pending entry whose dominator is a direct sub-block of `region`
    pub fn find_in_region(&self, tree: &RegionTree, region: RegionId) -> Option<(NodeIndex, TryBlockId)> {
        self.iter()
            .find(|&(dominator, _)| tree.contains_sub_block(region, Container::Block(dominator)))
    }
}

/// Result of the dominator search
#[derive(Debug, Clone, Default)]
pub struct DominatorSearch {
    pub pending: PendingWraps,
    /// Try-blocks dropped because another one already claimed their dominator
    pub dropped: Vec<TryBlockId>,
}

/// Find the nearest common dominator of every try-block that still needs wrapping
///
/// Try-blocks whose guard attribute already tags a region were wrapped by an
/// earlier run and are skipped. So are try-blocks sharing their dominator with
/// such a wrapped one: an earlier run dropped them as overlapping.
pub fn search_try_catch_dominators(
    method: &mut Method,
    doms: &DominatorAnalysis,
) -> Result<DominatorSearch> {
    let mut search = DominatorSearch::default();
    let mut claimed: BTreeMap<NodeIndex, TryBlockId> = BTreeMap::new();
    let mut open = Vec::new();

    for tb in method.cfg.try_blocks_in_use() {
        if method.try_block(tb).is_none() {
            return Err(Error::invalid_input(format!(
                "block guard references unknown {} in method {}",
                tb, method.name
            )));
        }
        if method.regions.regions_with_catch(tb).is_empty() {
            open.push(tb);
            continue;
        }
        log::debug!("{} already wrapped in {}", tb, method.name);
        if let Ok(dominator) = nearest_common_dominator(doms, &method.cfg.blocks_guarded_by(tb)) {
            claimed.entry(dominator).or_insert(tb);
        }
    }

    for tb in open {
        let protected = method.cfg.blocks_guarded_by(tb);
        let dominator = nearest_common_dominator(doms, &protected).map_err(|residual| {
            Error::StructuralInconsistency {
                method: method.name.clone(),
                blocks: residual.iter().map(|b| b.index()).collect(),
            }
        })?;

        log::debug!(
            "{} in {} covers {} blocks, dominator: block {}",
            tb,
            method.name,
            protected.len(),
            dominator.index()
        );

        if let Some(wrapped) = claimed.get(&dominator) {
            log::debug!(
                "{} in {} shares dominator block {} with wrapped {}, skipping",
                tb,
                method.name,
                dominator.index(),
                wrapped
            );
            continue;
        }

        if let Some(existing) = search.pending.insert(dominator, tb) {
            // Overlapping try-blocks sharing an entry are not merged
            log::info!(
                "Unmerged try blocks in {}: {} and {} share dominator block {}, dropping {}",
                method.name,
                existing,
                tb,
                dominator.index(),
                tb
            );
            method.add_warning(format!(
                "{} dropped: shares dominator block {} with {}",
                tb,
                dominator.index(),
                existing
            ));
            search.dropped.push(tb);
        }
    }

    Ok(search)
}

/// Reduce the common dominators of `blocks` to the nearest one
///
/// On failure returns the residual set, which is empty or has several members.
pub fn nearest_common_dominator(
    doms: &DominatorAnalysis,
    blocks: &[NodeIndex],
) -> std::result::Result<NodeIndex, BTreeSet<NodeIndex>> {
    let mut common: Option<BTreeSet<NodeIndex>> = None;
    for &block in blocks {
        let block_doms = doms.dominators_of(block);
        common = Some(match common {
            None => block_doms,
            Some(acc) => acc.intersection(&block_doms).copied().collect(),
        });
    }
    let mut common = common.unwrap_or_default();

    // drop every candidate that dominates another candidate
    let candidates: Vec<NodeIndex> = common.iter().copied().collect();
    for candidate in candidates {
        for dominator in doms.strict_dominators_of(candidate) {
            common.remove(&dominator);
        }
    }

    let mut residual = common.iter().copied();
    match (residual.next(), residual.next()) {
        (Some(nearest), None) => Ok(nearest),
        _ => Err(common),
    }
}
