//! Region wrap driver
//!
//! Resolves pending try-blocks against the region tree. A dominator only
//! becomes a direct child of the region that should own the try body once the
//! regions between them are settled, so the tree is walked repeatedly until
//! nothing is pending.

use super::dominator_locator::PendingWraps;
use super::region_wrapper::wrap_blocks;
use crate::cfg::{Cfg, DominatorAnalysis};
use crate::error::{Error, Result};
use crate::method::{Method, MethodFlag};
use crate::regions::{traverse, RegionId, RegionTree, RegionVisitor};
use crate::trycatch::{TryBlockId, TryCatchBlock};
use petgraph::graph::NodeIndex;

/// Counters of one driver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub wrapped: usize,
    pub failed: usize,
    /// Full traversals performed
    pub passes: usize,
}

/// Visitor resolving at most one pending entry per region
struct WrapVisitor<'a> {
    cfg: &'a Cfg,
    doms: &'a DominatorAnalysis,
    try_blocks: &'a [TryCatchBlock],
    pending: &'a mut PendingWraps,
    wrapped: usize,
    failures: Vec<(NodeIndex, TryBlockId)>,
}

impl WrapVisitor<'_> {
    fn check_and_wrap(&mut self, tree: &mut RegionTree, region: RegionId) {
        // only direct children matter here, nested regions were already visited
        let Some((dominator, tb)) = self.pending.find_in_region(tree, region) else {
            return;
        };
        let wrapped = match self.try_blocks.iter().find(|t| t.id() == tb) {
            Some(try_block) => wrap_blocks(self.cfg, self.doms, tree, region, try_block, dominator),
            None => false,
        };
        if wrapped {
            self.wrapped += 1;
        } else {
            self.failures.push((dominator, tb));
        }
        self.pending.remove(dominator);
    }
}

impl RegionVisitor for WrapVisitor<'_> {
    fn leave_region(&mut self, tree: &mut RegionTree, region: RegionId) {
        self.check_and_wrap(tree, region);
    }
}

/// Walk the tree until `pending` drains
///
/// Fails with [`Error::WrapLimitReached`] when entries remain after
/// `pass_limit + 1` traversals. Wrap failures are not fatal: they flag the
/// method as inconsistent and the run goes on.
pub fn resolve_pending(
    method: &mut Method,
    doms: &DominatorAnalysis,
    pending: &mut PendingWraps,
    pass_limit: usize,
) -> Result<DriverStats> {
    let mut stats = DriverStats::default();

    while !pending.is_empty() {
        stats.passes += 1;
        let mut visitor = WrapVisitor {
            cfg: &method.cfg,
            doms,
            try_blocks: &method.try_blocks,
            pending: &mut *pending,
            wrapped: 0,
            failures: Vec::new(),
        };
        traverse(&mut method.regions, &mut visitor);

        let WrapVisitor {
            wrapped, failures, ..
        } = visitor;
        stats.wrapped += wrapped;
        stats.failed += failures.len();
        for (dominator, tb) in failures {
            log::warn!(
                "Can't wrap try/catch for block {}, method: {}",
                dominator.index(),
                method.name
            );
            method.add_flag(MethodFlag::InconsistentCode);
            method.add_warning(format!(
                "can't wrap {} at dominator block {}",
                tb,
                dominator.index()
            ));
        }

        log::debug!(
            "Wrap pass {} in {}: {} wrapped, {} pending",
            stats.passes,
            method.name,
            wrapped,
            pending.len()
        );

        if !pending.is_empty() && stats.passes > pass_limit {
            return Err(Error::WrapLimitReached {
                method: method.name.clone(),
                passes: stats.passes,
            });
        }
    }

    Ok(stats)
}
