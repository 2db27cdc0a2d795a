//! Try/catch region reconstruction
//!
//! Wraps the span of regions forming each try body into its own region tagged
//! with the try-block's guard attribute:
//!
//! 1. [`dominator_locator`] finds the nearest common dominator of the blocks
//!    every try-block protects.
//! 2. [`wrap_driver`] walks the region tree bottom-up until each dominator was
//!    seen as a direct child of some region.
//! 3. [`region_wrapper`] carves the try body out of that region, stopping at
//!    the first container on a handler path ([`handler_path`]).

pub mod dominator_locator;
pub mod handler_path;
pub mod region_wrapper;
pub mod wrap_driver;

pub use dominator_locator::{nearest_common_dominator, search_try_catch_dominators, PendingWraps};
pub use handler_path::on_handler_path;
pub use region_wrapper::wrap_blocks;
pub use wrap_driver::{resolve_pending, DriverStats};

use crate::error::Result;
use crate::method::Method;

/// Traversal cap of the wrap driver
pub const DEFAULT_WRAP_PASS_LIMIT: usize = 100;

/// Options for [`process_try_catch_regions`]
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Full traversals allowed before giving up on a method
    pub wrap_pass_limit: usize,
    /// Check region tree invariants before and after the pass
    pub validate_tree: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            wrap_pass_limit: DEFAULT_WRAP_PASS_LIMIT,
            validate_tree: false,
        }
    }
}

/// What a run of the pass did to one method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub wrapped: usize,
    pub failed: usize,
    pub dropped_overlaps: usize,
    pub passes: usize,
}

/// Rebuild try/catch regions of `method` in place
///
/// Methods without code or without exception handlers are left untouched.
pub fn process_try_catch_regions(method: &mut Method, options: &ProcessOptions) -> Result<ProcessSummary> {
    if method.is_no_code() || !method.has_exception_handlers() {
        return Ok(ProcessSummary::default());
    }
    if options.validate_tree {
        method.regions.validate()?;
    }

    let doms = method.cfg.analyze_dominators();
    let search = search_try_catch_dominators(method, &doms)?;
    let mut pending = search.pending;
    log::debug!(
        "{}: {} try blocks pending, {} dropped",
        method.name,
        pending.len(),
        search.dropped.len()
    );

    let stats = resolve_pending(method, &doms, &mut pending, options.wrap_pass_limit)?;

    if options.validate_tree {
        method.regions.validate()?;
    }

    Ok(ProcessSummary {
        wrapped: stats.wrapped,
        failed: stats.failed,
        dropped_overlaps: search.dropped.len(),
        passes: stats.passes,
    })
}
