//! Per-method unit of work
//!
//! Bundles what the try/catch pass reads and mutates for one method: the CFG,
//! its exception metadata and the region tree, plus the quality flags the pass
//! leaves behind for later rendering stages.

use crate::cfg::Cfg;
use crate::regions::{RegionKind, RegionTree};
use crate::trycatch::{TryBlockId, TryCatchBlock};
use std::collections::BTreeSet;
use std::fmt;

/// Quality markers attached to a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MethodFlag {
    /// Some try-block could not be wrapped; structure is best-effort
    InconsistentCode,
    /// Try/catch reconstruction aborted; fallback code shape required
    TryCatchFallback,
}

/// A method body ready for try/catch region reconstruction
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub cfg: Cfg,
    pub try_blocks: Vec<TryCatchBlock>,
    pub regions: RegionTree,
    flags: BTreeSet<MethodFlag>,
    warnings: Vec<String>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        cfg: Cfg,
        try_blocks: Vec<TryCatchBlock>,
        regions: RegionTree,
    ) -> Self {
        Self {
            name: name.into(),
            cfg,
            try_blocks,
            regions,
            flags: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    /// A method with no code at all
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Cfg::new(), Vec::new(), RegionTree::new(RegionKind::Sequence))
    }

    pub fn is_no_code(&self) -> bool {
        self.cfg.is_empty()
    }

    pub fn has_exception_handlers(&self) -> bool {
        !self.try_blocks.is_empty()
    }

    pub fn try_block(&self, id: TryBlockId) -> Option<&TryCatchBlock> {
        self.try_blocks.iter().find(|tb| tb.id() == id)
    }

    pub fn add_flag(&mut self, flag: MethodFlag) {
        self.flags.insert(flag);
    }

    pub fn has_flag(&self, flag: MethodFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn flags(&self) -> impl Iterator<Item = MethodFlag> + '_ {
        self.flags.iter().copied()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
