//! Exception metadata
//!
//! Try-blocks, their handlers and the guard attribute that ties blocks and
//! regions to the try-block protecting them. These are produced before the
//! structuring pass runs and are read-only while it runs.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a try-block within its method
///
/// Two try-blocks with identical handlers are still different entities, so
/// everything keyed by a try-block uses this id rather than its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TryBlockId(pub usize);

impl TryBlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TryBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "try #{}", self.0)
    }
}

/// Guard attribute: marks a block or region as protected by a try-block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatchAttr {
    pub try_block: TryBlockId,
}

impl CatchAttr {
    pub fn new(try_block: TryBlockId) -> Self {
        Self { try_block }
    }
}

/// A single catch clause of a try-block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Caught exception type, `None` for catch-all
    pub catch_type: Option<String>,
    /// First block of the handler code
    pub handler_block: NodeIndex,
}

impl ExceptionHandler {
    pub fn new(catch_type: Option<String>, handler_block: NodeIndex) -> Self {
        Self {
            catch_type,
            handler_block,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.catch_type.is_none()
    }
}

/// One exception-table entry
#[derive(Debug, Clone)]
pub struct TryCatchBlock {
    id: TryBlockId,
    handlers: Vec<ExceptionHandler>,
}

impl TryCatchBlock {
    pub fn new(id: TryBlockId, handlers: Vec<ExceptionHandler>) -> Self {
        Self { id, handlers }
    }

    pub fn id(&self) -> TryBlockId {
        self.id
    }

    pub fn handlers(&self) -> &[ExceptionHandler] {
        &self.handlers
    }

    /// The guard attribute attached to the region that ends up holding the try body
    pub fn catch_attr(&self) -> CatchAttr {
        CatchAttr::new(self.id)
    }

    /// Whether any handler of this try-block catches everything (finally-like)
    pub fn has_catch_all(&self) -> bool {
        self.handlers.iter().any(ExceptionHandler::is_catch_all)
    }
}
