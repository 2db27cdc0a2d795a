//! trycatch-regions: try/catch region reconstruction for decompiler structuring
//!
//! Given a method's basic-block graph and the region tree built from it, this
//! library finds the span of regions forming each `try` body and wraps it in a
//! region carrying the try-block's guard attribute.

pub mod cfg;
pub mod cli;
pub mod description;
pub mod error;
pub mod method;
pub mod processor;
pub mod regions;
pub mod structuring;
pub mod trycatch;

pub use error::{Error as TryCatchError, Result as TryCatchResult};

// Re-export commonly used types
pub use cfg::{Block, Cfg, DominatorAnalysis, EdgeKind};
pub use method::{Method, MethodFlag};
pub use processor::{MethodOutcome, TryCatchProcessor};
pub use regions::{Container, RegionId, RegionKind, RegionTree};
pub use structuring::{process_try_catch_regions, ProcessOptions, ProcessSummary};
pub use trycatch::{CatchAttr, ExceptionHandler, TryBlockId, TryCatchBlock};
