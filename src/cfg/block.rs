//! Basic block module
//!
//! This module contains the Block struct and related functionality.

use crate::trycatch::{CatchAttr, TryBlockId};

/// Basic block of a method body
#[derive(Debug, Clone)]
pub struct Block {
    /// Bytecode offset of the first instruction
    pub offset: u32,
    /// Guard attribute if this block is protected by a try-block
    pub catch: Option<CatchAttr>,
}

impl Block {
    /// Create a new unprotected basic block
    pub fn new(offset: u32) -> Self {
        Self {
            offset,
            catch: None,
        }
    }

    /// Create a basic block protected by `try_block`
    pub fn guarded(offset: u32, try_block: TryBlockId) -> Self {
        Self {
            offset,
            catch: Some(CatchAttr::new(try_block)),
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn catch_attr(&self) -> Option<CatchAttr> {
        self.catch
    }

    /// Get the try-block protecting this block, if any
    pub fn try_block(&self) -> Option<TryBlockId> {
        self.catch.map(|c| c.try_block)
    }

    pub fn is_guarded_by(&self, try_block: TryBlockId) -> bool {
        self.try_block() == Some(try_block)
    }
}
