//! Structural region tree
//!
//! Regions group basic blocks and nested regions into the constructs that are
//! later rendered as source (sequences, branches, loops, switches). The tree is
//! stored as an arena: regions are addressed by [`RegionId`] and the parent link
//! is a plain index used for navigation only.

pub mod traversal;
pub mod utils;

pub use traversal::{traverse, RegionVisitor};

use crate::error::{Error, Result};
use crate::trycatch::{CatchAttr, TryBlockId};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

/// Index of a region in its [`RegionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element of a region: a basic block or a nested region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Block(NodeIndex),
    Region(RegionId),
}

impl Container {
    pub fn as_block(self) -> Option<NodeIndex> {
        match self {
            Container::Block(block) => Some(block),
            Container::Region(_) => None,
        }
    }

    pub fn as_region(self) -> Option<RegionId> {
        match self {
            Container::Region(region) => Some(region),
            Container::Block(_) => None,
        }
    }
}

impl From<NodeIndex> for Container {
    fn from(block: NodeIndex) -> Self {
        Container::Block(block)
    }
}

impl From<RegionId> for Container {
    fn from(region: RegionId) -> Self {
        Container::Region(region)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Block(block) => write!(f, "Block {}", block.index()),
            Container::Region(region) => write!(f, "Region {}", region.index()),
        }
    }
}

/// Shape of a region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Straight-line sequence of containers
    #[default]
    Sequence,
    /// If/else: condition blocks followed by branch bodies
    Conditional,
    /// Loop: header blocks followed by the body
    Loop,
    /// Switch: dispatch block followed by case bodies
    Switch,
}

impl RegionKind {
    /// Structured kinds keep a fixed layout and only allow swapping a body
    pub fn is_structured(self) -> bool {
        !matches!(self, RegionKind::Sequence)
    }

    pub fn name(self) -> &'static str {
        match self {
            RegionKind::Sequence => "Sequence",
            RegionKind::Conditional => "Conditional",
            RegionKind::Loop => "Loop",
            RegionKind::Switch => "Switch",
        }
    }
}

/// A node of the region tree
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    kind: RegionKind,
    parent: Option<RegionId>,
    sub_blocks: Vec<Container>,
    catch: Option<CatchAttr>,
}

impl Region {
    fn new(kind: RegionKind, parent: Option<RegionId>) -> Self {
        Self {
            kind,
            parent,
            sub_blocks: Vec::new(),
            catch: None,
        }
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn sub_blocks(&self) -> &[Container] {
        &self.sub_blocks
    }

    pub fn catch_attr(&self) -> Option<CatchAttr> {
        self.catch
    }

    pub fn is_empty(&self) -> bool {
        self.sub_blocks.is_empty()
    }
}

/// Arena-backed region tree with a single root
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTree {
    regions: Vec<Region>,
    root: RegionId,
}

impl RegionTree {
    /// Create a tree holding only an empty root region
    pub fn new(root_kind: RegionKind) -> Self {
        Self {
            regions: vec![Region::new(root_kind, None)],
            root: RegionId(0),
        }
    }

    pub fn root(&self) -> RegionId {
        self.root
    }

    /// Number of regions allocated in the arena
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    /// Append a basic block to `region`
    pub fn push_block(&mut self, region: RegionId, block: NodeIndex) {
        self.regions[region.0].sub_blocks.push(Container::Block(block));
    }

    /// Create a region nested at the end of `parent`
    pub fn push_region(&mut self, parent: RegionId, kind: RegionKind) -> RegionId {
        let id = self.create_region(Some(parent), kind, Vec::new());
        self.regions[parent.0].sub_blocks.push(Container::Region(id));
        id
    }

    /// Allocate a region without linking it into the parent's sub-blocks
    ///
    /// The caller is responsible for splicing it in.
    pub fn create_region(
        &mut self,
        parent: Option<RegionId>,
        kind: RegionKind,
        sub_blocks: Vec<Container>,
    ) -> RegionId {
        let id = RegionId(self.regions.len());
        let mut region = Region::new(kind, parent);
        region.sub_blocks = sub_blocks;
        self.regions.push(region);
        id
    }

    pub fn sub_blocks(&self, region: RegionId) -> &[Container] {
        &self.regions[region.0].sub_blocks
    }

    /// Does `region` directly contain `container`
    pub fn contains_sub_block(&self, region: RegionId, container: Container) -> bool {
        self.regions[region.0].sub_blocks.contains(&container)
    }

    pub fn parent(&self, region: RegionId) -> Option<RegionId> {
        self.regions[region.0].parent
    }

    pub fn set_parent(&mut self, region: RegionId, parent: Option<RegionId>) {
        self.regions[region.0].parent = parent;
    }

    pub fn catch_attr(&self, region: RegionId) -> Option<CatchAttr> {
        self.regions[region.0].catch
    }

    pub fn set_catch_attr(&mut self, region: RegionId, attr: CatchAttr) {
        self.regions[region.0].catch = Some(attr);
    }

    /// Replace `old` by `new` in place
    ///
    /// Structured regions only allow one nested region to be swapped for another.
    pub fn replace_sub_block(&mut self, region: RegionId, old: Container, new: Container) -> bool {
        let target = &mut self.regions[region.0];
        if target.kind.is_structured()
            && !matches!((old, new), (Container::Region(_), Container::Region(_)))
        {
            return false;
        }
        match target.sub_blocks.iter().position(|c| *c == old) {
            Some(pos) => {
                target.sub_blocks[pos] = new;
                true
            }
            None => false,
        }
    }

    /// Whether `moved` can be replaced by a single new region in `region`
    pub fn can_splice(&self, region: RegionId, moved: &[Container]) -> bool {
        let target = &self.regions[region.0];
        let Some(first) = moved.first() else {
            return false;
        };
        if !moved.iter().all(|c| target.sub_blocks.contains(c)) {
            return false;
        }
        if target.kind.is_structured() {
            return moved.len() == 1 && matches!(first, Container::Region(_));
        }
        true
    }

    /// Put `new_region` where the first of `moved` was and drop the rest of `moved`
    pub fn splice(&mut self, region: RegionId, moved: &[Container], new_region: RegionId) -> bool {
        if !self.can_splice(region, moved) {
            return false;
        }
        if !self.replace_sub_block(region, moved[0], Container::Region(new_region)) {
            return false;
        }
        let rest = &moved[1..];
        self.regions[region.0]
            .sub_blocks
            .retain(|c| !rest.contains(c));
        true
    }

    /// All basic blocks under `container`, in tree order
    pub fn blocks_of(&self, container: Container) -> Vec<NodeIndex> {
        let mut blocks = Vec::new();
        self.collect_blocks(container, &mut blocks);
        blocks
    }

    fn collect_blocks(&self, container: Container, blocks: &mut Vec<NodeIndex>) {
        match container {
            Container::Block(block) => blocks.push(block),
            Container::Region(region) => {
                for &child in &self.regions[region.0].sub_blocks {
                    self.collect_blocks(child, blocks);
                }
            }
        }
    }

    /// Regions reachable from the root, parents before children
    pub fn reachable_regions(&self) -> Vec<RegionId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(region) = stack.pop() {
            if !seen.insert(region) {
                continue;
            }
            order.push(region);
            for child in self.regions[region.0].sub_blocks.iter().rev() {
                if let Container::Region(r) = child {
                    stack.push(*r);
                }
            }
        }
        order
    }

    /// Regions currently tagged with the guard attribute of `try_block`
    pub fn regions_with_catch(&self, try_block: TryBlockId) -> Vec<RegionId> {
        self.reachable_regions()
            .into_iter()
            .filter(|&r| self.catch_attr(r).map(|c| c.try_block) == Some(try_block))
            .collect()
    }

    /// Check tree invariants: one root, consistent parents, no sharing, no orphans
    pub fn validate(&self) -> Result<()> {
        if self.root.0 >= self.regions.len() {
            return Err(Error::region_tree("root region does not exist"));
        }
        if let Some(parent) = self.parent(self.root) {
            return Err(Error::region_tree(format!(
                "root region has parent {}",
                parent.index()
            )));
        }

        let mut seen_regions = HashSet::new();
        let mut seen_blocks = HashSet::new();
        let mut stack = vec![self.root];
        seen_regions.insert(self.root);
        while let Some(region) = stack.pop() {
            for &child in &self.regions[region.0].sub_blocks {
                match child {
                    Container::Block(block) => {
                        if !seen_blocks.insert(block) {
                            return Err(Error::region_tree(format!(
                                "block {} appears more than once",
                                block.index()
                            )));
                        }
                    }
                    Container::Region(r) => {
                        if r.0 >= self.regions.len() {
                            return Err(Error::region_tree(format!(
                                "region {} does not exist",
                                r.index()
                            )));
                        }
                        if !seen_regions.insert(r) {
                            return Err(Error::region_tree(format!(
                                "region {} is reachable twice",
                                r.index()
                            )));
                        }
                        if self.parent(r) != Some(region) {
                            return Err(Error::region_tree(format!(
                                "region {} has parent {:?}, expected {}",
                                r.index(),
                                self.parent(r).map(RegionId::index),
                                region.index()
                            )));
                        }
                        stack.push(r);
                    }
                }
            }
        }

        if seen_regions.len() != self.regions.len() {
            let detached: Vec<usize> = (0..self.regions.len())
                .filter(|i| !seen_regions.contains(&RegionId(*i)))
                .collect();
            return Err(Error::region_tree(format!(
                "regions {:?} are detached from the root",
                detached
            )));
        }
        Ok(())
    }

    fn fmt_region(&self, f: &mut fmt::Formatter<'_>, region: RegionId, indent: usize) -> fmt::Result {
        let indent_str = "  ".repeat(indent);
        let node = &self.regions[region.0];
        write!(f, "{}{}", indent_str, node.kind.name())?;
        if let Some(catch) = node.catch {
            write!(f, " [{}]", catch.try_block)?;
        }
        writeln!(f)?;
        for &child in &node.sub_blocks {
            match child {
                Container::Block(block) => writeln!(f, "{}  Block {}", indent_str, block.index())?,
                Container::Region(r) => self.fmt_region(f, r, indent + 1)?,
            }
        }
        Ok(())
    }
}

impl Index<RegionId> for RegionTree {
    type Output = Region;

    fn index(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }
}

impl fmt::Display for RegionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_region(f, self.root, 0)
    }
}
