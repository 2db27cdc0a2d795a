//! JSON description of methods
//!
//! The CLI reads methods in this shape and writes processed region trees back
//! in the same nested form. Blocks, try-blocks and handler entries are referred
//! to by their position in the corresponding list.

use crate::cfg::{Block, Cfg, EdgeKind};
use crate::error::{Error, Result};
use crate::method::Method;
use crate::regions::{Container, RegionId, RegionKind, RegionTree};
use crate::structuring::ProcessSummary;
use crate::trycatch::{CatchAttr, ExceptionHandler, TryBlockId, TryCatchBlock};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level input document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodsFile {
    pub methods: Vec<MethodDescription>,
}

impl MethodsFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescription {
    pub name: String,
    /// Entry block, the first block when omitted
    #[serde(default)]
    pub entry: Option<usize>,
    pub blocks: Vec<BlockDescription>,
    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
    #[serde(default)]
    pub try_blocks: Vec<TryBlockDescription>,
    pub regions: RegionNode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockDescription {
    #[serde(default)]
    pub offset: u32,
    /// Index of the protecting try-block
    #[serde(default)]
    pub guard: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryBlockDescription {
    pub handlers: Vec<HandlerDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerDescription {
    /// Caught type, absent for catch-all
    #[serde(default)]
    pub catch_type: Option<String>,
    pub entry: usize,
}

/// Nested region as written in JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionNode {
    #[serde(default)]
    pub kind: RegionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_block: Option<usize>,
    #[serde(default)]
    pub children: Vec<ContainerNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerNode {
    Block(usize),
    Region(RegionNode),
}

impl MethodDescription {
    /// Build a [`Method`], checking every index it refers to
    pub fn into_method(self) -> Result<Method> {
        let block_count = self.blocks.len();
        let try_count = self.try_blocks.len();
        let name = self.name;
        let check_block = |index: usize, what: &str| -> Result<NodeIndex> {
            if index < block_count {
                Ok(NodeIndex::new(index))
            } else {
                Err(Error::invalid_input(format!(
                    "{}: {} refers to block {} but only {} blocks exist",
                    name, what, index, block_count
                )))
            }
        };
        let check_try = |index: usize| -> Result<TryBlockId> {
            if index < try_count {
                Ok(TryBlockId(index))
            } else {
                Err(Error::invalid_input(format!(
                    "{}: unknown try block {} ({} defined)",
                    name, index, try_count
                )))
            }
        };

        let mut cfg = Cfg::new();
        for block in &self.blocks {
            let node = match block.guard {
                Some(tb) => Block::guarded(block.offset, check_try(tb)?),
                None => Block::new(block.offset),
            };
            cfg.add_block(node);
        }
        if let Some(entry) = self.entry {
            cfg.set_entry(check_block(entry, "entry")?);
        }
        for edge in self.edges {
            let from = check_block(edge.from, "edge")?;
            let to = check_block(edge.to, "edge")?;
            cfg.add_edge(from, to, edge.kind);
        }

        let mut try_blocks = Vec::with_capacity(try_count);
        for (index, description) in self.try_blocks.into_iter().enumerate() {
            let mut handlers = Vec::with_capacity(description.handlers.len());
            for handler in description.handlers {
                let entry = check_block(handler.entry, "handler")?;
                handlers.push(ExceptionHandler::new(handler.catch_type, entry));
            }
            try_blocks.push(TryCatchBlock::new(TryBlockId(index), handlers));
        }

        let mut tree = RegionTree::new(self.regions.kind);
        let root = tree.root();
        build_region(&mut tree, root, &self.regions, &check_block, &check_try)?;
        tree.validate()?;

        Ok(Method::new(name, cfg, try_blocks, tree))
    }
}

fn build_region(
    tree: &mut RegionTree,
    region: RegionId,
    node: &RegionNode,
    check_block: &dyn Fn(usize, &str) -> Result<NodeIndex>,
    check_try: &dyn Fn(usize) -> Result<TryBlockId>,
) -> Result<()> {
    if let Some(tb) = node.try_block {
        tree.set_catch_attr(region, CatchAttr::new(check_try(tb)?));
    }
    for child in &node.children {
        match child {
            ContainerNode::Block(index) => {
                let block = check_block(*index, "region")?;
                tree.push_block(region, block);
            }
            ContainerNode::Region(nested) => {
                let id = tree.push_region(region, nested.kind);
                build_region(tree, id, nested, check_block, check_try)?;
            }
        }
    }
    Ok(())
}

impl RegionNode {
    /// Nested form of the tree below its root
    pub fn from_tree(tree: &RegionTree) -> Self {
        Self::from_region(tree, tree.root())
    }

    fn from_region(tree: &RegionTree, region: RegionId) -> Self {
        let children = tree
            .sub_blocks(region)
            .iter()
            .map(|child| match *child {
                Container::Block(block) => ContainerNode::Block(block.index()),
                Container::Region(nested) => ContainerNode::Region(Self::from_region(tree, nested)),
            })
            .collect();
        Self {
            kind: tree[region].kind(),
            try_block: tree.catch_attr(region).map(|c| c.try_block.index()),
            children,
        }
    }
}

/// Per-method result written by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub wrapped: usize,
    pub failed: usize,
    pub dropped_overlaps: usize,
    pub passes: usize,
    pub flags: Vec<String>,
    pub warnings: Vec<String>,
    pub regions: RegionNode,
}

impl MethodReport {
    pub fn new(method: &Method, result: &std::result::Result<ProcessSummary, Error>) -> Self {
        let (summary, error) = match result {
            Ok(summary) => (*summary, None),
            Err(e) => (ProcessSummary::default(), Some(e.to_string())),
        };
        Self {
            name: method.name.clone(),
            error,
            wrapped: summary.wrapped,
            failed: summary.failed,
            dropped_overlaps: summary.dropped_overlaps,
            passes: summary.passes,
            flags: method.flags().map(|f| format!("{:?}", f)).collect(),
            warnings: method.warnings().to_vec(),
            regions: RegionNode::from_tree(&method.regions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "methods": [{
            "name": "Sample.run",
            "blocks": [{}, {"guard": 0}, {"offset": 8}],
            "edges": [
                {"from": 0, "to": 1},
                {"from": 1, "to": 2, "kind": "exception"}
            ],
            "try_blocks": [{"handlers": [{"entry": 2}]}],
            "regions": {"children": [{"block": 0}, {"block": 1}, {"region": {"kind": "sequence", "children": [{"block": 2}]}}]}
        }]
    }"#;

    #[test]
    fn test_parse_and_build_method() {
        let file = MethodsFile::from_json(SAMPLE).unwrap();
        let method = file.methods.into_iter().next().unwrap().into_method().unwrap();

        assert_eq!(method.name, "Sample.run");
        assert_eq!(method.cfg.block_count(), 3);
        assert_eq!(method.try_blocks.len(), 1);
        assert!(method.try_blocks[0].has_catch_all());
        assert_eq!(method.cfg.blocks_guarded_by(TryBlockId(0)), vec![NodeIndex::new(1)]);
        assert_eq!(method.regions.region_count(), 2);
    }

    #[test]
    fn test_dangling_handler_is_rejected() {
        let json = SAMPLE.replace(r#"{"entry": 2}"#, r#"{"entry": 7}"#);
        let file = MethodsFile::from_json(&json).unwrap();
        let err = file.methods.into_iter().next().unwrap().into_method().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_duplicate_block_in_regions_is_rejected() {
        let json = SAMPLE.replace(r#"{"block": 1}"#, r#"{"block": 0}"#);
        let file = MethodsFile::from_json(&json).unwrap();
        let err = file.methods.into_iter().next().unwrap().into_method().unwrap_err();
        assert!(matches!(err, Error::RegionTree { .. }));
    }

    #[test]
    fn test_region_node_round_trips_tree_shape() {
        let file = MethodsFile::from_json(SAMPLE).unwrap();
        let description = file.methods[0].clone();
        let expected = description.regions.clone();
        let method = description.into_method().unwrap();

        assert_eq!(RegionNode::from_tree(&method.regions), expected);
    }
}
