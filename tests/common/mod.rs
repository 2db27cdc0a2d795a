#![allow(dead_code)]

use petgraph::graph::NodeIndex;
use trycatch_regions::{
    Block, Cfg, EdgeKind, ExceptionHandler, Method, RegionId, RegionTree, TryBlockId,
    TryCatchBlock,
};

/// Build a CFG with one block per entry of `guards`, block `i` at offset `i * 4`
pub fn build_cfg(guards: &[Option<usize>], edges: &[(usize, usize, EdgeKind)]) -> (Cfg, Vec<NodeIndex>) {
    let mut cfg = Cfg::new();
    let nodes: Vec<NodeIndex> = guards
        .iter()
        .enumerate()
        .map(|(i, guard)| {
            let offset = (i * 4) as u32;
            cfg.add_block(match guard {
                Some(tb) => Block::guarded(offset, TryBlockId(*tb)),
                None => Block::new(offset),
            })
        })
        .collect();
    for (from, to, kind) in edges {
        cfg.add_edge(nodes[*from], nodes[*to], kind.clone());
    }
    (cfg, nodes)
}

/// Try-block `id` with one typed handler per entry block
pub fn try_block(id: usize, handler_entries: &[NodeIndex]) -> TryCatchBlock {
    TryCatchBlock::new(
        TryBlockId(id),
        handler_entries
            .iter()
            .map(|&entry| ExceptionHandler::new(Some("java.lang.Exception".to_string()), entry))
            .collect(),
    )
}

pub fn push_blocks(tree: &mut RegionTree, region: RegionId, blocks: &[NodeIndex]) {
    for &block in blocks {
        tree.push_block(region, block);
    }
}

/// `B0 -> B1 -> {B2, B3} -> B4 (handler) -> B5`, B2 and B3 guarded by try #0
///
/// Region tree is one flat sequence of all six blocks.
pub fn branch_try_method() -> (Method, Vec<NodeIndex>) {
    let (cfg, b) = build_cfg(
        &[None, None, Some(0), Some(0), None, None],
        &[
            (0, 1, EdgeKind::Fall),
            (1, 2, EdgeKind::True),
            (1, 3, EdgeKind::False),
            (2, 5, EdgeKind::Uncond),
            (3, 5, EdgeKind::Fall),
            (2, 4, EdgeKind::Exception),
            (3, 4, EdgeKind::Exception),
            (4, 5, EdgeKind::Fall),
        ],
    );
    let mut tree = RegionTree::new(trycatch_regions::RegionKind::Sequence);
    let root = tree.root();
    push_blocks(&mut tree, root, &b);
    let method = Method::new("Branchy.run", cfg, vec![try_block(0, &[b[4]])], tree);
    (method, b)
}
