//! Handler path test
//!
//! Bounds a try body: the first sibling reachable from a handler entry belongs
//! to handler code (or later code), not to the protected range.

use crate::cfg::{Cfg, DominatorAnalysis};
use crate::regions::utils::has_path_through;
use crate::regions::{Container, RegionTree};
use crate::trycatch::TryCatchBlock;

/// Is `container` part of the code of one of the handlers of `try_block`
pub fn on_handler_path(
    cfg: &Cfg,
    doms: &DominatorAnalysis,
    tree: &RegionTree,
    try_block: &TryCatchBlock,
    container: Container,
) -> bool {
    try_block
        .handlers()
        .iter()
        .any(|handler| has_path_through(cfg, doms, tree, handler.handler_block, container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{Block, EdgeKind};
    use crate::regions::RegionKind;
    use crate::trycatch::{ExceptionHandler, TryBlockId};

    #[test]
    fn test_handler_blocks_and_regions() {
        // 0 -> 1(guarded) -> 3, 1 -exc-> 2 -> 3
        let mut cfg = Cfg::new();
        let b0 = cfg.add_block(Block::new(0));
        let b1 = cfg.add_block(Block::guarded(1, TryBlockId(0)));
        let h = cfg.add_block(Block::new(2));
        let h_body = cfg.add_block(Block::new(3));
        let join = cfg.add_block(Block::new(4));
        cfg.add_edge(b0, b1, EdgeKind::Fall);
        cfg.add_edge(b1, join, EdgeKind::Uncond);
        cfg.add_edge(b1, h, EdgeKind::Exception);
        cfg.add_edge(h, h_body, EdgeKind::Fall);
        cfg.add_edge(h_body, join, EdgeKind::Fall);

        let mut tree = RegionTree::new(RegionKind::Sequence);
        let root = tree.root();
        tree.push_block(root, b0);
        tree.push_block(root, b1);
        let handler_region = tree.push_region(root, RegionKind::Sequence);
        tree.push_block(handler_region, h);
        tree.push_block(handler_region, h_body);
        let empty = tree.push_region(root, RegionKind::Sequence);
        tree.push_block(root, join);

        let doms = cfg.analyze_dominators();
        let tb = TryCatchBlock::new(
            TryBlockId(0),
            vec![ExceptionHandler::new(Some("java.io.IOException".into()), h)],
        );

        assert!(on_handler_path(&cfg, &doms, &tree, &tb, Container::Region(handler_region)));
        assert!(on_handler_path(&cfg, &doms, &tree, &tb, Container::Block(h_body)));
        assert!(!on_handler_path(&cfg, &doms, &tree, &tb, Container::Block(b1)));
        // code after the handler is reached from it too, even though the try body also jumps there
        assert!(on_handler_path(&cfg, &doms, &tree, &tb, Container::Block(join)));
        assert!(!on_handler_path(&cfg, &doms, &tree, &tb, Container::Block(b0)));
        assert!(on_handler_path(&cfg, &doms, &tree, &tb, Container::Region(empty)));
    }
}
