//! Depth-first region traversal

use super::{Container, RegionId, RegionTree};
use petgraph::graph::NodeIndex;

/// Callbacks for [`traverse`]
///
/// `leave_region` runs after all children of the region were visited and may
/// restructure that region. The child list is copied before descending, so the
/// walk never observes a half-updated region. Regions created by a callback are
/// not visited until the next traversal.
pub trait RegionVisitor {
    fn process_block(&mut self, _tree: &RegionTree, _block: NodeIndex) {}

    fn leave_region(&mut self, tree: &mut RegionTree, region: RegionId);
}

/// Visit the whole tree from the root, children before their region
pub fn traverse<V: RegionVisitor + ?Sized>(tree: &mut RegionTree, visitor: &mut V) {
    let root = tree.root();
    traverse_region(tree, root, visitor);
}

fn traverse_region<V: RegionVisitor + ?Sized>(
    tree: &mut RegionTree,
    region: RegionId,
    visitor: &mut V,
) {
    let children = tree.sub_blocks(region).to_vec();
    for child in children {
        match child {
            Container::Block(block) => visitor.process_block(tree, block),
            Container::Region(nested) => traverse_region(tree, nested, visitor),
        }
    }
    visitor.leave_region(tree, region);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionKind;

    struct Recorder {
        left: Vec<RegionId>,
        blocks: Vec<usize>,
    }

    impl RegionVisitor for Recorder {
        fn process_block(&mut self, _tree: &RegionTree, block: NodeIndex) {
            self.blocks.push(block.index());
        }

        fn leave_region(&mut self, _tree: &mut RegionTree, region: RegionId) {
            self.left.push(region);
        }
    }

    #[test]
    fn test_children_are_left_before_parent() {
        let mut tree = RegionTree::new(RegionKind::Sequence);
        let root = tree.root();
        tree.push_block(root, NodeIndex::new(0));
        let inner = tree.push_region(root, RegionKind::Loop);
        tree.push_block(inner, NodeIndex::new(1));
        let innermost = tree.push_region(inner, RegionKind::Sequence);
        tree.push_block(innermost, NodeIndex::new(2));
        tree.push_block(root, NodeIndex::new(3));

        let mut recorder = Recorder {
            left: Vec::new(),
            blocks: Vec::new(),
        };
        traverse(&mut tree, &mut recorder);

        assert_eq!(recorder.left, vec![innermost, inner, root]);
        assert_eq!(recorder.blocks, vec![0, 1, 2, 3]);
    }
}
