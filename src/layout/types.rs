use crate::ir::{Node, Side, Tree};

/// How many depth-2 branches went to each half of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchSplit {
    pub right: usize,
    pub left: usize,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub tree: Tree,
    pub split: BranchSplit,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn root(&self) -> Option<&Node> {
        self.tree.root()
    }

    pub fn nodes_on(&self, side: Side) -> impl Iterator<Item = &Node> {
        self.tree
            .nodes
            .iter()
            .filter(move |node| node.side == Some(side))
    }
}
