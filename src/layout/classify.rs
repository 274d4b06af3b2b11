use crate::ir::{NodeId, Side, Tree};
use log::debug;

use super::BranchSplit;

/// Splits the root's children into a right half (the first `ceil(n/2)` in
/// outline order) and a left half, pushes each branch's side down to its
/// descendants, and renumbers left branches from zero in `layout_path`.
pub fn classify_branches(tree: &mut Tree) -> BranchSplit {
    let mut branches: Vec<NodeId> = tree
        .nodes
        .iter()
        .filter(|node| node.depth() == 2)
        .map(|node| node.id)
        .collect();
    branches.sort_by(|a, b| tree.nodes[*a].path.cmp(&tree.nodes[*b].path));

    let right = branches.len().div_ceil(2);
    let split = BranchSplit {
        right,
        left: branches.len() - right,
    };
    for (rank, id) in branches.into_iter().enumerate() {
        tree.nodes[id].side = Some(if rank < right { Side::Right } else { Side::Left });
    }

    // Arena order is pre-order, so a parent's side is settled before its children.
    for id in 0..tree.nodes.len() {
        if tree.nodes[id].depth() <= 2 {
            continue;
        }
        let Some(parent) = tree.nodes[id].parent else {
            continue;
        };
        tree.nodes[id].side = tree.nodes[parent].side;
    }

    for node in &mut tree.nodes {
        node.layout_path = match node.side {
            Some(Side::Left) => node.path.renumber_branch(right),
            _ => node.path.clone(),
        };
    }

    debug!(
        "classified branches: {} right, {} left",
        split.right, split.left
    );
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_outline;

    #[test]
    fn splits_odd_count_towards_right() {
        let mut tree = parse_outline("root\n a\n  a1\n b\n c\n  c1\n   c2").unwrap();
        let split = classify_branches(&mut tree);
        assert_eq!(split, BranchSplit { right: 2, left: 1 });

        let side_of = |text: &str| {
            tree.nodes
                .iter()
                .find(|node| node.text == text)
                .and_then(|node| node.side)
        };
        assert_eq!(side_of("root"), None);
        assert_eq!(side_of("a"), Some(Side::Right));
        assert_eq!(side_of("a1"), Some(Side::Right));
        assert_eq!(side_of("b"), Some(Side::Right));
        assert_eq!(side_of("c"), Some(Side::Left));
        assert_eq!(side_of("c2"), Some(Side::Left));
    }

    #[test]
    fn left_branches_are_renumbered_from_zero() {
        let mut tree = parse_outline("root\n a\n b\n c\n d\n  d1").unwrap();
        classify_branches(&mut tree);
        let d1 = tree.nodes.iter().find(|node| node.text == "d1").unwrap();
        assert_eq!(d1.path.to_string(), "0-3-0");
        assert_eq!(d1.layout_path.to_string(), "0-1-0");
        let c = tree.nodes.iter().find(|node| node.text == "c").unwrap();
        assert_eq!(c.layout_path.to_string(), "0-0");
        let b = tree.nodes.iter().find(|node| node.text == "b").unwrap();
        assert_eq!(b.layout_path, b.path);
    }

    #[test]
    fn root_only_has_no_branches() {
        let mut tree = parse_outline("alone").unwrap();
        assert_eq!(classify_branches(&mut tree), BranchSplit::default());
    }
}
