use crate::config::{JitterConfig, LayoutConfig};
use crate::ir::{NodeId, NodePath, Side, Tree};
use log::trace;
use rand::Rng;
use std::collections::HashMap;

/// Top-down pass. The root sits between the two half regions; every other
/// node is placed beside its parent, stacked under its previous sibling.
pub(super) fn solve_positions(tree: &mut Tree, config: &LayoutConfig) {
    place_root(tree, config);

    for side in [Side::Right, Side::Left] {
        let mut order: Vec<NodeId> = tree
            .nodes
            .iter()
            .filter(|node| node.side == Some(side))
            .map(|node| node.id)
            .collect();
        order.sort_by(|&a, &b| tree.nodes[a].layout_path.cmp(&tree.nodes[b].layout_path));

        let mut placed: HashMap<NodePath, NodeId> = HashMap::with_capacity(order.len());
        for id in order {
            let Some(parent_id) = tree.nodes[id].parent else {
                continue;
            };
            let parent = &tree.nodes[parent_id];
            let (parent_x, parent_y, parent_width) = (parent.x, parent.y, parent.width);
            let parent_span = parent.region(side).height;

            let node = &tree.nodes[id];
            let own = node.effective_height(side);
            let x = match side {
                Side::Right => parent_x + parent_width + config.gap_x,
                Side::Left => parent_x - node.width - config.gap_x,
            };
            let previous = node
                .layout_path
                .previous_sibling()
                .and_then(|path| placed.get(&path).copied());
            let y = match previous {
                Some(prev) => tree.nodes[prev].bottom + config.gap_y + own / 2.0,
                None => parent_y - parent_span / 2.0 + own / 2.0,
            };

            let node = &mut tree.nodes[id];
            node.x = x;
            node.y = y;
            node.bottom = y + own / 2.0;
            trace!(
                "{} ({:?}) at ({x:.1}, {y:.1}) bottom {:.1}",
                node.path, side, node.bottom
            );
            placed.insert(node.layout_path.clone(), id);
        }
    }

    propagate_bottoms(tree);
}

fn place_root(tree: &mut Tree, config: &LayoutConfig) {
    let Some(root) = tree.nodes.first_mut() else {
        return;
    };
    let span = root.left_region.height.max(root.right_region.height);
    // A childless root has no regions and is centered on its own size.
    let extent = span.max(root.height);
    root.x = root.left_region.width + config.canvas_padding / 2.0;
    root.y = extent / 2.0 + config.canvas_padding / 2.0;
    root.bottom = root.y + extent / 2.0;
}

/// Children follow their parents in the arena, so walking it backwards
/// settles every subtree before its parent reads it.
fn propagate_bottoms(tree: &mut Tree) {
    for id in (0..tree.nodes.len()).rev() {
        let Some(parent) = tree.nodes[id].parent else {
            continue;
        };
        let bottom = tree.nodes[id].bottom;
        let parent = &mut tree.nodes[parent];
        parent.bottom = parent.bottom.max(bottom);
    }
}

/// Nudges every node by a random fraction of its size for a hand-drawn look.
pub(super) fn apply_jitter<R: Rng>(tree: &mut Tree, jitter: &JitterConfig, rng: &mut R) {
    for node in &mut tree.nodes {
        let dx = node.width * jitter.horizontal_ratio * rng.random_range(-1.0f32..=1.0);
        let dy = node.height * jitter.vertical_ratio * rng.random_range(-1.0f32..=1.0);
        node.x += dx;
        node.y += dy;
        node.bottom = node.bottom.max(node.y + node.height / 2.0);
    }
}
