use crate::config::LayoutConfig;
use crate::ir::{NodeId, Region, Side, Tree};

/// Bottom-up pass: every node learns the width and height its subtree needs
/// on its side. Nodes are visited deepest first so a node's own region is
/// complete by the time it reports to its parent.
pub(super) fn accumulate_regions(tree: &mut Tree, config: &LayoutConfig) {
    for side in [Side::Right, Side::Left] {
        let mut order: Vec<NodeId> = tree
            .nodes
            .iter()
            .filter(|node| node.side == Some(side))
            .map(|node| node.id)
            .collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&tree.nodes[a], &tree.nodes[b]);
            b.depth()
                .cmp(&a.depth())
                .then_with(|| a.layout_path.cmp(&b.layout_path))
        });

        for id in order {
            let node = &mut tree.nodes[id];
            drop_trailing_gap(node.region_mut(side), config.gap_y);
            let region = node.region(side);
            let claim_width = node.width + region.width + config.gap_x;
            let claim_height = node.height.max(region.height) + config.gap_y;
            let Some(parent) = node.parent else {
                continue;
            };
            let parent_region = tree.nodes[parent].region_mut(side);
            parent_region.width = parent_region.width.max(claim_width);
            parent_region.height += claim_height;
        }

        if let Some(root) = tree.nodes.first_mut() {
            drop_trailing_gap(root.region_mut(side), config.gap_y);
        }
    }
}

/// Each child adds a gap below itself; the last one's gap is not needed.
fn drop_trailing_gap(region: &mut Region, gap_y: f32) {
    if region.height > 0.0 {
        region.height = (region.height - gap_y).max(0.0);
    }
}
