mod classify;
mod position;
mod region;
mod sizing;
mod types;

pub use classify::classify_branches;
pub use sizing::{node_size, root_size};
pub use types::{BranchSplit, Layout};

use crate::config::LayoutConfig;
use crate::ir::Tree;
use crate::theme::Theme;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs sizing, branch classification, region accumulation and position
/// solving over a parsed tree, then sizes the canvas around the result.
pub fn compute_layout(mut tree: Tree, theme: &Theme, config: &LayoutConfig) -> Layout {
    sizing::size_nodes(&mut tree, theme, config);
    let split = classify_branches(&mut tree);
    region::accumulate_regions(&mut tree, config);
    position::solve_positions(&mut tree, config);

    if config.jitter.enabled {
        let mut rng = match config.jitter.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        position::apply_jitter(&mut tree, &config.jitter, &mut rng);
        shift_into_view(&mut tree, config);
    }

    let (width, height) = canvas_size(&tree, config);
    debug!(
        "layout of {} nodes on a {width:.1}x{height:.1} canvas",
        tree.len()
    );
    Layout {
        tree,
        split,
        width,
        height,
    }
}

/// Jitter can push an edge node past the canvas origin; move everything back.
fn shift_into_view(tree: &mut Tree, config: &LayoutConfig) {
    let floor = config.canvas_padding / 2.0;
    let min_x = tree.nodes.iter().map(|n| n.x).fold(f32::MAX, f32::min);
    let min_y = tree.nodes.iter().map(|n| n.top()).fold(f32::MAX, f32::min);
    let dx = if min_x < floor { floor - min_x } else { 0.0 };
    let dy = if min_y < floor { floor - min_y } else { 0.0 };
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    for node in &mut tree.nodes {
        node.x += dx;
        node.y += dy;
        node.bottom += dy;
    }
}

fn canvas_size(tree: &Tree, config: &LayoutConfig) -> (f32, f32) {
    let mut max_x = 0.0f32;
    let mut max_y = 0.0f32;
    for node in &tree.nodes {
        max_x = max_x.max(node.right());
        max_y = max_y.max(node.y + node.height / 2.0);
    }
    let (floor_w, floor_h) = tree
        .root()
        .map(|root| {
            (
                root.width + config.margin * 2.0,
                root.height + config.margin * 2.0,
            )
        })
        .unwrap_or((config.margin * 2.0, config.margin * 2.0));
    (
        (max_x + config.margin).max(floor_w),
        (max_y + config.margin).max(floor_h),
    )
}
