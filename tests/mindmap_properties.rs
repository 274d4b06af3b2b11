use mindmap_rs_renderer::api::{MindmapRequest, handle_request};
use mindmap_rs_renderer::ir::Side;
use mindmap_rs_renderer::render::DrawCommand;
use mindmap_rs_renderer::{
    Config, LayoutConfig, MindmapError, RenderOptions, Theme, build_commands, compute_layout,
    parse_outline, render_with_options,
};

fn outline_with_branches(count: usize) -> String {
    let mut out = String::from("hub\n");
    for i in 0..count {
        out.push_str(&format!(" branch {i}\n  leaf {i}\n"));
    }
    out
}

#[test]
fn three_node_outline_draws_four_shapes_and_three_connectors() {
    let tree = parse_outline("A\n B\n C\n  D").unwrap();
    let paths: Vec<String> = tree.nodes.iter().map(|n| n.path.to_string()).collect();
    assert_eq!(paths, ["0", "0-0", "0-1", "0-1-0"]);

    let config = LayoutConfig::default();
    let layout = compute_layout(tree, &Theme::classic(), &config);
    assert_eq!((layout.split.right, layout.split.left), (1, 1));

    let commands = build_commands(&layout, &config, None);
    let circles = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    let rects = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::RoundedRect { .. }))
        .count();
    let connectors = commands.iter().filter(|c| !c.is_shape()).count();
    assert_eq!((circles, rects, connectors), (1, 3, 3));

    let d = &layout.tree.nodes[3];
    assert_eq!(d.side, Some(Side::Left));
    assert_eq!(d.layout_path.to_string(), "0-0-0");
}

#[test]
fn rendering_is_deterministic_without_jitter() {
    let code = outline_with_branches(5);
    let first = render_with_options(&code, RenderOptions::classic()).unwrap();
    let second = render_with_options(&code, RenderOptions::classic()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn seeded_jitter_is_byte_identical() {
    let code = outline_with_branches(4);
    let mut options = RenderOptions::modern();
    options.layout.jitter.enabled = true;
    options.layout.jitter.seed = Some(42);
    let first = render_with_options(&code, options.clone()).unwrap();
    let second = render_with_options(&code, options.clone()).unwrap();
    assert_eq!(first, second);

    options.layout.jitter.seed = Some(43);
    let other = render_with_options(&code, options).unwrap();
    assert_ne!(first, other);
}

#[test]
fn root_never_shrinks_below_floor() {
    let config = LayoutConfig::default();
    for text in ["a", "ab", "中"] {
        let layout = compute_layout(parse_outline(text).unwrap(), &Theme::classic(), &config);
        let root = layout.root().unwrap();
        assert!(root.width >= config.root_min_diameter);
        assert_eq!(root.width, root.height);
    }
}

#[test]
fn broad_char_doubles_wide_glyphs_only() {
    let narrow = LayoutConfig::default();
    let broad = LayoutConfig {
        broad_char: true,
        ..Default::default()
    };
    let code = "root\n 日本\n ab";
    let a = compute_layout(parse_outline(code).unwrap(), &Theme::classic(), &narrow);
    let b = compute_layout(parse_outline(code).unwrap(), &Theme::classic(), &broad);
    let fs = narrow.branch_font_size;
    assert_eq!(b.tree.nodes[1].width - a.tree.nodes[1].width, 2.0 * fs);
    assert_eq!(b.tree.nodes[2].width, a.tree.nodes[2].width);
}

#[test]
fn right_side_takes_the_larger_half() {
    for count in 0..8 {
        let layout = compute_layout(
            parse_outline(&outline_with_branches(count)).unwrap(),
            &Theme::classic(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.split.right, count.div_ceil(2), "{count} branches");
        assert_eq!(layout.split.right + layout.split.left, count);
    }
}

#[test]
fn bottoms_cover_own_box() {
    let layout = compute_layout(
        parse_outline(&outline_with_branches(6)).unwrap(),
        &Theme::classic(),
        &LayoutConfig::default(),
    );
    for node in &layout.tree.nodes {
        assert!(node.bottom + 1e-3 >= node.y + node.height / 2.0, "{}", node.path);
        if let Some(parent) = node.parent {
            assert!(layout.tree.nodes[parent].bottom + 1e-3 >= node.bottom);
        }
    }
}

#[test]
fn outline_survives_a_round_trip() {
    let code = "root\n a\n  a1\n  a2\n b\n  b1\n   b11\n";
    let tree = parse_outline(code).unwrap();
    assert_eq!(tree.to_outline(), code);
    let again = parse_outline(&tree.to_outline()).unwrap();
    let paths = |t: &mindmap_rs_renderer::ir::Tree| {
        t.nodes.iter().map(|n| n.path.clone()).collect::<Vec<_>>()
    };
    assert_eq!(paths(&tree), paths(&again));
}

#[test]
fn errors_surface_through_every_entry_point() {
    assert!(matches!(
        render_with_options("", RenderOptions::classic()),
        Err(MindmapError::EmptyOutline)
    ));
    let response = handle_request(
        &MindmapRequest {
            code: "one\ntwo".to_string(),
            ..Default::default()
        },
        &Config::default(),
    );
    assert_eq!(response.status, 400);
}
