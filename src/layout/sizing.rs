use crate::config::LayoutConfig;
use crate::ir::Tree;
use crate::text_metrics::measure_text_width;
use crate::theme::{Theme, node_style};

/// Box of a regular node: measured label plus padding on every side.
pub fn node_size(text: &str, font_size: f32, config: &LayoutConfig) -> (f32, f32) {
    let label_width = measure_text_width(text, font_size, config.broad_char);
    (
        label_width + config.padding_x * 2.0,
        font_size + config.padding_y * 2.0,
    )
}

/// The root is a circle: the padded label box grows to a square no smaller
/// than the configured diameter floor.
pub fn root_size(text: &str, font_size: f32, config: &LayoutConfig) -> (f32, f32) {
    let (width, height) = node_size(text, font_size, config);
    let diameter = width.max(height).max(config.root_min_diameter);
    (diameter, diameter)
}

pub(super) fn size_nodes(tree: &mut Tree, theme: &Theme, config: &LayoutConfig) {
    for node in &mut tree.nodes {
        node.style = node_style(&node.path, theme, config);
        let font_size = node.style.font_size;
        let (width, height) = if node.is_root() {
            root_size(&node.text, font_size, config)
        } else {
            node_size(&node.text, font_size, config)
        };
        node.width = width;
        node.height = height;
        node.label_width = measure_text_width(&node.text, font_size, config.broad_char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_chars_double_in_broad_mode() {
        let mut config = LayoutConfig {
            broad_char: true,
            ..Default::default()
        };
        let fs = 16.0;
        let (width, height) = node_size("日本語", fs, &config);
        assert_eq!(width, 3.0 * 2.0 * fs + 2.0 * config.padding_x);
        assert_eq!(height, fs + 2.0 * config.padding_y);

        config.broad_char = false;
        let (width, _) = node_size("日本語", fs, &config);
        assert_eq!(width, 3.0 * fs + 2.0 * config.padding_x);
    }

    #[test]
    fn short_root_hits_diameter_floor() {
        let config = LayoutConfig::default();
        let (width, height) = root_size("A", config.root_font_size, &config);
        assert_eq!(width, height);
        assert_eq!(width, config.root_min_diameter);
    }

    #[test]
    fn long_root_grows_past_floor() {
        let config = LayoutConfig::default();
        let (width, height) = root_size("A long central topic", config.root_font_size, &config);
        assert_eq!(width, height);
        assert!(width > config.root_min_diameter);
    }
}
