use crate::error::MindmapError;
use crate::theme::{Rgb, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JitterConfig {
    pub enabled: bool,
    /// Fixed seed for reproducible output; a fresh one is drawn when unset.
    pub seed: Option<u64>,
    /// Fraction of a node's width it may move horizontally.
    pub horizontal_ratio: f32,
    /// Fraction of a node's height it may move vertically.
    pub vertical_ratio: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: None,
            horizontal_ratio: 0.035,
            vertical_ratio: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub font_size: f32,
    pub branch_font_size: f32,
    pub root_font_size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub root_min_diameter: f32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub canvas_padding: f32,
    pub margin: f32,
    /// Nodes this deep or deeper are drawn as underlined labels.
    pub label_only_depth: usize,
    pub corner_radius: f32,
    pub root_border_width: f32,
    pub branch_border_width: f32,
    pub connector_width: f32,
    pub underline_width: f32,
    pub broad_char: bool,
    pub jitter: JitterConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            branch_font_size: 18.0,
            root_font_size: 24.0,
            padding_x: 12.0,
            padding_y: 8.0,
            root_min_diameter: 70.0,
            gap_x: 50.0,
            gap_y: 16.0,
            canvas_padding: 40.0,
            margin: 20.0,
            label_only_depth: 4,
            corner_radius: 8.0,
            root_border_width: 3.0,
            branch_border_width: 2.5,
            connector_width: 2.0,
            underline_width: 2.0,
            broad_char: false,
            jitter: JitterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    branch_colors: Option<Vec<String>>,
    root_fill: Option<String>,
    root_border: Option<String>,
    root_text: Option<String>,
    branch_text: Option<String>,
    text_color: Option<String>,
    fill_lighten_base: Option<f32>,
    fill_lighten_step: Option<f32>,
    border_lighten_step: Option<f32>,
    max_lighten: Option<f32>,
    label_backdrop: Option<String>,
    label_backdrop_opacity: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    font_size: Option<NumberOrString>,
    branch_font_size: Option<NumberOrString>,
    root_font_size: Option<NumberOrString>,
    padding_x: Option<f32>,
    padding_y: Option<f32>,
    root_min_diameter: Option<f32>,
    gap_x: Option<f32>,
    gap_y: Option<f32>,
    canvas_padding: Option<f32>,
    margin: Option<f32>,
    label_only_depth: Option<usize>,
    corner_radius: Option<f32>,
    root_border_width: Option<f32>,
    branch_border_width: Option<f32>,
    connector_width: Option<f32>,
    underline_width: Option<f32>,
    broad_char: Option<bool>,
    jitter: Option<JitterConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JitterConfigFile {
    enabled: Option<bool>,
    seed: Option<u64>,
    horizontal_ratio: Option<f32>,
    vertical_ratio: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON (or JSON5) config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => {
                return Err(MindmapError::Config(format!("unknown theme `{other}`")).into());
            }
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.branch_colors {
            theme.branch_colors = v;
        }
        if let Some(v) = vars.root_fill {
            theme.root_fill = v;
        }
        if let Some(v) = vars.root_border {
            theme.root_border = v;
        }
        if let Some(v) = vars.root_text {
            theme.root_text = v;
        }
        if let Some(v) = vars.branch_text {
            theme.branch_text = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.fill_lighten_base {
            theme.fill_lighten_base = v;
        }
        if let Some(v) = vars.fill_lighten_step {
            theme.fill_lighten_step = v;
        }
        if let Some(v) = vars.border_lighten_step {
            theme.border_lighten_step = v;
        }
        if let Some(v) = vars.max_lighten {
            theme.max_lighten = v;
        }
        if let Some(v) = vars.label_backdrop {
            theme.label_backdrop = v;
        }
        if let Some(v) = vars.label_backdrop_opacity {
            theme.label_backdrop_opacity = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let cfg = &mut config.layout;
        if let Some(v) = layout.font_size.as_ref().and_then(NumberOrString::as_f32) {
            cfg.font_size = v;
        }
        if let Some(v) = layout.branch_font_size.as_ref().and_then(NumberOrString::as_f32) {
            cfg.branch_font_size = v;
        }
        if let Some(v) = layout.root_font_size.as_ref().and_then(NumberOrString::as_f32) {
            cfg.root_font_size = v;
        }
        if let Some(v) = layout.padding_x {
            cfg.padding_x = v;
        }
        if let Some(v) = layout.padding_y {
            cfg.padding_y = v;
        }
        if let Some(v) = layout.root_min_diameter {
            cfg.root_min_diameter = v;
        }
        if let Some(v) = layout.gap_x {
            cfg.gap_x = v;
        }
        if let Some(v) = layout.gap_y {
            cfg.gap_y = v;
        }
        if let Some(v) = layout.canvas_padding {
            cfg.canvas_padding = v;
        }
        if let Some(v) = layout.margin {
            cfg.margin = v;
        }
        if let Some(v) = layout.label_only_depth {
            cfg.label_only_depth = v;
        }
        if let Some(v) = layout.corner_radius {
            cfg.corner_radius = v;
        }
        if let Some(v) = layout.root_border_width {
            cfg.root_border_width = v;
        }
        if let Some(v) = layout.branch_border_width {
            cfg.branch_border_width = v;
        }
        if let Some(v) = layout.connector_width {
            cfg.connector_width = v;
        }
        if let Some(v) = layout.underline_width {
            cfg.underline_width = v;
        }
        if let Some(v) = layout.broad_char {
            cfg.broad_char = v;
        }
        if let Some(jitter) = layout.jitter {
            if let Some(v) = jitter.enabled {
                cfg.jitter.enabled = v;
            }
            if jitter.seed.is_some() {
                cfg.jitter.seed = jitter.seed;
            }
            if let Some(v) = jitter.horizontal_ratio {
                cfg.jitter.horizontal_ratio = v;
            }
            if let Some(v) = jitter.vertical_ratio {
                cfg.jitter.vertical_ratio = v;
            }
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    config.render.background = config.theme.background.clone();
    validate_theme(&config.theme)?;
    validate_layout(&config.layout)?;

    Ok(config)
}

/// Branch and root colors feed the lightening math, so they must be hex.
pub fn validate_theme(theme: &Theme) -> Result<(), MindmapError> {
    if theme.branch_colors.is_empty() {
        return Err(MindmapError::Config(
            "branchColors must contain at least one color".to_string(),
        ));
    }
    let named = [
        ("rootFill", &theme.root_fill),
        ("rootBorder", &theme.root_border),
    ];
    for color in theme
        .branch_colors
        .iter()
        .map(|c| ("branchColors", c))
        .chain(named)
    {
        if Rgb::parse_hex(color.1).is_none() {
            return Err(MindmapError::Config(format!(
                "{} entry `{}` is not a #rgb or #rrggbb color",
                color.0, color.1
            )));
        }
    }
    Ok(())
}

pub fn validate_layout(layout: &LayoutConfig) -> Result<(), MindmapError> {
    let sizes = [
        ("fontSize", layout.font_size),
        ("branchFontSize", layout.branch_font_size),
        ("rootFontSize", layout.root_font_size),
    ];
    for (name, value) in sizes {
        if !(value.is_finite() && value > 0.0) {
            return Err(MindmapError::Config(format!(
                "{name} must be a positive number, got {value}"
            )));
        }
    }
    if layout.label_only_depth < 2 {
        return Err(MindmapError::Config(
            "labelOnlyDepth must be at least 2".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.root_min_diameter, 70.0);
        assert_eq!(config.layout.label_only_depth, 4);
        assert!(!config.layout.jitter.enabled);
    }

    #[test]
    fn overrides_from_json5() {
        let config = parse_config(
            r##"{
                // comments are allowed
                theme: "modern",
                themeVariables: { branchColors: ["#112233", "#abc"] },
                layout: { fontSize: "14px", gapX: 30, broadChar: true, jitter: { enabled: true, seed: 7 } },
                render: { width: 640 },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.root_fill, Theme::modern().root_fill);
        assert_eq!(config.theme.branch_colors, vec!["#112233", "#abc"]);
        assert_eq!(config.layout.font_size, 14.0);
        assert_eq!(config.layout.gap_x, 30.0);
        assert!(config.layout.broad_char);
        assert_eq!(config.layout.jitter.seed, Some(7));
        assert_eq!(config.render.width, 640.0);
    }

    #[test]
    fn rejects_non_hex_palette() {
        let err = parse_config(r#"{"themeVariables": {"branchColors": ["red"]}}"#).unwrap_err();
        assert!(err.to_string().contains("branchColors"));
    }

    #[test]
    fn rejects_empty_palette_and_unknown_theme() {
        assert!(parse_config(r#"{"themeVariables": {"branchColors": []}}"#).is_err());
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }

    #[test]
    fn rejects_non_positive_font_size() {
        assert!(parse_config(r#"{"layout": {"rootFontSize": 0}}"#).is_err());
    }
}
