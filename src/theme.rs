use crate::config::LayoutConfig;
use crate::ir::{NodePath, NodeStyle};
use log::warn;
use serde::{Deserialize, Serialize};

const CLASSIC_BRANCH_COLORS: [&str; 8] = [
    "#E74C3C", "#3498DB", "#2ECC71", "#F39C12", "#9B59B6", "#1ABC9C", "#E67E22", "#34495E",
];

const MODERN_BRANCH_COLORS: [&str; 8] = [
    "#5B8DEF", "#F2994A", "#27AE60", "#EB5757", "#9B51E0", "#2D9CDB", "#F2C94C", "#6FCF97",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub branch_colors: Vec<String>,
    pub root_fill: String,
    pub root_border: String,
    pub root_text: String,
    pub branch_text: String,
    pub text_color: String,
    /// Lightening applied to the fill of a depth-3 node.
    pub fill_lighten_base: f32,
    /// Extra lightening per level past depth 3.
    pub fill_lighten_step: f32,
    /// Border lightening per level past depth 2.
    pub border_lighten_step: f32,
    pub max_lighten: f32,
    pub label_backdrop: String,
    pub label_backdrop_opacity: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"Hiragino Sans\", \"Noto Sans JP\", sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            branch_colors: CLASSIC_BRANCH_COLORS.iter().map(|c| c.to_string()).collect(),
            root_fill: "#2C3E50".to_string(),
            root_border: "#1B2631".to_string(),
            root_text: "#FFFFFF".to_string(),
            branch_text: "#FFFFFF".to_string(),
            text_color: "#333333".to_string(),
            fill_lighten_base: 0.6,
            fill_lighten_step: 0.15,
            border_lighten_step: 0.2,
            max_lighten: 0.9,
            label_backdrop: "#000000".to_string(),
            label_backdrop_opacity: 0.45,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            branch_colors: MODERN_BRANCH_COLORS.iter().map(|c| c.to_string()).collect(),
            root_fill: "#1C2430".to_string(),
            root_border: "#1C2430".to_string(),
            root_text: "#FFFFFF".to_string(),
            branch_text: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            fill_lighten_base: 0.7,
            fill_lighten_step: 0.1,
            border_lighten_step: 0.15,
            max_lighten: 0.92,
            label_backdrop: "#1C2430".to_string(),
            label_backdrop_opacity: 0.5,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (idx, ch) in hex.chars().enumerate() {
                    let digit = ch.to_digit(16)? as u8;
                    channels[idx] = digit * 17;
                }
                Some(Self {
                    r: channels[0],
                    g: channels[1],
                    b: channels[2],
                })
            }
            6 => Some(Self {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            _ => None,
        }
    }

    /// Moves each channel `amount` (0..=1) of the way towards white.
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| -> u8 {
            let c = c as f32;
            (c + (255.0 - c) * amount).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Lightens a hex color. Colors that are not hex (named colors, `hsl(...)`)
/// are returned unchanged.
pub fn lighten_color(color: &str, amount: f32) -> String {
    match Rgb::parse_hex(color) {
        Some(rgb) => rgb.lighten(amount).to_hex(),
        None => {
            warn!("cannot lighten non-hex color `{color}`");
            color.to_string()
        }
    }
}

fn pick_palette_color(values: &[String], idx: usize) -> Option<&str> {
    if values.is_empty() {
        return None;
    }
    Some(values[idx % values.len()].as_str())
}

/// Style of the node at `path`: branch color chosen by the depth-2 index,
/// lightened a little more on every level below the branch.
pub fn node_style(path: &NodePath, theme: &Theme, config: &LayoutConfig) -> NodeStyle {
    let depth = path.depth();
    let Some(branch) = path.branch_index() else {
        return NodeStyle {
            font_size: config.root_font_size,
            text_color: theme.root_text.clone(),
            background_color: theme.root_fill.clone(),
            border_color: theme.root_border.clone(),
            border_width: config.root_border_width,
        };
    };

    let base = pick_palette_color(&theme.branch_colors, branch).unwrap_or(&theme.root_border);
    let level = depth.saturating_sub(2) as f32;
    if depth == 2 {
        return NodeStyle {
            font_size: config.branch_font_size,
            text_color: theme.branch_text.clone(),
            background_color: base.to_string(),
            border_color: base.to_string(),
            border_width: config.branch_border_width,
        };
    }

    let fill_amount =
        (theme.fill_lighten_base + theme.fill_lighten_step * (level - 1.0)).min(theme.max_lighten);
    let border_amount = (theme.border_lighten_step * level).min(theme.max_lighten);
    NodeStyle {
        font_size: config.font_size,
        text_color: theme.text_color.clone(),
        background_color: lighten_color(base, fill_amount),
        border_color: lighten_color(base, border_amount),
        border_width: (config.branch_border_width - 0.5 * level).max(1.0),
    }
}
