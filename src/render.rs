use crate::config::{LayoutConfig, RenderConfig};
use crate::image::EmbeddedImage;
use crate::ir::{Node, Side};
use crate::layout::Layout;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const ROOT_CLIP_ID: &str = "mindmap-root-clip";

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Horizontal center.
    pub x: f32,
    /// Vertical center.
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}

/// Abstract drawing operations; [`commands_to_svg`] turns them into markup.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        paint: Paint,
        label: Label,
        image: Option<String>,
    },
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        paint: Paint,
        label: Label,
    },
    UnderlinedLabel {
        x: f32,
        y: f32,
        width: f32,
        stroke: String,
        stroke_width: f32,
        label: Label,
    },
    Connector {
        start: (f32, f32),
        control1: (f32, f32),
        control2: (f32, f32),
        end: (f32, f32),
        color: String,
        width: f32,
    },
}

impl DrawCommand {
    pub fn is_shape(&self) -> bool {
        !matches!(self, DrawCommand::Connector { .. })
    }
}

/// Connectors first so node shapes paint over their ends, then one shape per
/// node in outline order.
pub fn build_commands(
    layout: &Layout,
    config: &LayoutConfig,
    image: Option<&EmbeddedImage>,
) -> Vec<DrawCommand> {
    let nodes = &layout.tree.nodes;
    let mut commands = Vec::with_capacity(nodes.len() * 2);

    for node in nodes {
        let (Some(parent_id), Some(side)) = (node.parent, node.side) else {
            continue;
        };
        let Some(parent) = nodes.get(parent_id) else {
            continue;
        };
        commands.push(connector(parent, node, side, config));
    }

    for node in nodes {
        commands.push(node_shape(node, config, image));
    }
    commands
}

fn connector(parent: &Node, child: &Node, side: Side, config: &LayoutConfig) -> DrawCommand {
    let (start_x, end_x) = match side {
        Side::Right => (parent.right(), child.x),
        Side::Left => (parent.x, child.right()),
    };
    let start = (start_x, parent.y);
    let end = (end_x, child.y);
    let dx = end.0 - start.0;
    DrawCommand::Connector {
        start,
        control1: (start.0 + dx / 3.0, start.1),
        control2: (start.0 + dx * 2.0 / 3.0, end.1),
        end,
        color: child.style.border_color.clone(),
        width: config.connector_width,
    }
}

fn node_shape(node: &Node, config: &LayoutConfig, image: Option<&EmbeddedImage>) -> DrawCommand {
    let style = &node.style;
    let label = Label {
        text: node.text.clone(),
        x: node.x + node.width / 2.0,
        y: node.y,
        width: node.label_width,
        font_size: style.font_size,
        color: style.text_color.clone(),
    };
    let paint = Paint {
        fill: style.background_color.clone(),
        stroke: style.border_color.clone(),
        stroke_width: style.border_width,
    };

    if node.is_root() {
        return DrawCommand::Circle {
            cx: node.x + node.width / 2.0,
            cy: node.y,
            r: node.width / 2.0,
            paint,
            label,
            image: image.map(EmbeddedImage::href),
        };
    }

    if node.depth() >= config.label_only_depth {
        return DrawCommand::UnderlinedLabel {
            x: node.x,
            y: node.y + style.font_size / 2.0 + config.padding_y / 2.0,
            width: node.width,
            stroke: style.border_color.clone(),
            stroke_width: config.underline_width,
            label: Label {
                color: style.border_color.clone(),
                ..label
            },
        };
    }

    DrawCommand::RoundedRect {
        x: node.x,
        y: node.top(),
        width: node.width,
        height: node.height,
        radius: config.corner_radius,
        paint,
        label,
    }
}

pub fn render_svg(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    image: Option<&EmbeddedImage>,
) -> String {
    let commands = build_commands(layout, config, image);
    commands_to_svg(&commands, layout.width, layout.height, theme)
}

pub fn commands_to_svg(commands: &[DrawCommand], width: f32, height: f32, theme: &Theme) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    for command in commands {
        if let DrawCommand::Circle {
            cx,
            cy,
            r,
            image: Some(_),
            ..
        } = command
        {
            svg.push_str(&format!(
                "<defs><clipPath id=\"{ROOT_CLIP_ID}\"><circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"/></clipPath></defs>"
            ));
        }
    }

    for command in commands {
        match command {
            DrawCommand::Connector {
                start,
                control1,
                control2,
                end,
                color,
                width,
            } => {
                svg.push_str(&format!(
                    "<path d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width:.2}\" stroke-linecap=\"round\"/>",
                    start.0,
                    start.1,
                    control1.0,
                    control1.1,
                    control2.0,
                    control2.1,
                    end.0,
                    end.1,
                    escape_xml(color)
                ));
            }
            DrawCommand::Circle {
                cx,
                cy,
                r,
                paint,
                label,
                image,
            } => {
                svg.push_str(&format!(
                    "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" {}/>",
                    paint_attrs(paint)
                ));
                if let Some(href) = image {
                    let size = r * 2.0;
                    svg.push_str(&format!(
                        "<image href=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{size:.2}\" height=\"{size:.2}\" preserveAspectRatio=\"xMidYMid slice\" clip-path=\"url(#{ROOT_CLIP_ID})\"/>",
                        escape_xml(href),
                        cx - r,
                        cy - r
                    ));
                    let backdrop_w = (label.width + label.font_size).min(size);
                    let backdrop_h = label.font_size * 1.6;
                    svg.push_str(&format!(
                        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{backdrop_w:.2}\" height=\"{backdrop_h:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" fill-opacity=\"{:.2}\"/>",
                        cx - backdrop_w / 2.0,
                        cy - backdrop_h / 2.0,
                        escape_xml(&theme.label_backdrop),
                        theme.label_backdrop_opacity
                    ));
                }
                svg.push_str(&label_svg(label, theme));
            }
            DrawCommand::RoundedRect {
                x,
                y,
                width,
                height,
                radius,
                paint,
                label,
            } => {
                svg.push_str(&format!(
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{radius:.2}\" ry=\"{radius:.2}\" {}/>",
                    paint_attrs(paint)
                ));
                svg.push_str(&label_svg(label, theme));
            }
            DrawCommand::UnderlinedLabel {
                x,
                y,
                width,
                stroke,
                stroke_width,
                label,
            } => {
                svg.push_str(&label_svg(label, theme));
                svg.push_str(&format!(
                    "<path d=\"M {x:.2} {y:.2} L {:.2} {y:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width:.2}\" stroke-linecap=\"round\"/>",
                    x + width,
                    escape_xml(stroke)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn paint_attrs(paint: &Paint) -> String {
    format!(
        "fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"",
        escape_xml(&paint.fill),
        escape_xml(&paint.stroke),
        paint.stroke_width
    )
}

fn label_svg(label: &Label, theme: &Theme) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        label.x,
        label.y,
        escape_xml(&theme.font_family),
        label.font_size,
        escape_xml(&label.color),
        escape_xml(&label.text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid default render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = crate::theme::Rgb::parse_hex(&render_cfg.background) {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
