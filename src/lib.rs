pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, JitterConfig, LayoutConfig, load_config};
pub use error::MindmapError;
pub use image::EmbeddedImage;
pub use layout::{Layout, compute_layout};
pub use parser::parse_outline;
pub use render::{DrawCommand, build_commands, render_svg};
pub use theme::Theme;

/// Everything one render needs besides the outline text.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub image: Option<EmbeddedImage>,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::default()
        }
    }

    pub fn with_broad_char(mut self, broad_char: bool) -> Self {
        self.layout.broad_char = broad_char;
        self
    }

    pub fn with_image(mut self, image: EmbeddedImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Parses, lays out and renders `code` to an SVG document.
pub fn render_with_options(code: &str, options: RenderOptions) -> Result<String, MindmapError> {
    let tree = parse_outline(code)?;
    let layout = compute_layout(tree, &options.theme, &options.layout);
    Ok(render_svg(
        &layout,
        &options.theme,
        &options.layout,
        options.image.as_ref(),
    ))
}
