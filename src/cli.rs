use crate::config::{Config, load_config};
use crate::image::EmbeddedImage;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_outline;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mmsvg", version, about = "Render indented outlines as radial mindmap SVGs")]
pub struct Args {
    /// Input outline (.txt) or Markdown (.md) file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Measure non-ASCII characters at full width
    #[arg(long = "broad-char")]
    pub broad_char: bool,

    /// Image drawn inside the root circle (raw image file or base64 text)
    #[arg(long = "image")]
    pub image: Option<PathBuf>,

    /// Nudge node positions slightly for a hand-drawn look
    #[arg(long = "jitter")]
    pub jitter: bool,

    /// Seed for --jitter
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = load_config(args.config.as_deref())?;
    config.layout.broad_char |= args.broad_char;
    config.layout.jitter.enabled |= args.jitter;
    if args.seed.is_some() {
        config.layout.jitter.seed = args.seed;
    }
    let image = match args.image.as_deref() {
        Some(path) => Some(read_image(path)?),
        None => None,
    };

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let outlines = if is_markdown {
        extract_mindmap_blocks(&input)
    } else {
        vec![input]
    };
    if outlines.is_empty() {
        return Err(anyhow::anyhow!("No mindmap outlines found in input"));
    }

    if outlines.len() == 1 {
        let output = match args.output_format {
            OutputFormat::Png => Some(ensure_output(&args.output, "png")?),
            _ => args.output.clone(),
        };
        return render_one(
            &outlines[0],
            &config,
            image.as_ref(),
            args.output_format,
            output.as_deref(),
            args.dump_layout.as_deref(),
        );
    }

    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, outlines.len())?;
    info!("rendering {} mindmaps from markdown", outlines.len());
    for (idx, outline) in outlines.iter().enumerate() {
        let dump = args
            .dump_layout
            .as_deref()
            .map(|path| numbered_path(path, idx + 1, "json"));
        render_one(
            outline,
            &config,
            image.as_ref(),
            args.output_format,
            Some(&outputs[idx]),
            dump.as_deref(),
        )?;
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    let _ = env_logger::Builder::from_default_env()
        .filter_level(filter)
        .format_timestamp(None)
        .try_init();
}

fn render_one(
    outline: &str,
    config: &Config,
    image: Option<&EmbeddedImage>,
    format: OutputFormat,
    output: Option<&Path>,
    dump_layout: Option<&Path>,
) -> Result<()> {
    let tree = parse_outline(outline)?;
    let layout = compute_layout(tree, &config.theme, &config.layout);
    debug!(
        "layout has {} nodes on a {:.0}x{:.0} canvas",
        layout.tree.len(),
        layout.width,
        layout.height
    );
    if let Some(path) = dump_layout {
        write_layout_dump(path, &layout)
            .with_context(|| format!("writing layout dump to {}", path.display()))?;
    }
    let svg = render_svg(&layout, &config.theme, &config.layout, image);
    match format {
        OutputFormat::Svg => write_output_svg(&svg, output),
        OutputFormat::Json => {
            let body = serde_json::to_string(&serde_json::json!({ "svg": svg }))?;
            write_output_svg(&body, output)
        }
        OutputFormat::Png => {
            let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_output_png(&svg, output, &config.render)
        }
    }
}

fn read_image(path: &Path) -> Result<EmbeddedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
    if let Ok(text) = std::str::from_utf8(&bytes) {
        if let Ok(image) = EmbeddedImage::from_base64(text) {
            return Ok(image);
        }
    }
    Ok(EmbeddedImage::from_bytes(&bytes)?)
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    output
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Output path required for {ext} output"))
}

fn extract_mindmap_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut fence: Option<&str> = None;
    let mut current = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => fence = detect_mindmap_fence(trimmed),
            Some(open) if is_fence_end(trimmed, open) => {
                fence = None;
                blocks.push(current.join("\n"));
                current.clear();
            }
            // Outline indentation is significant, keep the raw line.
            Some(_) => current.push(line),
        }
    }

    blocks
}

fn detect_mindmap_fence(line: &str) -> Option<&'static str> {
    ["```", "~~~"].into_iter().find(|marker| {
        line.strip_prefix(marker)
            .map(|rest| rest.trim_start_matches(marker.as_bytes()[0] as char).trim())
            .is_some_and(|info| info.starts_with("mindmap"))
    })
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.trim().is_empty())
}

fn numbered_path(base: &Path, index: usize, ext: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("mindmap");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}-{index}.{ext}"))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((1..=count)
            .map(|idx| base.join(format!("mindmap-{idx}.{ext}")))
            .collect());
    }
    Ok((1..=count).map(|idx| numbered_path(base, idx, ext)).collect())
}
