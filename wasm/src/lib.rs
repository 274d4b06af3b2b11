use mindmap_rs_renderer::{EmbeddedImage, RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindmapRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    broad_char: Option<bool>,
    #[serde(rename = "base64image")]
    base64_image: Option<String>,
    jitter_seed: Option<u64>,
}

fn build_render_options(options: MindmapRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size.filter(|size| *size > 0.0) {
        render_options.layout.font_size = font_size;
    }
    render_options.layout.broad_char = options.broad_char.unwrap_or(false);
    if let Some(seed) = options.jitter_seed {
        render_options.layout.jitter.enabled = true;
        render_options.layout.jitter.seed = Some(seed);
    }
    if let Some(data) = options.base64_image.filter(|data| !data.trim().is_empty()) {
        render_options.image = Some(EmbeddedImage::from_base64(&data).map_err(|e| e.to_string())?);
    }

    Ok(render_options)
}

#[wasm_bindgen]
pub fn render_mindmap_svg(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<MindmapRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        MindmapRenderOptions::default()
    };

    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    render_with_options(code, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
