//! Request/response envelope for serving mindmaps over any transport.
//!
//! A request carries the outline in `code`; `type == "image"` asks for the
//! bare SVG document, anything else for `{"svg": "..."}`. Failures are always
//! `{"error": "..."}`.

use crate::config::Config;
use crate::error::MindmapError;
use crate::image::EmbeddedImage;
use crate::layout::compute_layout;
use crate::parser::parse_outline;
use crate::render::render_svg;
use log::{error, warn};
use serde::{Deserialize, Deserializer, Serialize};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapRequest {
    pub code: String,
    #[serde(rename = "type", default)]
    pub response_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub broad_char: bool,
    #[serde(rename = "base64image", default)]
    pub base64_image: Option<String>,
}

impl MindmapRequest {
    pub fn wants_image(&self) -> bool {
        self.response_type.as_deref() == Some("image")
    }
}

#[derive(Debug, Serialize)]
struct SvgEnvelope<'a> {
    svg: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindmapResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

/// Form bodies send flags as strings, JSON bodies as booleans.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let flag: Option<Flag> = Option::deserialize(deserializer)?;
    Ok(match flag {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(text)) => matches!(text.trim(), "true" | "1" | "on" | "yes"),
        None => false,
    })
}

/// Renders the SVG document for one request.
pub fn render_request(request: &MindmapRequest, config: &Config) -> Result<String, MindmapError> {
    let mut layout_config = config.layout.clone();
    layout_config.broad_char |= request.broad_char;
    let image = match request.base64_image.as_deref() {
        Some(data) if !data.trim().is_empty() => Some(EmbeddedImage::from_base64(data)?),
        _ => None,
    };

    let tree = parse_outline(&request.code)?;
    let layout = compute_layout(tree, &config.theme, &layout_config);
    Ok(render_svg(
        &layout,
        &config.theme,
        &layout_config,
        image.as_ref(),
    ))
}

pub fn handle_request(request: &MindmapRequest, config: &Config) -> MindmapResponse {
    let svg = match render_request(request, config) {
        Ok(svg) => svg,
        Err(err) => return error_response(&err),
    };
    if request.wants_image() {
        return MindmapResponse {
            status: 200,
            content_type: SVG_CONTENT_TYPE,
            body: svg,
        };
    }
    match serde_json::to_string(&SvgEnvelope { svg: &svg }) {
        Ok(body) => MindmapResponse {
            status: 200,
            content_type: JSON_CONTENT_TYPE,
            body,
        },
        Err(err) => error_response(&MindmapError::Render(err.to_string())),
    }
}

/// Decodes a JSON request body and handles it.
pub fn handle_json(body: &str, config: &Config) -> MindmapResponse {
    match serde_json::from_str::<MindmapRequest>(body) {
        Ok(request) => handle_request(&request, config),
        Err(err) => {
            warn!("rejecting malformed request body: {err}");
            json_error(400, &format!("invalid request: {err}"))
        }
    }
}

pub fn error_response(err: &MindmapError) -> MindmapResponse {
    if err.is_client_error() {
        warn!("rejecting request: {err}");
        json_error(400, &err.to_string())
    } else {
        error!("Error generating SVG: {err}");
        json_error(500, "Failed to generate SVG")
    }
}

fn json_error(status: u16, message: &str) -> MindmapResponse {
    let body = serde_json::to_string(&ErrorEnvelope { error: message })
        .unwrap_or_else(|_| "{\"error\":\"Failed to generate SVG\"}".to_string());
    MindmapResponse {
        status,
        content_type: JSON_CONTENT_TYPE,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn request(code: &str) -> MindmapRequest {
        MindmapRequest {
            code: code.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_response_is_json_envelope() {
        let response = handle_request(&request("top\n child"), &Config::default());
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, JSON_CONTENT_TYPE);
        let value: Value = serde_json::from_str(&response.body).unwrap();
        assert!(value["svg"].as_str().unwrap().starts_with("<svg"));
    }

    #[test]
    fn image_type_returns_raw_svg() {
        let mut req = request("top\n child");
        req.response_type = Some("image".to_string());
        let response = handle_request(&req, &Config::default());
        assert_eq!(response.content_type, SVG_CONTENT_TYPE);
        assert!(response.body.starts_with("<svg"));
    }

    #[test]
    fn malformed_outline_is_a_client_error() {
        let response = handle_request(&request("a\nb"), &Config::default());
        assert_eq!(response.status, 400);
        let value: Value = serde_json::from_str(&response.body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("second top-level"));
    }

    #[test]
    fn bad_image_is_rejected() {
        let mut req = request("top");
        req.base64_image = Some("%%%".to_string());
        let response = handle_request(&req, &Config::default());
        assert_eq!(response.status, 400);
    }

    #[test]
    fn decodes_camel_case_body_with_string_flag() {
        let body = r#"{"code": "中心\n 枝", "type": "image", "broadChar": "true"}"#;
        let req: MindmapRequest = serde_json::from_str(body).unwrap();
        assert!(req.broad_char);
        assert!(req.wants_image());
        assert_eq!(req.base64_image, None);

        let narrow: MindmapRequest =
            serde_json::from_str(r#"{"code": "x", "broadChar": false}"#).unwrap();
        assert!(!narrow.broad_char);
    }

    #[test]
    fn broad_char_widens_wide_labels() {
        let config = Config::default();
        let narrow = render_request(&request("中心\n 枝葉"), &config).unwrap();
        let mut wide_req = request("中心\n 枝葉");
        wide_req.broad_char = true;
        let wide = render_request(&wide_req, &config).unwrap();
        assert_ne!(narrow, wide);
    }

    #[test]
    fn missing_code_is_reported() {
        let response = handle_json(r#"{"type": "image"}"#, &Config::default());
        assert_eq!(response.status, 400);
        assert!(response.body.contains("\"error\""));
    }
}
