use crate::error::MindmapError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;

static DATA_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+)?;base64,").unwrap());

/// Raster image embedded under the root node, kept as base64 so it can be
/// written straight into a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime: String,
    pub data: String,
}

impl EmbeddedImage {
    /// Accepts bare base64 or a `data:<mime>;base64,` URL. The payload is
    /// decoded to validate it and to sniff the mime type when none is given.
    pub fn from_base64(input: &str) -> Result<Self, MindmapError> {
        let trimmed = input.trim();
        let (declared, payload) = match DATA_URL_RE.captures(trimmed) {
            Some(caps) => {
                let prefix_len = caps.get(0).map(|m| m.end()).unwrap_or(0);
                (
                    caps.name("mime").map(|m| m.as_str().to_string()),
                    &trimmed[prefix_len..],
                )
            }
            None => (None, trimmed),
        };
        let compact: String = payload.chars().filter(|ch| !ch.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(MindmapError::InvalidImage("image payload is empty".to_string()));
        }
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| MindmapError::InvalidImage(err.to_string()))?;
        let mime = declared.unwrap_or_else(|| sniff_mime(&bytes).to_string());
        if !mime.starts_with("image/") {
            return Err(MindmapError::InvalidImage(format!(
                "`{mime}` is not an image type"
            )));
        }
        Ok(Self {
            mime,
            data: compact,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MindmapError> {
        if bytes.is_empty() {
            return Err(MindmapError::InvalidImage("image file is empty".to_string()));
        }
        Ok(Self {
            mime: sniff_mime(bytes).to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    pub fn href(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "image/png"
    }
}
