use thiserror::Error;

#[derive(Debug, Error)]
pub enum MindmapError {
    #[error("outline is empty")]
    EmptyOutline,

    #[error("line {line}: indent {indent} does not line up with any open parent level")]
    MissingParent { line: usize, indent: usize },

    #[error("line {line}: `{text}` is a second top-level node, an outline has exactly one root")]
    SecondRoot { line: usize, text: String },

    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to generate SVG: {0}")]
    Render(String),
}

impl MindmapError {
    /// Whether the caller's input is at fault rather than the renderer.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyOutline
                | Self::MissingParent { .. }
                | Self::SecondRoot { .. }
                | Self::InvalidImage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MindmapError>;
