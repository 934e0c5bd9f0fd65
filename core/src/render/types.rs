use thiserror::Error;

use crate::config::RenderOptions;
use crate::utils::latin1_string;

/// External QR rasteriser.
///
/// Implementations are shared by every worker thread, so they must be
/// `Sync`; images cross threads on the way back.
pub trait QrRenderer: Sync {
    type Image: Send;

    fn render_text(&self, text: &str, options: &RenderOptions) -> anyhow::Result<Self::Image>;

    /// Bytes go through a one-byte-per-character mapping so every value
    /// survives a text-oriented encoder.
    fn render_bytes(&self, bytes: &[u8], options: &RenderOptions) -> anyhow::Result<Self::Image> {
        self.render_text(&latin1_string(bytes), options)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("rendering frame {index} failed: {detail}")]
    Renderer { index: usize, detail: String },

    #[error("render pipeline: {0}")]
    Pipeline(String),
}
