//! types.rs
//! Crate-wide error covering every layer.

use thiserror::Error;

use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::fountain::FountainError;
use crate::orchestrator::EncodeError;
use crate::render::RenderError;
use crate::seed::SeedError;
use crate::segmented::SegmentError;
use crate::session::SessionError;
use crate::ur::UrError;

/// Unified error so `?` works across codec, session and render layers.
/// Messages are stable and carry no payload or seed material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QrError {
    #[error("fountain error: {0}")]
    Fountain(#[from] FountainError),

    #[error("ur error: {0}")]
    Ur(#[from] UrError),

    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("seed error: {0}")]
    Seed(#[from] SeedError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl QrError {
    /// The transfer failed its integrity check and must be scanned again.
    pub fn is_checksum_failure(&self) -> bool {
        match self {
            QrError::Fountain(FountainError::ChecksumMismatch { .. }) => true,
            QrError::Ur(e) => e.is_checksum_failure(),
            QrError::Session(SessionError::ChecksumFailure { .. }) => true,
            QrError::Seed(SeedError::Checksum) => true,
            _ => false,
        }
    }
}
