//! airgap-qr-core
//!
//! Pure Rust payload transport over a one-way sequence of QR codes.
//! No camera, no rasteriser, no network.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;
pub mod telemetry;

// Codecs
pub mod fountain;
pub mod ur;
pub mod segmented;
pub mod seed;
pub mod descriptor;

// Decoding
pub mod detect;
pub mod session;

// Encoding
pub mod orchestrator;
pub mod render;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{CodecConfig, Density, RenderOptions};
    pub use crate::detect::{Convention, ScannedFrame};
    pub use crate::orchestrator::{encode_frames, EncodedFrames, PayloadKind, TargetConvention};
    pub use crate::render::{render_frames, QrRenderer};
    pub use crate::seed::{decode_seed_frame, SeedPhrase};
    pub use crate::session::{
        DescriptorScanSession, FrameOutcome, PayloadScanSession, ScanProgress, SessionError, SessionState,
    };
    pub use crate::types::QrError;
}
