//! render/mod.rs
//! Parallel fan-out of frame strings to an external QR rasteriser.
//!
//! Responsibilities:
//! - Define the renderer seam ([`QrRenderer`])
//! - Render frames on a bounded worker pool
//! - Return images in original frame order
//!
//! Non-responsibilities:
//! - QR symbol encoding or raster formats (the renderer owns both)

pub mod types;
pub mod pool;

pub use types::{QrRenderer, RenderError};
pub use pool::{render_frames, render_strings};
