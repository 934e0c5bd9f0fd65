//! orchestrator/mod.rs
//! Payload to a finite, displayable frame set.
//!
//! Responsibilities:
//! - Pick the encoder for a target convention and density
//! - Fall back from fountain to segmented frames when fountain encoding fails
//! - Report single vs multi frame from the encoder's own signal
//!
//! Non-responsibilities:
//! - Rendering (see `render`)
//! - Looping the display (callers keep an `UrEncoder` for that)

pub mod types;
pub mod encode;

pub use types::{EncodeError, EncodedFrames, PayloadKind, TargetConvention};
pub use encode::encode_frames;
