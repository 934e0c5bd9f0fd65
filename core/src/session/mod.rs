//! session/mod.rs
//! Scanning session state machines.
//!
//! Responsibilities:
//! - Own exactly one in-flight reconstruction
//! - Lock the convention on the first frame and route every later frame to it
//! - Absorb malformed, duplicate and restarting frames; surface checksum failures
//! - Expose progress, completion and the final payload
//!
//! Non-responsibilities:
//! - Concurrency (callers serialise frame delivery)
//! - Timeouts (an incomplete transfer simply stays below 100%)

pub mod types;
pub mod engine;
pub mod payload;
pub mod descriptor;

pub use types::{FrameOutcome, ScanProgress, SessionError, SessionState};
pub use engine::{DecodeSession, Reconstruct};
pub use payload::{PayloadReader, PayloadScanSession};
pub use descriptor::{DescriptorReader, DescriptorScanSession};
