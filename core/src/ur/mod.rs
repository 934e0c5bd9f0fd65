//! ur/mod.rs
//! Text framing for fountain parts (`ur:<type>/...`).
//!
//! Responsibilities:
//! - Bytewords (minimal form) with trailing CRC-32
//! - CBOR part bodies and byte-string message wrapping
//! - Single-part and multi-part frame strings
//!
//! Non-responsibilities:
//! - The fountain math itself (see `fountain`)
//! - Interpreting the reconstructed message

pub mod types;
pub mod bytewords;
pub mod cbor;
pub mod encode;
pub mod decode;

pub use types::{UrError, UrFrame, UrOutcome};
pub use encode::UrEncoder;
pub use decode::{UrDecoder, parse_ur};
