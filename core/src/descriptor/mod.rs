//! descriptor/mod.rs
//! Output descriptor text from fountain-coded CBOR.
//!
//! Responsibilities:
//! - Parse `crypto-output` (308) and `output-descriptor` (40308) items
//! - Render key expressions with origin, Base58Check extended key and children
//! - Append the descriptor checksum
//!
//! Non-responsibilities:
//! - Key derivation or address computation
//! - Validating that keys are on the curve

pub mod types;
pub mod base58;
pub mod checksum;
pub mod decode;

pub use types::{DescriptorError, HdKey, KeyExpression, KeyPath, PathComponent, ScriptExpression};
pub use checksum::{add_checksum, descriptor_checksum, verify_checksum};
pub use decode::decode_output;
