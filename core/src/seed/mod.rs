//! seed/mod.rs
//! Recovery phrase entropy as QR-able data.
//!
//! Responsibilities:
//! - Standard form: four decimal digits per word index
//! - Compact form: raw entropy bytes, checksum bits stripped and recomputed
//! - Locate a byte-mode segment header in raw symbol bytes
//!
//! Non-responsibilities:
//! - Seed derivation (no PBKDF2, no key material beyond word indices)
//! - Logging anything derived from the phrase

pub mod types;
pub mod bits;
pub mod encode;
pub mod decode;

pub use types::{SeedError, SeedPhrase};
pub use encode::{encode_compact, encode_standard};
pub use decode::{decode_compact, decode_seed_frame, decode_standard, extract_byte_mode_payload};
