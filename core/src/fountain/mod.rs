//! fountain/mod.rs
//! Rateless fountain coding of one message into an unbounded part stream.
//!
//! Responsibilities:
//! - Split a message into `seq_len` equal fragments (last one zero-padded)
//! - Emit pure parts `1..=seq_len`, then seeded XOR mixes forever
//! - Solve received parts incrementally over GF(2) and verify the CRC-32
//!
//! Non-responsibilities:
//! - Text framing (see `ur`)
//! - Convention detection
//! - Session bookkeeping

pub mod types;
pub mod xoshiro;
pub mod sampler;
pub mod fragments;
pub mod encode;
pub mod decode;

pub use types::{FountainPart, FountainError, PartOutcome};
pub use fragments::{FragmentSet, fragment_length, choose_fragments};
pub use encode::FountainEncoder;
pub use decode::{FountainDecoder, decode_parts};
