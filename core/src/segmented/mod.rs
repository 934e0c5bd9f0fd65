//! segmented/mod.rs
//! Ordered chunking conventions without redundancy.
//!
//! Responsibilities:
//! - `Simple`: `p<part>/<total> <chunk>` text frames
//! - `BBQr`: `B$` frames with hex, Base32, deflate+Base32 or UTF-8 bodies
//! - Slot-based reassembly that needs every part exactly once
//!
//! Non-responsibilities:
//! - Convention detection
//! - Progress reporting to the caller (see `session`)

pub mod types;
pub mod compress;
pub mod assemble;
pub mod simple;
pub mod bbqr;

pub use types::{BbqrEncoding, BbqrHeader, Chunk, FileType, SegmentError};
pub use assemble::{ChunkAssembler, ChunkOutcome};
pub use bbqr::{BbqrAssembler, BbqrFrames};
