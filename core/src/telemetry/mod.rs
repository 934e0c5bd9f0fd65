//! telemetry/mod.rs
//! Scan counters and immutable snapshots.
//!
//! Counters are plain integers owned by one session; snapshots are the
//! serialisable view handed to callers and logs.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
