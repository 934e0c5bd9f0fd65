//! telemetry/snapshot.rs
//! Immutable view of a session's counters.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::ScanCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub counters: ScanCounters,
    /// Progress of the running transfer, `0..=100`.
    pub percent: u8,
    /// Accepted frames over seen frames, `0.0` before the first frame.
    pub acceptance_ratio: f64,
}

impl ScanSnapshot {
    pub fn from(counters: &ScanCounters, percent: u8) -> Self {
        let acceptance_ratio = if counters.frames_seen > 0 {
            counters.frames_accepted as f64 / counters.frames_seen as f64
        } else {
            0.0
        };
        Self { counters: counters.clone(), percent: percent.min(100), acceptance_ratio }
    }

    /// Invariants every snapshot satisfies.
    pub fn sanity_check(&self) -> bool {
        let c = &self.counters;
        let classified = c.frames_accepted + c.frames_duplicate + c.frames_redundant + c.frames_discarded + c.failures;
        classified == c.frames_seen && self.acceptance_ratio <= 1.0 && self.percent <= 100
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
