//! telemetry/counters.rs
//! Mutable counters kept by one scanning session.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::session::FrameOutcome;

/// Deterministic counters collected while frames are fed to a session.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounters {
    pub frames_seen: u64,
    pub frames_accepted: u64,
    pub frames_duplicate: u64,
    pub frames_redundant: u64,
    pub frames_discarded: u64,
    pub restarts: u64,
    pub completions: u64,
    pub failures: u64,
}

impl ScanCounters {
    /// Record one frame and what it did.
    pub fn record(&mut self, outcome: FrameOutcome) {
        self.frames_seen += 1;
        match outcome {
            FrameOutcome::Accepted => self.frames_accepted += 1,
            FrameOutcome::Duplicate => self.frames_duplicate += 1,
            FrameOutcome::Redundant => self.frames_redundant += 1,
            FrameOutcome::Discarded => self.frames_discarded += 1,
            FrameOutcome::Restarted => {
                self.restarts += 1;
                self.frames_accepted += 1;
            }
            FrameOutcome::Completed => {
                self.completions += 1;
                self.frames_accepted += 1;
            }
        }
    }

    /// A frame that ended the transfer with a checksum failure.
    pub fn record_failure(&mut self) {
        self.frames_seen += 1;
        self.failures += 1;
    }

    pub fn merge(&mut self, other: &ScanCounters) {
        self.frames_seen += other.frames_seen;
        self.frames_accepted += other.frames_accepted;
        self.frames_duplicate += other.frames_duplicate;
        self.frames_redundant += other.frames_redundant;
        self.frames_discarded += other.frames_discarded;
        self.restarts += other.restarts;
        self.completions += other.completions;
        self.failures += other.failures;
    }
}

impl AddAssign for ScanCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_merge() {
        let mut a = ScanCounters::default();
        a.record(FrameOutcome::Accepted);
        a.record(FrameOutcome::Discarded);
        a.record(FrameOutcome::Restarted);

        let mut b = ScanCounters::default();
        b.record(FrameOutcome::Completed);
        b.record_failure();

        a += b;
        assert_eq!(a.frames_seen, 5);
        assert_eq!(a.frames_accepted, 3);
        assert_eq!(a.restarts, 1);
        assert_eq!(a.completions, 1);
        assert_eq!(a.failures, 1);
    }
}
