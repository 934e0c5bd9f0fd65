use thiserror::Error;

use crate::detect::Convention;

/// Lifecycle of a [`crate::session::DecodeSession`].
///
/// Detection is not a state of its own: the first frame is classified
/// inside `receive`, which leaves the session in `Accumulating` or
/// `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No frame yet.
    Idle,
    /// Convention locked, payload incomplete.
    Accumulating,
    /// Payload available.
    Complete,
}

/// What one frame did to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// New information was recorded.
    Accepted,
    /// Already seen; state unchanged.
    Duplicate,
    /// Parsed fine but carried nothing new.
    Redundant,
    /// Did not parse under the locked convention; dropped.
    Discarded,
    /// Declared a different transfer; the previous one was dropped first.
    Restarted,
    /// The payload is now available.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanProgress {
    /// `0..=100`; 100 only once the payload is available.
    pub percent: u8,
    /// Parts or fragments determined so far.
    pub received: usize,
    /// Parts or fragments the transfer needs, once known.
    pub expected: Option<usize>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The reassembled bytes do not match the transfer checksum. The session
    /// has been reset; scan again.
    #[error("checksum failure in {convention:?} transfer: {detail}")]
    ChecksumFailure { convention: Convention, detail: String },

    /// Reassembly finished but the content is not what this session reads.
    #[error("invalid {convention:?} payload: {detail}")]
    InvalidPayload { convention: Convention, detail: String },
}
