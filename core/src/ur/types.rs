use thiserror::Error;

use crate::fountain::{FountainError, FountainPart};

/// One parsed fountain frame string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrFrame {
    /// Entire message in one frame.
    Single { ur_type: String, message: Vec<u8> },
    /// One fountain part.
    Part { ur_type: String, part: FountainPart },
}

impl UrFrame {
    pub fn ur_type(&self) -> &str {
        match self {
            UrFrame::Single { ur_type, .. } | UrFrame::Part { ur_type, .. } => ur_type,
        }
    }
}

/// Effect of one frame on a [`crate::ur::UrDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrOutcome {
    Progress,
    Redundant,
    Duplicate,
    Restarted,
    Complete,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrError {
    #[error("not a ur: frame")]
    MissingScheme,

    #[error("invalid ur type: {0}")]
    InvalidType(String),

    #[error("unexpected ur type {found}, transfer is {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("malformed ur path: {0}")]
    InvalidPath(String),

    #[error("invalid bytewords: {0}")]
    Bytewords(String),

    #[error("invalid cbor: {0}")]
    Cbor(String),

    #[error("sequence header {path} disagrees with part body {body}")]
    SequenceMismatch { path: String, body: String },

    #[error(transparent)]
    Fountain(#[from] FountainError),
}

impl UrError {
    /// Fatal for the transfer, as opposed to a frame that is simply dropped.
    pub fn is_checksum_failure(&self) -> bool {
        matches!(self, UrError::Fountain(FountainError::ChecksumMismatch { .. }))
    }
}
