use thiserror::Error;

use crate::constants::ur_types;
use crate::segmented::FileType;

/// Convention the caller wants to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetConvention {
    Simple,
    /// `ur:crypto-psbt`.
    FountainLegacy,
    /// `ur:psbt`.
    FountainModern,
    /// `ur:<ur_type>` carrying a byte string.
    Fountain { ur_type: String },
    Segmented,
    Single,
}

impl TargetConvention {
    /// `ur:` type for fountain targets.
    pub fn ur_type(&self) -> Option<&str> {
        match self {
            TargetConvention::FountainLegacy => Some(ur_types::CRYPTO_PSBT),
            TargetConvention::FountainModern => Some(ur_types::PSBT),
            TargetConvention::Fountain { ur_type } => Some(ur_type),
            _ => None,
        }
    }

    #[inline]
    pub fn is_fountain(&self) -> bool {
        self.ur_type().is_some()
    }
}

/// What the payload bytes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadKind {
    Psbt,
    Transaction,
    Json,
    Text,
    Cbor,
    #[default]
    Binary,
}

impl PayloadKind {
    pub fn file_type(self) -> FileType {
        match self {
            PayloadKind::Psbt => FileType::Psbt,
            PayloadKind::Transaction => FileType::Transaction,
            PayloadKind::Json => FileType::Json,
            PayloadKind::Text => FileType::Unicode,
            PayloadKind::Cbor => FileType::Cbor,
            PayloadKind::Binary => FileType::Binary,
        }
    }
}

/// A finite frame set ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrames {
    /// Convention actually used.
    pub convention: TargetConvention,
    pub frames: Vec<String>,
    /// The encoder reported that one frame carries everything.
    pub single_part: bool,
    /// Frames hold one byte per character and go through `render_bytes`.
    pub binary: bool,
    /// The requested fountain convention failed and segmented frames were produced.
    pub fell_back: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{convention:?} cannot carry this payload: {reason}")]
    Infeasible { convention: TargetConvention, reason: String },

    #[error("no convention could encode the payload: {}", attempts.join("; "))]
    NoConventionSucceeded { attempts: Vec<String> },
}
