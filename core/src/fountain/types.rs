use bytes::Bytes;
use thiserror::Error;

/// One fountain transmission unit.
///
/// `seq_num <= seq_len` carries fragment `seq_num - 1` unmixed; any later
/// sequence number carries the XOR of a seeded subset of fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FountainPart {
    pub seq_num: u32,
    pub seq_len: u32,
    pub message_len: u32,
    pub checksum: u32,
    pub data: Bytes,
}

impl FountainPart {
    /// Structural sanity of a decoded header.
    pub fn validate(&self) -> Result<(), FountainError> {
        if self.seq_num == 0 {
            return Err(FountainError::InvalidPart("sequence number is zero".into()));
        }
        if self.seq_len == 0 || self.seq_len > u16::MAX as u32 {
            return Err(FountainError::InvalidPart(format!(
                "fragment count {} out of range", self.seq_len
            )));
        }
        if self.message_len == 0 || self.data.is_empty() {
            return Err(FountainError::InvalidPart("empty message or fragment".into()));
        }
        let capacity = self.seq_len as u64 * self.data.len() as u64;
        if (self.message_len as u64) > capacity {
            return Err(FountainError::InvalidPart(format!(
                "message length {} exceeds {} fragments of {} bytes",
                self.message_len, self.seq_len, self.data.len()
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn is_pure(&self) -> bool {
        self.seq_num <= self.seq_len
    }

    /// Everything that identifies the transfer this part belongs to.
    pub fn shape(&self) -> TransferShape {
        TransferShape {
            seq_len: self.seq_len,
            message_len: self.message_len,
            checksum: self.checksum,
            fragment_len: self.data.len(),
        }
    }
}

/// Header fields every part of one transfer agrees on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferShape {
    pub seq_len: u32,
    pub message_len: u32,
    pub checksum: u32,
    pub fragment_len: usize,
}

/// What a single part did to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOutcome {
    /// At least one new equation was added.
    Progress,
    /// Reduced to nothing: every index was already determined.
    Redundant,
    /// Exact sequence number already seen.
    Duplicate,
    /// Header disagreed with the running transfer; the decoder started over.
    Restarted,
    /// The message is now available.
    Complete,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FountainError {
    #[error("cannot fountain-encode an empty message")]
    EmptyMessage,

    #[error("invalid fragment limits: min {min} > max {max}")]
    InvalidLimits { min: usize, max: usize },

    #[error("message needs {count} fragments, more than the 65535 supported")]
    TooManyFragments { count: usize },

    #[error("invalid part: {0}")]
    InvalidPart(String),

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}
