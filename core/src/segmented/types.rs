use num_enum::TryFromPrimitive;
use thiserror::Error;

/// Content encoding tag (third character of a BBQr frame).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum BbqrEncoding {
    Hex = b'H',
    Base32 = b'2',
    /// Raw deflate, then Base32.
    Zlib = b'Z',
    /// UTF-8 text as is.
    Unicode = b'U',
}

impl BbqrEncoding {
    #[inline]
    pub fn tag(self) -> char {
        self as u8 as char
    }

    /// Characters per independently decodable group.
    #[inline]
    pub fn alignment(self) -> usize {
        match self {
            BbqrEncoding::Hex => 2,
            BbqrEncoding::Base32 | BbqrEncoding::Zlib => 8,
            BbqrEncoding::Unicode => 1,
        }
    }
}

/// Payload type tag (fourth character of a BBQr frame).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum FileType {
    Psbt = b'P',
    Transaction = b'T',
    Json = b'J',
    Unicode = b'U',
    Cbor = b'C',
    Binary = b'B',
}

impl FileType {
    #[inline]
    pub fn tag(self) -> char {
        self as u8 as char
    }

    /// Reassembled bytes must be UTF-8.
    #[inline]
    pub fn is_text(self) -> bool {
        matches!(self, FileType::Json | FileType::Unicode)
    }
}

/// One ordered chunk. `index` is 1-based whatever the wire uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub total: usize,
    pub data: String,
}

impl Chunk {
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.total == 0 || self.index == 0 || self.index > self.total {
            return Err(SegmentError::PartOutOfRange { index: self.index, total: self.total });
        }
        Ok(())
    }
}

/// Fixed 8-character BBQr header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbqrHeader {
    pub encoding: BbqrEncoding,
    pub file_type: FileType,
    pub total: usize,
    /// 1-based.
    pub index: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("nothing to encode")]
    Empty,

    #[error("frame capacity {capacity} cannot hold a {header}-character header plus data")]
    CapacityTooSmall { capacity: usize, header: usize },

    #[error("payload needs {count} parts, more than {max}")]
    TooManyParts { count: usize, max: usize },

    #[error("malformed frame header: {0}")]
    MalformedHeader(String),

    #[error("unknown content encoding {0}")]
    UnknownEncoding(String),

    #[error("unknown payload type {0}")]
    UnknownFileType(String),

    #[error("part {index} outside 1..={total}")]
    PartOutOfRange { index: usize, total: usize },

    #[error("invalid part data: {0}")]
    InvalidData(String),

    #[error("deflate failed: {0}")]
    Deflate(String),

    #[error("payload of type {0:?} is not UTF-8")]
    NotText(FileType),
}
