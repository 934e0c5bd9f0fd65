use crate::constants::ur_types;
use crate::segmented::{BbqrEncoding, FileType};

/// One scanned QR symbol as delivered by the camera pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedFrame {
    Text(String),
    /// Raw byte-mode segment.
    Binary(Vec<u8>),
}

impl ScannedFrame {
    /// Text view; binary frames qualify when they are valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScannedFrame::Text(s) => Some(s),
            ScannedFrame::Binary(b) => std::str::from_utf8(b).ok(),
        }
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, ScannedFrame::Binary(_))
    }

    /// The bytes a Single-convention transfer yields.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ScannedFrame::Text(s) => s.as_bytes(),
            ScannedFrame::Binary(b) => b,
        }
    }
}

impl From<&str> for ScannedFrame {
    fn from(s: &str) -> Self {
        ScannedFrame::Text(s.to_string())
    }
}

impl From<String> for ScannedFrame {
    fn from(s: String) -> Self {
        ScannedFrame::Text(s)
    }
}

impl From<Vec<u8>> for ScannedFrame {
    fn from(b: Vec<u8>) -> Self {
        ScannedFrame::Binary(b)
    }
}

/// Multi-frame convention of one transfer, fixed by its first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convention {
    /// `p<part>/<total> <chunk>`.
    Simple,
    /// Fountain frames with the older type tag.
    FountainLegacy,
    /// Fountain frames with the current type tag.
    FountainModern,
    /// Fountain frames of any other type.
    FountainGeneric { ur_type: String },
    /// Fountain-coded byte string that holds UTF-8 text.
    RawBytesText,
    /// `B$` frames. Tags are `None` when the first frame carried unknown ones.
    Segmented { encoding: Option<BbqrEncoding>, file_type: Option<FileType> },
    /// Content already in its final textual form.
    PlainText,
    /// The whole frame is the payload.
    Single,
}

impl Convention {
    #[inline]
    pub fn is_fountain(&self) -> bool {
        matches!(
            self,
            Convention::FountainLegacy
                | Convention::FountainModern
                | Convention::FountainGeneric { .. }
                | Convention::RawBytesText
        )
    }

    /// Complete as soon as the first frame is accepted.
    #[inline]
    pub fn is_single_frame(&self) -> bool {
        matches!(self, Convention::Single | Convention::PlainText)
    }
}

/// Type tags and text forms a session variant recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectProfile {
    pub legacy: &'static str,
    pub modern: &'static str,
    /// `ur:` type whose byte string is UTF-8 text.
    pub text_bytes: Option<&'static str>,
    /// Prefixes of content that needs no framing at all.
    pub plain_text_prefixes: &'static [&'static str],
}

/// Script expressions a plain-text output descriptor can start with.
pub const DESCRIPTOR_PREFIXES: &[&str] = &[
    "wpkh(", "wsh(", "sh(", "tr(", "pkh(", "pk(", "combo(", "multi(", "sortedmulti(", "addr(", "raw(",
];

impl DetectProfile {
    pub const PAYLOAD: DetectProfile = DetectProfile {
        legacy: ur_types::CRYPTO_PSBT,
        modern: ur_types::PSBT,
        text_bytes: None,
        plain_text_prefixes: &[],
    };

    pub const DESCRIPTOR: DetectProfile = DetectProfile {
        legacy: ur_types::CRYPTO_OUTPUT,
        modern: ur_types::OUTPUT_DESCRIPTOR,
        text_bytes: Some(ur_types::BYTES),
        plain_text_prefixes: DESCRIPTOR_PREFIXES,
    };
}
