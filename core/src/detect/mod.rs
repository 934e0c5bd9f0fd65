//! detect/mod.rs
//! One-shot classification of the first frame of a transfer.
//!
//! Responsibilities:
//! - Map a literal prefix to a [`Convention`]
//! - Carry the type tags that decide legacy, modern and generic fountain
//!
//! Non-responsibilities:
//! - Parsing the frame body
//! - Re-classifying later frames (a session locks the first answer)

pub mod types;

pub use types::{Convention, DetectProfile, ScannedFrame};

use tracing::debug;

use crate::constants::UR_SCHEME;
use crate::segmented::{bbqr, simple, BbqrEncoding, FileType};

/// The `<type>` of a `ur:<type>/...` frame, lower-cased.
fn ur_type_of(text: &str) -> Option<String> {
    let head = text.get(..UR_SCHEME.len())?;
    if !head.eq_ignore_ascii_case(UR_SCHEME) {
        return None;
    }
    let rest = &text[UR_SCHEME.len()..];
    let ur_type = rest.split('/').next().unwrap_or_default();
    Some(ur_type.to_ascii_lowercase())
}

fn classify_text(text: &str, profile: &DetectProfile) -> Option<Convention> {
    if bbqr::looks_like(text) {
        let tag = |i: usize| text.as_bytes().get(i).copied();
        return Some(Convention::Segmented {
            encoding: tag(2).and_then(|b| BbqrEncoding::try_from(b).ok()),
            file_type: tag(3).and_then(|b| FileType::try_from(b).ok()),
        });
    }
    if let Some(ur_type) = ur_type_of(text) {
        return Some(if ur_type == profile.legacy {
            Convention::FountainLegacy
        } else if ur_type == profile.modern {
            Convention::FountainModern
        } else if profile.text_bytes == Some(ur_type.as_str()) {
            Convention::RawBytesText
        } else {
            Convention::FountainGeneric { ur_type }
        });
    }
    if simple::looks_like(text) {
        return Some(Convention::Simple);
    }
    let trimmed = text.trim_start();
    if profile.plain_text_prefixes.iter().any(|p| trimmed.starts_with(p)) {
        return Some(Convention::PlainText);
    }
    None
}

/// Classify the first frame of a transfer.
pub fn detect(frame: &ScannedFrame, profile: &DetectProfile) -> Convention {
    let convention = frame
        .as_text()
        .and_then(|text| classify_text(text, profile))
        .unwrap_or(Convention::Single);
    debug!(?convention, binary = frame.is_binary(), "frame classified");
    convention
}
