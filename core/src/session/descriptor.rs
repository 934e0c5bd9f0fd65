//! Output descriptor session: fountain CBOR, raw-bytes text or plain text.

use crate::descriptor::decode_output;
use crate::detect::{Convention, DetectProfile};
use crate::session::engine::{DecodeSession, Reconstruct};
use crate::ur::cbor;

/// Reads a textual output descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorReader;

fn utf8(data: Vec<u8>) -> Result<String, String> {
    String::from_utf8(data)
        .map(|s| s.trim().to_string())
        .map_err(|e| format!("descriptor text is not UTF-8: {e}"))
}

impl Reconstruct for DescriptorReader {
    type Output = String;

    const PROFILE: DetectProfile = DetectProfile::DESCRIPTOR;

    fn reconstruct(&self, convention: &Convention, data: Vec<u8>) -> Result<String, String> {
        match convention {
            Convention::FountainLegacy | Convention::FountainModern => {
                decode_output(&data).map_err(|e| e.to_string())
            }
            Convention::RawBytesText | Convention::FountainGeneric { .. } => {
                let bytes = cbor::unwrap_bytes(&data).map_err(|e| e.to_string())?;
                utf8(bytes)
            }
            Convention::Simple
            | Convention::Segmented { .. }
            | Convention::PlainText
            | Convention::Single => utf8(data),
        }
    }
}

/// Scanning session that yields descriptor text.
pub type DescriptorScanSession = DecodeSession<DescriptorReader>;
