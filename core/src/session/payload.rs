//! Binary payload session (transaction proposals, raw transactions).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::detect::{Convention, DetectProfile};
use crate::session::engine::{DecodeSession, Reconstruct};
use crate::ur::cbor;

/// Reads an opaque byte payload out of any convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadReader;

impl Reconstruct for PayloadReader {
    type Output = Vec<u8>;

    const PROFILE: DetectProfile = DetectProfile::PAYLOAD;

    fn reconstruct(&self, convention: &Convention, data: Vec<u8>) -> Result<Vec<u8>, String> {
        match convention {
            // text frames; binary payloads travel as Base64
            Convention::Simple => {
                let decoded = std::str::from_utf8(&data)
                    .ok()
                    .and_then(|text| BASE64.decode(text.trim()).ok());
                Ok(decoded.unwrap_or(data))
            }
            Convention::FountainLegacy | Convention::FountainModern => {
                cbor::unwrap_bytes(&data).map_err(|e| e.to_string())
            }
            Convention::FountainGeneric { .. } | Convention::RawBytesText => {
                Ok(cbor::unwrap_bytes(&data).unwrap_or(data))
            }
            Convention::Segmented { .. } | Convention::PlainText | Convention::Single => Ok(data),
        }
    }
}

/// Scanning session that yields raw bytes.
pub type PayloadScanSession = DecodeSession<PayloadReader>;
