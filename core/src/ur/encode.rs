use crate::constants::UR_SCHEME;
use crate::fountain::{FountainEncoder, FountainError};
use crate::ur::bytewords;
use crate::ur::cbor;
use crate::ur::types::UrError;

/// Endless `ur:` frame generator for one message.
#[derive(Debug, Clone)]
pub struct UrEncoder {
    ur_type: String,
    message: Vec<u8>,
    fountain: FountainEncoder,
}

impl UrEncoder {
    /// `message` is the already CBOR-encoded item (see [`cbor::wrap_bytes`]).
    pub fn new(
        ur_type: &str,
        message: Vec<u8>,
        max_fragment_len: usize,
        min_fragment_len: usize,
    ) -> Result<Self, UrError> {
        let ur_type = ur_type.to_ascii_lowercase();
        validate_type(&ur_type)?;
        let fountain = FountainEncoder::new(&message, max_fragment_len, min_fragment_len)?;
        Ok(Self {
            ur_type,
            message,
            fountain,
        })
    }

    /// Convenience: wrap raw bytes as a CBOR byte string first.
    pub fn for_bytes(
        ur_type: &str,
        payload: &[u8],
        max_fragment_len: usize,
        min_fragment_len: usize,
    ) -> Result<Self, UrError> {
        if payload.is_empty() {
            return Err(FountainError::EmptyMessage.into());
        }
        Self::new(ur_type, cbor::wrap_bytes(payload)?, max_fragment_len, min_fragment_len)
    }

    #[inline]
    pub fn ur_type(&self) -> &str {
        &self.ur_type
    }

    #[inline]
    pub fn is_single_part(&self) -> bool {
        self.fountain.is_single_part()
    }

    #[inline]
    pub fn seq_len(&self) -> u32 {
        self.fountain.seq_len()
    }

    #[inline]
    pub fn seq_num(&self) -> u32 {
        self.fountain.seq_num()
    }

    /// The next frame string. Single-part messages repeat the same frame.
    pub fn next_part(&mut self) -> Result<String, UrError> {
        if self.is_single_part() {
            return Ok(self.single_frame());
        }
        let part = self.fountain.next_part();
        self.frame_for(&part)
    }

    /// Frame for an arbitrary sequence number; does not advance the encoder.
    pub fn part_at(&self, seq_num: u32) -> Result<String, UrError> {
        if self.is_single_part() {
            return Ok(self.single_frame());
        }
        self.frame_for(&self.fountain.part_at(seq_num))
    }

    fn single_frame(&self) -> String {
        format!("{}{}/{}", UR_SCHEME, self.ur_type, bytewords::encode_minimal(&self.message))
    }

    fn frame_for(&self, part: &crate::fountain::FountainPart) -> Result<String, UrError> {
        let body = cbor::encode_part(part)?;
        Ok(format!(
            "{}{}/{}-{}/{}",
            UR_SCHEME,
            self.ur_type,
            part.seq_num,
            part.seq_len,
            bytewords::encode_minimal(&body)
        ))
    }
}

pub(crate) fn validate_type(ur_type: &str) -> Result<(), UrError> {
    let ok = !ur_type.is_empty()
        && ur_type
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if ok { Ok(()) } else { Err(UrError::InvalidType(ur_type.to_string())) }
}
