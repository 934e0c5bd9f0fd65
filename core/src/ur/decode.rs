use tracing::debug;

use crate::constants::UR_SCHEME;
use crate::fountain::{FountainDecoder, PartOutcome};
use crate::ur::bytewords;
use crate::ur::cbor;
use crate::ur::encode::validate_type;
use crate::ur::types::{UrError, UrFrame, UrOutcome};

/// Parse one `ur:` frame string (case-insensitive).
pub fn parse_ur(frame: &str) -> Result<UrFrame, UrError> {
    let lower = frame.trim().to_ascii_lowercase();
    let rest = lower.strip_prefix(UR_SCHEME).ok_or(UrError::MissingScheme)?;

    let components: Vec<&str> = rest.split('/').collect();
    match components.as_slice() {
        [ur_type, body] => {
            validate_type(ur_type)?;
            Ok(UrFrame::Single {
                ur_type: ur_type.to_string(),
                message: bytewords::decode_minimal(body)?,
            })
        }
        [ur_type, seq, body] => {
            validate_type(ur_type)?;
            let (seq_num, seq_len) = parse_sequence(seq)?;
            let part = cbor::decode_part(&bytewords::decode_minimal(body)?)?;
            if part.seq_num != seq_num || part.seq_len != seq_len {
                return Err(UrError::SequenceMismatch {
                    path: seq.to_string(),
                    body: format!("{}-{}", part.seq_num, part.seq_len),
                });
            }
            Ok(UrFrame::Part { ur_type: ur_type.to_string(), part })
        }
        _ => Err(UrError::InvalidPath(rest.to_string())),
    }
}

fn parse_sequence(seq: &str) -> Result<(u32, u32), UrError> {
    let (num, len) = seq
        .split_once('-')
        .ok_or_else(|| UrError::InvalidPath(seq.to_string()))?;
    let parse = |s: &str| s.parse::<u32>().map_err(|_| UrError::InvalidPath(seq.to_string()));
    Ok((parse(num)?, parse(len)?))
}

/// Reassembles one `ur:` transfer.
///
/// The first accepted frame fixes the type; frames of any other type are
/// rejected with [`UrError::TypeMismatch`] and leave the state untouched.
#[derive(Debug, Default)]
pub struct UrDecoder {
    ur_type: Option<String>,
    fountain: FountainDecoder,
    message: Option<Vec<u8>>,
}

impl UrDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder locked to one type from the start.
    pub fn for_type(ur_type: &str) -> Self {
        Self { ur_type: Some(ur_type.to_ascii_lowercase()), ..Self::default() }
    }

    pub fn reset(&mut self) {
        let ur_type = self.ur_type.take();
        *self = Self { ur_type, ..Self::default() };
    }

    #[inline]
    pub fn ur_type(&self) -> Option<&str> {
        self.ur_type.as_deref()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.message.is_some()
    }

    pub fn progress(&self) -> f64 {
        if self.message.is_some() { 1.0 } else { self.fountain.progress() }
    }

    #[inline]
    pub fn solved_fragments(&self) -> usize {
        if self.message.is_some() {
            self.fountain.seq_len().map_or(1, |n| n as usize)
        } else {
            self.fountain.solved_fragments()
        }
    }

    #[inline]
    pub fn expected_parts(&self) -> Option<u32> {
        self.fountain.seq_len()
    }

    pub fn message(&self) -> Option<&[u8]> {
        self.message.as_deref()
    }

    pub fn take_message(&mut self) -> Option<Vec<u8>> {
        self.message.take()
    }

    pub fn receive(&mut self, frame: &str) -> Result<UrOutcome, UrError> {
        let parsed = parse_ur(frame)?;
        self.receive_parsed(parsed)
    }

    pub fn receive_parsed(&mut self, frame: UrFrame) -> Result<UrOutcome, UrError> {
        match &self.ur_type {
            Some(expected) if expected != frame.ur_type() => {
                return Err(UrError::TypeMismatch {
                    expected: expected.clone(),
                    found: frame.ur_type().to_string(),
                });
            }
            Some(_) => {}
            None => self.ur_type = Some(frame.ur_type().to_string()),
        }

        match frame {
            UrFrame::Single { message, .. } => {
                if self.message.as_deref() == Some(message.as_slice()) {
                    return Ok(UrOutcome::Duplicate);
                }
                let restarted = self.message.is_some() || self.fountain.shape().is_some();
                self.fountain.reset();
                self.message = Some(message);
                debug!(restarted, "single-part ur message received");
                Ok(UrOutcome::Complete)
            }
            UrFrame::Part { part, .. } => {
                let switched = self.message.is_some() && self.fountain.shape().is_none();
                if switched {
                    self.message = None;
                }
                let outcome = self.fountain.receive(&part)?;
                match outcome {
                    PartOutcome::Complete => {
                        self.message = self.fountain.result().map(<[u8]>::to_vec);
                    }
                    PartOutcome::Restarted => self.message = None,
                    _ => {}
                }
                if switched && outcome != PartOutcome::Complete {
                    return Ok(UrOutcome::Restarted);
                }
                Ok(match outcome {
                    PartOutcome::Progress => UrOutcome::Progress,
                    PartOutcome::Redundant => UrOutcome::Redundant,
                    PartOutcome::Duplicate => UrOutcome::Duplicate,
                    PartOutcome::Restarted => UrOutcome::Restarted,
                    PartOutcome::Complete => UrOutcome::Complete,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ur::encode::UrEncoder;

    #[test]
    fn single_part_round_trip() {
        let mut encoder = UrEncoder::for_bytes("bytes", b"hello", 200, 10).unwrap();
        assert!(encoder.is_single_part());
        let frame = encoder.next_part().unwrap();
        assert!(frame.starts_with("ur:bytes/"));

        let mut decoder = UrDecoder::new();
        assert_eq!(decoder.receive(&frame).unwrap(), UrOutcome::Complete);
        let message = decoder.take_message().unwrap();
        assert_eq!(cbor::unwrap_bytes(&message).unwrap(), b"hello");
    }

    #[test]
    fn multi_part_frames_carry_sequence_path() {
        let payload: Vec<u8> = (0..250u32).map(|i| (i * 7) as u8).collect();
        let mut encoder = UrEncoder::for_bytes("psbt", &payload, 60, 10).unwrap();
        let frame = encoder.next_part().unwrap();
        let seq_len = encoder.seq_len();
        assert!(frame.starts_with(&format!("ur:psbt/1-{seq_len}/")));

        let mut decoder = UrDecoder::new();
        let mut frames = vec![frame];
        frames.extend((1..seq_len).map(|_| encoder.next_part().unwrap()));
        for f in &frames {
            decoder.receive(&f.to_uppercase()).unwrap();
        }
        assert!(decoder.is_complete());
        assert_eq!(cbor::unwrap_bytes(decoder.message().unwrap()).unwrap(), payload);
    }

    #[test]
    fn other_type_is_rejected_once_locked() {
        let mut decoder = UrDecoder::for_type("psbt");
        let frame = UrEncoder::for_bytes("bytes", b"x", 200, 10).unwrap().part_at(1).unwrap();
        assert!(matches!(decoder.receive(&frame), Err(UrError::TypeMismatch { .. })));
        assert!(!decoder.is_complete());
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert_eq!(parse_ur("uri:bytes/abc"), Err(UrError::MissingScheme));
        assert!(matches!(parse_ur("ur:by tes/aeae"), Err(UrError::InvalidType(_))));
        assert!(matches!(parse_ur("ur:bytes/1-x/aeae"), Err(UrError::InvalidPath(_))));
        assert!(matches!(parse_ur("ur:bytes/a/b/c/d"), Err(UrError::InvalidPath(_))));
    }

    #[test]
    fn path_must_agree_with_body() {
        let payload = vec![9u8; 300];
        let encoder = UrEncoder::for_bytes("bytes", &payload, 100, 10).unwrap();
        let frame = encoder.part_at(2).unwrap();
        let tampered = frame.replacen("/2-", "/3-", 1);
        assert!(matches!(parse_ur(&tampered), Err(UrError::SequenceMismatch { .. })));
    }
}
