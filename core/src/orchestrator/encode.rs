use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::detect::{detect, Convention, DetectProfile, ScannedFrame};
use crate::orchestrator::types::{EncodeError, EncodedFrames, PayloadKind, TargetConvention};
use crate::segmented::{bbqr, simple};
use crate::ur::{UrEncoder, UrError};
use crate::utils::latin1_string;

fn infeasible(convention: TargetConvention, reason: impl ToString) -> EncodeError {
    EncodeError::Infeasible { convention, reason: reason.to_string() }
}

fn encode_fountain(
    ur_type: &str,
    payload: &[u8],
    config: &CodecConfig,
) -> Result<(Vec<String>, bool), UrError> {
    let (max, min) = config.density.fragment_limits();
    let mut encoder = UrEncoder::for_bytes(ur_type, payload, max, min)?;
    if encoder.is_single_part() {
        return Ok((vec![encoder.next_part()?], true));
    }

    let seq_len = encoder.seq_len() as usize;
    let count = seq_len + config.redundant_parts(seq_len);
    let frames = (0..count).map(|_| encoder.next_part()).collect::<Result<Vec<_>, _>>()?;
    Ok((frames, false))
}

fn encode_segmented(payload: &[u8], kind: PayloadKind, config: &CodecConfig) -> Result<EncodedFrames, EncodeError> {
    let out = bbqr::encode(payload, kind.file_type(), None, config.density.segment_chars())
        .map_err(|e| infeasible(TargetConvention::Segmented, e))?;
    Ok(EncodedFrames {
        convention: TargetConvention::Segmented,
        single_part: out.frames.len() == 1,
        frames: out.frames,
        binary: false,
        fell_back: false,
    })
}

/// Simple frames always carry Base64 so the reader never has to guess.
fn encode_simple(payload: &[u8], config: &CodecConfig) -> Result<EncodedFrames, EncodeError> {
    let frames = simple::encode(&BASE64.encode(payload), config.density.segment_chars())
        .map_err(|e| infeasible(TargetConvention::Simple, e))?;
    Ok(EncodedFrames {
        convention: TargetConvention::Simple,
        single_part: frames.len() == 1,
        frames,
        binary: false,
        fell_back: false,
    })
}

fn encode_single(payload: &[u8]) -> Result<EncodedFrames, EncodeError> {
    if payload.is_empty() {
        return Err(infeasible(TargetConvention::Single, "empty payload"));
    }
    let (frame, binary) = match std::str::from_utf8(payload) {
        Ok(text) => (text.to_string(), false),
        Err(_) => (latin1_string(payload), true),
    };
    // the scanner must classify the frame as Single, not as a framed part
    let scanned = if binary { ScannedFrame::Binary(payload.to_vec()) } else { ScannedFrame::Text(frame.clone()) };
    let seen_as = detect(&scanned, &DetectProfile::PAYLOAD);
    if seen_as != Convention::Single {
        return Err(infeasible(
            TargetConvention::Single,
            format!("payload would be scanned as {seen_as:?}"),
        ));
    }
    Ok(EncodedFrames {
        convention: TargetConvention::Single,
        frames: vec![frame],
        single_part: true,
        binary,
        fell_back: false,
    })
}

/// Encode `payload` for display under `target`.
///
/// Fountain targets fall back to segmented frames when the fountain
/// encoder rejects the payload; every other target fails with
/// [`EncodeError::Infeasible`].
pub fn encode_frames(
    payload: &[u8],
    target: &TargetConvention,
    kind: PayloadKind,
    config: &CodecConfig,
) -> Result<EncodedFrames, EncodeError> {
    let encoded = match target {
        TargetConvention::Simple => encode_simple(payload, config)?,
        TargetConvention::Segmented => encode_segmented(payload, kind, config)?,
        TargetConvention::Single => encode_single(payload)?,
        TargetConvention::FountainLegacy
        | TargetConvention::FountainModern
        | TargetConvention::Fountain { .. } => {
            let ur_type = target.ur_type().unwrap_or_default();
            match encode_fountain(ur_type, payload, config) {
                Ok((frames, single_part)) => EncodedFrames {
                    convention: target.clone(),
                    frames,
                    single_part,
                    binary: false,
                    fell_back: false,
                },
                Err(fountain_err) => {
                    warn!(error = %fountain_err, "fountain encoding failed, falling back to segmented frames");
                    let mut fallback = encode_segmented(payload, kind, config).map_err(|seg_err| {
                        EncodeError::NoConventionSucceeded {
                            attempts: vec![fountain_err.to_string(), seg_err.to_string()],
                        }
                    })?;
                    fallback.fell_back = true;
                    fallback
                }
            }
        }
    };

    debug!(
        convention = ?encoded.convention,
        frames = encoded.frames.len(),
        single_part = encoded.single_part,
        "payload encoded"
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Density;

    #[test]
    fn small_payload_is_single_part_fountain() {
        let out = encode_frames(b"tiny", &TargetConvention::FountainModern, PayloadKind::Psbt, &CodecConfig::default())
            .unwrap();
        assert!(out.single_part);
        assert_eq!(out.frames.len(), 1);
        assert!(out.frames[0].starts_with("ur:psbt/"));
    }

    #[test]
    fn redundancy_adds_mixed_parts() {
        let payload = vec![0x5Au8; 1000];
        let config = CodecConfig { fountain_redundancy_percent: 50, ..CodecConfig::with_density(Density::Medium) };
        let out = encode_frames(&payload, &TargetConvention::FountainLegacy, PayloadKind::Psbt, &config).unwrap();
        // 1003-byte CBOR message at 200 max -> 6 fragments, plus 3 mixed
        assert_eq!(out.frames.len(), 9);
        assert!(!out.single_part);
        assert!(out.frames.iter().all(|f| f.starts_with("ur:crypto-psbt/")));
    }

    #[test]
    fn empty_payload_fails_every_convention() {
        let err = encode_frames(b"", &TargetConvention::FountainModern, PayloadKind::Binary, &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, EncodeError::NoConventionSucceeded { ref attempts } if attempts.len() == 2));
    }

    #[test]
    fn simple_frames_are_base64_even_for_text() {
        let out = encode_frames(b"test", &TargetConvention::Simple, PayloadKind::Text, &CodecConfig::default()).unwrap();
        assert_eq!(out.frames, vec!["p1/1 dGVzdA==".to_string()]);
    }

    #[test]
    fn single_text_that_looks_framed_is_infeasible() {
        for text in ["p2wpkh is my script", "ur:psbt/aeae", "B$2U0100ABC"] {
            let err = encode_frames(text.as_bytes(), &TargetConvention::Single, PayloadKind::Text, &CodecConfig::default())
                .unwrap_err();
            assert!(matches!(err, EncodeError::Infeasible { convention: TargetConvention::Single, .. }), "{text}");
        }
        assert!(encode_frames(b"psbt is plain", &TargetConvention::Single, PayloadKind::Text, &CodecConfig::default()).is_ok());
    }

    #[test]
    fn binary_single_frame_is_flagged() {
        let out = encode_frames(&[0xFF, 0x00], &TargetConvention::Single, PayloadKind::Binary, &CodecConfig::default())
            .unwrap();
        assert!(out.binary);
        assert_eq!(out.frames[0].chars().count(), 2);
    }
}
