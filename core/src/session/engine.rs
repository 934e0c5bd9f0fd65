use std::fmt;

use tracing::{debug, info, warn};

use crate::detect::{detect, Convention, DetectProfile, ScannedFrame};
use crate::segmented::{simple, BbqrAssembler, ChunkAssembler, ChunkOutcome};
use crate::session::types::{FrameOutcome, ScanProgress, SessionError, SessionState};
use crate::telemetry::{ScanCounters, ScanSnapshot};
use crate::ur::{UrDecoder, UrError, UrOutcome};

/// Turns the convention-native bytes of a finished transfer into the
/// session's final payload.
pub trait Reconstruct {
    type Output: Clone + fmt::Debug;

    /// Type tags and text forms this reader recognises.
    const PROFILE: DetectProfile;

    /// `data` is the reassembled text for Simple, the fountain message
    /// (CBOR) for every fountain convention and the raw bytes otherwise.
    fn reconstruct(&self, convention: &Convention, data: Vec<u8>) -> Result<Self::Output, String>;
}

/// Per-convention reassembly state.
#[derive(Debug)]
enum CodecState {
    Idle,
    Simple(ChunkAssembler),
    Segmented(BbqrAssembler),
    Fountain(UrDecoder),
    Single(Option<Vec<u8>>),
}

impl CodecState {
    fn for_convention(convention: &Convention) -> Self {
        match convention {
            Convention::Simple => CodecState::Simple(ChunkAssembler::new()),
            Convention::Segmented { .. } => CodecState::Segmented(BbqrAssembler::new()),
            Convention::FountainLegacy
            | Convention::FountainModern
            | Convention::FountainGeneric { .. }
            | Convention::RawBytesText => CodecState::Fountain(UrDecoder::new()),
            Convention::PlainText | Convention::Single => CodecState::Single(None),
        }
    }
}

/// Result of feeding one frame to the codec.
enum Step {
    Outcome(FrameOutcome),
    Done(Vec<u8>),
}

enum Failure {
    Malformed(String),
    Checksum(String),
}

impl From<UrError> for Failure {
    fn from(e: UrError) -> Self {
        if e.is_checksum_failure() {
            Failure::Checksum(e.to_string())
        } else {
            Failure::Malformed(e.to_string())
        }
    }
}

#[inline]
fn chunk_step(outcome: ChunkOutcome) -> FrameOutcome {
    match outcome {
        ChunkOutcome::Accepted => FrameOutcome::Accepted,
        ChunkOutcome::Duplicate => FrameOutcome::Duplicate,
        ChunkOutcome::Restarted => FrameOutcome::Restarted,
        ChunkOutcome::Complete => FrameOutcome::Completed,
    }
}

/// Single-writer reconstruction of one transfer.
///
/// The first frame locks the [`Convention`]; every later frame goes to that
/// convention's codec and is discarded if it does not parse there. A frame
/// that declares a different transfer shape restarts the reconstruction and
/// reports [`FrameOutcome::Restarted`]. A checksum failure resets the whole
/// session and is the only error `receive` returns besides a payload the
/// reader cannot interpret.
#[derive(Debug)]
pub struct DecodeSession<R: Reconstruct> {
    reader: R,
    convention: Option<Convention>,
    codec: CodecState,
    result: Option<R::Output>,
    counters: ScanCounters,
}

impl<R: Reconstruct + Default> Default for DecodeSession<R> {
    fn default() -> Self {
        Self::with_reader(R::default())
    }
}

impl<R: Reconstruct + Default> DecodeSession<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Reconstruct> DecodeSession<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            convention: None,
            codec: CodecState::Idle,
            result: None,
            counters: ScanCounters::default(),
        }
    }

    /// Explicit reset: back to `Idle` with fresh counters.
    pub fn reset(&mut self) {
        self.clear_transfer();
        self.counters = ScanCounters::default();
    }

    fn clear_transfer(&mut self) {
        self.convention = None;
        self.codec = CodecState::Idle;
        self.result = None;
    }

    pub fn state(&self) -> SessionState {
        match (&self.convention, &self.result) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::Accumulating,
            (Some(_), Some(_)) => SessionState::Complete,
        }
    }

    #[inline]
    pub fn convention(&self) -> Option<&Convention> {
        self.convention.as_ref()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn payload(&self) -> Option<&R::Output> {
        self.result.as_ref()
    }

    pub fn into_payload(self) -> Option<R::Output> {
        self.result
    }

    #[inline]
    pub fn counters(&self) -> &ScanCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot::from(&self.counters, self.progress().percent)
    }

    pub fn progress(&self) -> ScanProgress {
        let (received, expected, fraction) = match &self.codec {
            CodecState::Idle => (0, None, 0.0),
            CodecState::Simple(asm) => (asm.received(), asm.total(), asm.progress()),
            CodecState::Segmented(asm) => (asm.received(), asm.total(), asm.progress()),
            CodecState::Fountain(dec) => (
                dec.solved_fragments(),
                dec.expected_parts().map(|n| n as usize),
                dec.progress(),
            ),
            CodecState::Single(frame) => {
                let seen = usize::from(frame.is_some());
                (seen, Some(1), seen as f64)
            }
        };

        let percent = if self.result.is_some() {
            100
        } else {
            ((fraction * 100.0).floor() as u8).min(99)
        };
        ScanProgress { percent, received, expected }
    }

    pub fn receive_text(&mut self, frame: &str) -> Result<FrameOutcome, SessionError> {
        self.receive(&ScannedFrame::Text(frame.to_string()))
    }

    /// Feed one scanned frame.
    pub fn receive(&mut self, frame: &ScannedFrame) -> Result<FrameOutcome, SessionError> {
        let convention = match &self.convention {
            Some(c) => c.clone(),
            None => {
                let c = detect(frame, &R::PROFILE);
                info!(convention = ?c, "transfer convention locked");
                self.codec = CodecState::for_convention(&c);
                self.convention = Some(c.clone());
                c
            }
        };

        let step = match self.step(frame) {
            Ok(step) => step,
            Err(Failure::Malformed(detail)) => {
                debug!(%detail, "frame discarded");
                self.counters.record(FrameOutcome::Discarded);
                return Ok(FrameOutcome::Discarded);
            }
            Err(Failure::Checksum(detail)) => {
                warn!(convention = ?convention, "checksum failure, session reset");
                self.counters.record_failure();
                self.clear_transfer();
                return Err(SessionError::ChecksumFailure { convention, detail });
            }
        };

        let outcome = match step {
            Step::Outcome(outcome) => {
                if outcome == FrameOutcome::Restarted {
                    info!(convention = ?convention, "transfer restarted by a frame of a different shape");
                    self.result = None;
                }
                outcome
            }
            Step::Done(data) => match self.reader.reconstruct(&convention, data) {
                Ok(output) => {
                    info!(convention = ?convention, "transfer complete");
                    self.result = Some(output);
                    FrameOutcome::Completed
                }
                Err(detail) => {
                    warn!(convention = ?convention, "reassembled payload rejected, session reset");
                    self.counters.record_failure();
                    self.clear_transfer();
                    return Err(SessionError::InvalidPayload { convention, detail });
                }
            },
        };
        self.counters.record(outcome);
        Ok(outcome)
    }

    fn step(&mut self, frame: &ScannedFrame) -> Result<Step, Failure> {
        let text = frame.as_text();
        let need_text = || Failure::Malformed("binary frame in a text convention".into());

        match &mut self.codec {
            CodecState::Idle => Err(Failure::Malformed("no convention".into())),

            CodecState::Simple(asm) => {
                let chunk = simple::parse(text.ok_or_else(need_text)?)
                    .map_err(|e| Failure::Malformed(e.to_string()))?;
                let outcome = asm.insert(chunk).map_err(|e| Failure::Malformed(e.to_string()))?;
                Ok(match (outcome, asm.assemble()) {
                    (ChunkOutcome::Complete, Some(joined)) => Step::Done(joined.into_bytes()),
                    (outcome, _) => Step::Outcome(chunk_step(outcome)),
                })
            }

            CodecState::Segmented(asm) => {
                let outcome = asm
                    .receive(text.ok_or_else(need_text)?)
                    .map_err(|e| Failure::Malformed(e.to_string()))?;
                if outcome != ChunkOutcome::Complete {
                    return Ok(Step::Outcome(chunk_step(outcome)));
                }
                // every slot is filled; a decode failure now means corrupt parts
                match asm.payload() {
                    Ok(Some(bytes)) => Ok(Step::Done(bytes)),
                    Ok(None) => Ok(Step::Outcome(FrameOutcome::Accepted)),
                    Err(e) => {
                        asm.reset();
                        Err(Failure::Checksum(e.to_string()))
                    }
                }
            }

            CodecState::Fountain(dec) => {
                let outcome = dec.receive(text.ok_or_else(need_text)?)?;
                Ok(match outcome {
                    UrOutcome::Complete => match dec.message() {
                        Some(message) => Step::Done(message.to_vec()),
                        None => Step::Outcome(FrameOutcome::Accepted),
                    },
                    UrOutcome::Progress => Step::Outcome(FrameOutcome::Accepted),
                    UrOutcome::Redundant => Step::Outcome(FrameOutcome::Redundant),
                    UrOutcome::Duplicate => Step::Outcome(FrameOutcome::Duplicate),
                    UrOutcome::Restarted => Step::Outcome(FrameOutcome::Restarted),
                })
            }

            CodecState::Single(seen) => {
                let bytes = frame.as_bytes();
                match seen {
                    None => {
                        *seen = Some(bytes.to_vec());
                        Ok(Step::Done(bytes.to_vec()))
                    }
                    Some(first) if first.as_slice() == bytes => Ok(Step::Outcome(FrameOutcome::Duplicate)),
                    Some(_) => Err(Failure::Malformed("single-frame transfer already complete".into())),
                }
            }
        }
    }
}
