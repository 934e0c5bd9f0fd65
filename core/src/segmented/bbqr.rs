//! `B$` segmented frames.
//!
//! Layout: magic, encoding tag, payload type tag, two base-36 digits of
//! part count, two base-36 digits of zero-based part number, then data.

use tracing::debug;

use crate::constants::{BBQR_HEADER_LEN, BBQR_MAGIC, BBQR_MAX_PARTS};
use crate::segmented::assemble::{ChunkAssembler, ChunkOutcome};
use crate::segmented::compress::{deflate_raw, inflate_raw};
use crate::segmented::types::{BbqrEncoding, BbqrHeader, Chunk, FileType, SegmentError};
use crate::utils::{base32_decode, base32_encode, base36_pair, enum_name_or_hex, parse_base36_pair};

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbqrFrames {
    pub encoding: BbqrEncoding,
    pub file_type: FileType,
    pub frames: Vec<String>,
}

/// Encode `payload` into frames of at most `capacity` characters.
///
/// With `encoding = None` the body is deflated when that makes it shorter
/// than plain Base32.
pub fn encode(
    payload: &[u8],
    file_type: FileType,
    encoding: Option<BbqrEncoding>,
    capacity: usize,
) -> Result<BbqrFrames, SegmentError> {
    if payload.is_empty() {
        return Err(SegmentError::Empty);
    }

    let (encoding, body) = match encoding {
        Some(enc) => (enc, encode_body(payload, enc)?),
        None => {
            let plain = base32_encode(payload);
            let packed = base32_encode(&deflate_raw(payload)?);
            if packed.len() < plain.len() {
                (BbqrEncoding::Zlib, packed)
            } else {
                (BbqrEncoding::Base32, plain)
            }
        }
    };

    let align = encoding.alignment();
    let room = capacity.saturating_sub(BBQR_HEADER_LEN) / align * align;
    if room == 0 {
        return Err(SegmentError::CapacityTooSmall { capacity, header: BBQR_HEADER_LEN });
    }

    let chars: Vec<char> = body.chars().collect();
    let total = chars.len().div_ceil(room);
    if total > BBQR_MAX_PARTS {
        return Err(SegmentError::TooManyParts { count: total, max: BBQR_MAX_PARTS });
    }
    let total_tag = base36_pair(total)
        .ok_or(SegmentError::TooManyParts { count: total, max: BBQR_MAX_PARTS })?;

    let mut frames = Vec::with_capacity(total);
    for (i, piece) in chars.chunks(room).enumerate() {
        let part_tag = base36_pair(i)
            .ok_or(SegmentError::TooManyParts { count: total, max: BBQR_MAX_PARTS })?;
        let data: String = piece.iter().collect();
        frames.push(format!(
            "{BBQR_MAGIC}{}{}{total_tag}{part_tag}{data}",
            encoding.tag(),
            file_type.tag()
        ));
    }

    debug!(encoding = ?encoding, parts = total, "bbqr frames encoded");
    Ok(BbqrFrames { encoding, file_type, frames })
}

fn encode_body(payload: &[u8], encoding: BbqrEncoding) -> Result<String, SegmentError> {
    Ok(match encoding {
        BbqrEncoding::Hex => hex::encode_upper(payload),
        BbqrEncoding::Base32 => base32_encode(payload),
        BbqrEncoding::Zlib => base32_encode(&deflate_raw(payload)?),
        BbqrEncoding::Unicode => std::str::from_utf8(payload)
            .map_err(|e| SegmentError::InvalidData(e.to_string()))?
            .to_string(),
    })
}

/// Bytes of one or more whole groups of encoded data.
fn decode_body(text: &str, encoding: BbqrEncoding) -> Result<Vec<u8>, SegmentError> {
    let invalid = || SegmentError::InvalidData(format!("not {encoding:?} data"));
    Ok(match encoding {
        BbqrEncoding::Hex => hex::decode(text).map_err(|_| invalid())?,
        BbqrEncoding::Base32 => base32_decode(text).ok_or_else(invalid)?,
        BbqrEncoding::Zlib => inflate_raw(&base32_decode(text).ok_or_else(invalid)?)?,
        BbqrEncoding::Unicode => text.as_bytes().to_vec(),
    })
}

#[inline]
pub fn looks_like(frame: &str) -> bool {
    frame.starts_with(BBQR_MAGIC)
}

/// Parse the header and check the data decodes on its own.
pub fn parse(frame: &str) -> Result<(BbqrHeader, Chunk), SegmentError> {
    let bytes = frame.as_bytes();
    if bytes.len() < BBQR_HEADER_LEN
        || !frame.starts_with(BBQR_MAGIC)
        || !bytes[..BBQR_HEADER_LEN].is_ascii()
    {
        return Err(SegmentError::MalformedHeader(frame.chars().take(BBQR_HEADER_LEN).collect()));
    }

    let encoding = BbqrEncoding::try_from(bytes[2])
        .map_err(|_| SegmentError::UnknownEncoding(enum_name_or_hex::<BbqrEncoding>(bytes[2])))?;
    let file_type = FileType::try_from(bytes[3])
        .map_err(|_| SegmentError::UnknownFileType(enum_name_or_hex::<FileType>(bytes[3])))?;
    let total = parse_base36_pair(&frame[4..6])
        .ok_or_else(|| SegmentError::MalformedHeader(frame[..BBQR_HEADER_LEN].to_string()))?;
    let part = parse_base36_pair(&frame[6..8])
        .ok_or_else(|| SegmentError::MalformedHeader(frame[..BBQR_HEADER_LEN].to_string()))?;

    let chunk = Chunk {
        index: part + 1,
        total,
        data: frame[BBQR_HEADER_LEN..].to_string(),
    };
    chunk.validate()?;

    match encoding {
        // deflate spans parts, so only the Base32 layer is checked here
        BbqrEncoding::Zlib => {
            base32_decode(&chunk.data)
                .ok_or_else(|| SegmentError::InvalidData("not Base32 data".into()))?;
        }
        BbqrEncoding::Hex | BbqrEncoding::Base32 => {
            decode_body(&chunk.data, encoding)?;
        }
        BbqrEncoding::Unicode => {}
    }

    let header = BbqrHeader { encoding, file_type, total, index: chunk.index };
    Ok((header, chunk))
}

/// Reassembles one BBQr transfer.
///
/// The first frame fixes encoding, payload type and part count; a frame
/// that disagrees on any of them starts a new transfer.
#[derive(Debug, Default, Clone)]
pub struct BbqrAssembler {
    kind: Option<(BbqrEncoding, FileType)>,
    chunks: ChunkAssembler,
}

impl BbqrAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.kind = None;
        self.chunks.reset();
    }

    #[inline]
    pub fn file_type(&self) -> Option<FileType> {
        self.kind.map(|(_, t)| t)
    }

    #[inline]
    pub fn encoding(&self) -> Option<BbqrEncoding> {
        self.kind.map(|(e, _)| e)
    }

    #[inline]
    pub fn total(&self) -> Option<usize> {
        self.chunks.total()
    }

    #[inline]
    pub fn received(&self) -> usize {
        self.chunks.received()
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.chunks.progress()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.chunks.is_complete()
    }

    pub fn receive(&mut self, frame: &str) -> Result<ChunkOutcome, SegmentError> {
        let (header, chunk) = parse(frame)?;
        let kind = (header.encoding, header.file_type);

        let mut restarted = false;
        match self.kind {
            Some(current) if current != kind => {
                debug!(?current, new = ?kind, "bbqr header changed, restarting");
                self.chunks.reset();
                restarted = true;
            }
            _ => {}
        }
        self.kind = Some(kind);

        let outcome = self.chunks.insert(chunk)?;
        Ok(match outcome {
            ChunkOutcome::Accepted | ChunkOutcome::Duplicate if restarted => ChunkOutcome::Restarted,
            other => other,
        })
    }

    /// The payload once every part is in. Text payload types are checked
    /// for UTF-8.
    pub fn payload(&self) -> Result<Option<Vec<u8>>, SegmentError> {
        let (Some((encoding, file_type)), Some(text)) = (self.kind, self.chunks.assemble()) else {
            return Ok(None);
        };
        let bytes = decode_body(&text, encoding)?;
        if file_type.is_text() && std::str::from_utf8(&bytes).is_err() {
            return Err(SegmentError::NotText(file_type));
        }
        Ok(Some(bytes))
    }
}

/// Stateless decode of a frame set, any order.
pub fn decode<'a, I>(frames: I) -> Result<Option<(FileType, Vec<u8>)>, SegmentError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut asm = BbqrAssembler::new();
    for frame in frames {
        asm.receive(frame)?;
    }
    let file_type = asm.file_type();
    Ok(asm.payload()?.zip(file_type).map(|(bytes, t)| (t, bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_zero_based() {
        let out = encode(&[0xAB; 40], FileType::Binary, Some(BbqrEncoding::Hex), 48).unwrap();
        assert_eq!(out.frames.len(), 2);
        assert!(out.frames[0].starts_with("B$HB0200"));
        assert!(out.frames[1].starts_with("B$HB0201"));
        assert!(out.frames.iter().all(|f| f.len() <= 48));
    }

    #[test]
    fn base32_parts_are_aligned() {
        let payload: Vec<u8> = (0..200u8).collect();
        let out = encode(&payload, FileType::Psbt, Some(BbqrEncoding::Base32), 60).unwrap();
        for f in &out.frames[..out.frames.len() - 1] {
            assert_eq!((f.len() - BBQR_HEADER_LEN) % 8, 0);
        }
        let (file_type, bytes) = decode(out.frames.iter().map(String::as_str)).unwrap().unwrap();
        assert_eq!(file_type, FileType::Psbt);
        assert_eq!(bytes, payload);
    }

    #[test]
    fn compression_is_chosen_only_when_smaller() {
        let repetitive = vec![b'a'; 500];
        assert_eq!(encode(&repetitive, FileType::Binary, None, 480).unwrap().encoding, BbqrEncoding::Zlib);

        let noisy: Vec<u8> = (0..64u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        assert_eq!(encode(&noisy, FileType::Binary, None, 480).unwrap().encoding, BbqrEncoding::Base32);
    }

    #[test]
    fn unicode_body_round_trips() {
        let text = "naïve café ☕".repeat(8);
        let out = encode(text.as_bytes(), FileType::Unicode, Some(BbqrEncoding::Unicode), 30).unwrap();
        let (_, bytes) = decode(out.frames.iter().map(String::as_str)).unwrap().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), text);
    }

    #[test]
    fn parse_rejects_bad_frames() {
        assert!(matches!(parse("B$"), Err(SegmentError::MalformedHeader(_))));
        assert!(matches!(parse("B$XB0100AA"), Err(SegmentError::UnknownEncoding(_))));
        assert!(matches!(parse("B$HQ0100AA"), Err(SegmentError::UnknownFileType(_))));
        assert!(matches!(parse("B$HB0101AA"), Err(SegmentError::PartOutOfRange { .. })));
        assert!(matches!(parse("B$2B0100A1"), Err(SegmentError::InvalidData(_))));
    }

    #[test]
    fn too_many_parts_is_infeasible() {
        let payload = vec![1u8; 4000];
        assert!(matches!(
            encode(&payload, FileType::Binary, Some(BbqrEncoding::Hex), 10),
            Err(SegmentError::TooManyParts { .. })
        ));
    }
}
