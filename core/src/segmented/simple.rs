//! `p<part>/<total> <chunk>` frames.

use crate::constants::{SIMPLE_MARKER, SIMPLE_SEPARATOR};
use crate::segmented::assemble::ChunkAssembler;
use crate::segmented::types::{Chunk, SegmentError};

#[inline]
fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Worst-case header length for a transfer of `total` parts.
#[inline]
pub fn header_len(total: usize) -> usize {
    // marker + part + '/' + total + separator
    1 + 2 * digits(total) + 2
}

/// Split `text` into frames of at most `capacity` characters.
pub fn encode(text: &str, capacity: usize) -> Result<Vec<String>, SegmentError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Err(SegmentError::Empty);
    }

    // The header grows with the part count, which depends on the chunk size.
    let mut total = 1usize;
    let chunk_len = loop {
        let header = header_len(total);
        let room = capacity.checked_sub(header).filter(|r| *r > 0).ok_or(
            SegmentError::CapacityTooSmall { capacity, header },
        )?;
        let needed = chars.len().div_ceil(room);
        if needed <= total {
            break room;
        }
        total = needed;
    };

    let total = chars.len().div_ceil(chunk_len);
    Ok(chars
        .chunks(chunk_len)
        .enumerate()
        .map(|(i, c)| {
            let body: String = c.iter().collect();
            format!("{SIMPLE_MARKER}{}/{total}{SIMPLE_SEPARATOR}{body}", i + 1)
        })
        .collect())
}

fn parse_number(s: &str) -> Option<usize> {
    let leading_zero = s.len() > 1 && s.starts_with('0');
    if s.is_empty() || leading_zero || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// True when `frame` has the shape of a Simple frame header.
pub fn looks_like(frame: &str) -> bool {
    let mut chars = frame.chars();
    chars.next() == Some(SIMPLE_MARKER) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

pub fn parse(frame: &str) -> Result<Chunk, SegmentError> {
    let malformed = || SegmentError::MalformedHeader(frame.chars().take(16).collect());

    let rest = frame.strip_prefix(SIMPLE_MARKER).ok_or_else(malformed)?;
    let (header, data) = rest.split_once(SIMPLE_SEPARATOR).ok_or_else(malformed)?;
    let (part, total) = header.split_once('/').ok_or_else(malformed)?;
    let chunk = Chunk {
        index: parse_number(part).ok_or_else(malformed)?,
        total: parse_number(total).ok_or_else(malformed)?,
        data: data.to_string(),
    };
    chunk.validate()?;
    Ok(chunk)
}

/// Stateless decode of a complete frame set, any order.
///
/// `Ok(None)` while parts are missing.
pub fn decode<'a, I>(frames: I) -> Result<Option<String>, SegmentError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut asm = ChunkAssembler::new();
    for frame in frames {
        asm.insert(parse(frame)?)?;
    }
    Ok(asm.assemble())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_respect_capacity() {
        let text = "x".repeat(1000);
        let frames = encode(&text, 50).unwrap();
        assert!(frames.iter().all(|f| f.chars().count() <= 50));
        assert!(frames[0].starts_with("p1/"));
        assert_eq!(decode(frames.iter().map(String::as_str)).unwrap().unwrap(), text);
    }

    #[test]
    fn header_growth_is_accounted_for() {
        // a one-digit total leaves 5 data chars, a two-digit total only 3
        let text = "y".repeat(46);
        let frames = encode(&text, 10).unwrap();
        assert!(frames.iter().all(|f| f.chars().count() <= 10));
        assert_eq!(decode(frames.iter().map(String::as_str)).unwrap().unwrap(), text);
    }

    #[test]
    fn tiny_capacity_is_infeasible() {
        assert!(matches!(encode("abc", 5), Err(SegmentError::CapacityTooSmall { .. })));
        assert_eq!(encode("", 100), Err(SegmentError::Empty));
    }

    #[test]
    fn parse_rejects_malformed_headers() {
        assert!(parse("p01/2 x").is_err());
        assert!(parse("p1-2 x").is_err());
        assert!(parse("p3/2 x").is_err());
        assert!(parse("q1/2 x").is_err());
        assert_eq!(parse("p2/2 a b").unwrap().data, "a b");
    }

    #[test]
    fn incomplete_set_is_none() {
        assert_eq!(decode(["p1/2 ab"]).unwrap(), None);
    }
}
