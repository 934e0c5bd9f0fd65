//! Raw deflate (no zlib wrapper) for `Z` encoded BBQr payloads.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::segmented::types::SegmentError;

/// Best compression; the stream carries no header or trailer.
pub fn deflate_raw(input: &[u8]) -> Result<Vec<u8>, SegmentError> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::best());
    enc.write_all(input).map_err(|e| SegmentError::Deflate(e.to_string()))?;
    enc.finish().map_err(|e| SegmentError::Deflate(e.to_string()))
}

pub fn inflate_raw(input: &[u8]) -> Result<Vec<u8>, SegmentError> {
    let mut dec = DeflateDecoder::new(input);
    let mut out = Vec::new();
    dec.read_to_end(&mut out).map_err(|e| SegmentError::Deflate(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_round_trip_shrinks_repetitive_input() {
        let input = b"abcabcabcabcabcabcabcabcabcabcabcabcabcabc".repeat(10);
        let packed = deflate_raw(&input).unwrap();
        assert!(packed.len() < input.len());
        assert_eq!(inflate_raw(&packed).unwrap(), input);
    }

    #[test]
    fn garbage_does_not_inflate() {
        assert!(inflate_raw(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
