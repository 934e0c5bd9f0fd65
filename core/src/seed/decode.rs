use crate::constants::{STANDARD_DIGITS_PER_WORD, WORDLIST_LEN};
use crate::detect::ScannedFrame;
use crate::seed::types::{SeedError, SeedPhrase};
use crate::utils::latin1_bytes;

/// QR byte mode indicator.
const BYTE_MODE: u8 = 0b0100;
/// Pad codewords appended after the terminator.
const PAD: [u8; 2] = [0xEC, 0x11];

pub fn decode_standard(digits: &str) -> Result<SeedPhrase, SeedError> {
    let digits = digits.trim();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SeedError::NonDigit);
    }
    if digits.len() != 48 && digits.len() != 96 {
        return Err(SeedError::DigitLength(digits.len()));
    }

    let indices = digits
        .as_bytes()
        .chunks(STANDARD_DIGITS_PER_WORD)
        .map(|group| {
            let value = group.iter().fold(0u32, |acc, d| acc * 10 + (d - b'0') as u32);
            u16::try_from(value)
                .ok()
                .filter(|v| (*v as usize) < WORDLIST_LEN)
                .ok_or(SeedError::IndexOutOfRange(value))
        })
        .collect::<Result<Vec<u16>, _>>()?;
    SeedPhrase::from_indices(indices)
}

pub fn decode_compact(entropy: &[u8]) -> Result<SeedPhrase, SeedError> {
    SeedPhrase::from_entropy(entropy)
}

/// Payload of a byte-mode segment as it appears in raw symbol bytes:
/// a 4-bit mode, an 8-bit count split over two nibbles, then data shifted by
/// one nibble, a zero terminator nibble and optional pad codewords.
///
/// Only the 8-bit count of versions 1 to 9 is recognised; `None` means the
/// buffer is not a wrapped segment.
pub fn extract_byte_mode_payload(raw: &[u8]) -> Option<Vec<u8>> {
    let first = *raw.first()?;
    if first >> 4 != BYTE_MODE || raw.len() < 2 {
        return None;
    }
    let len = (((first & 0x0F) << 4) | (raw[1] >> 4)) as usize;
    if len == 0 || raw.len() < len + 2 {
        return None;
    }

    let data: Vec<u8> = (0..len).map(|i| (raw[i + 1] << 4) | (raw[i + 2] >> 4)).collect();

    // terminator nibble, then nothing but pad codewords
    if raw[len + 1] & 0x0F != 0 {
        return None;
    }
    let padded = raw[len + 2..].iter().enumerate().all(|(i, &b)| b == PAD[i % 2]);
    padded.then_some(data)
}

fn compact_from_bytes(bytes: &[u8]) -> Option<SeedPhrase> {
    if let Some(inner) = extract_byte_mode_payload(bytes) {
        if inner.len() == 16 || inner.len() == 32 {
            return decode_compact(&inner).ok();
        }
    }
    match bytes.len() {
        16 | 32 => decode_compact(bytes).ok(),
        _ => None,
    }
}

/// Recognise a scanned seed frame in either form.
pub fn decode_seed_frame(frame: &ScannedFrame) -> Option<SeedPhrase> {
    match frame {
        ScannedFrame::Text(text) => {
            let trimmed = text.trim();
            if matches!(trimmed.len(), 48 | 96) && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return decode_standard(trimmed).ok();
            }
            // scanners that hand byte segments over as ISO-8859-1 text
            compact_from_bytes(&latin1_bytes(text)?)
        }
        ScannedFrame::Binary(bytes) => {
            if matches!(bytes.len(), 48 | 96) && bytes.iter().all(u8::is_ascii_digit) {
                let digits = std::str::from_utf8(bytes).ok()?;
                return decode_standard(digits).ok();
            }
            compact_from_bytes(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::encode::{encode_compact, encode_standard};

    const ZOO_WRONG: &str = "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong";

    fn wrap(data: &[u8]) -> Vec<u8> {
        let len = data.len() as u8;
        let mut raw = vec![(BYTE_MODE << 4) | (len >> 4)];
        let mut carry = len & 0x0F;
        for &b in data {
            raw.push((carry << 4) | (b >> 4));
            carry = b & 0x0F;
        }
        raw.push(carry << 4);
        raw.extend_from_slice(&[0xEC, 0x11, 0xEC]);
        raw
    }

    #[test]
    fn standard_form_is_four_digits_per_word() {
        let phrase = SeedPhrase::from_phrase(ZOO_WRONG).unwrap();
        let digits = encode_standard(&phrase);
        assert_eq!(digits.len(), 48);
        assert!(digits.starts_with("2047"));
        assert_eq!(decode_standard(&digits).unwrap(), phrase);
    }

    #[test]
    fn standard_form_rejections() {
        assert_eq!(decode_standard("12a4"), Err(SeedError::NonDigit));
        assert_eq!(decode_standard("1234"), Err(SeedError::DigitLength(4)));
        let mut digits = "0000".repeat(11);
        digits.push_str("2048");
        assert_eq!(decode_standard(&digits), Err(SeedError::IndexOutOfRange(2048)));
        assert_eq!(decode_standard(&"0000".repeat(12)), Err(SeedError::Checksum));
    }

    #[test]
    fn wrapped_compact_bytes_are_extracted() {
        let phrase = SeedPhrase::from_phrase(ZOO_WRONG).unwrap();
        let entropy = encode_compact(&phrase);
        assert_eq!(entropy.len(), 16);

        let raw = wrap(&entropy);
        assert_eq!(extract_byte_mode_payload(&raw).unwrap(), entropy.as_slice());
        assert_eq!(decode_seed_frame(&ScannedFrame::Binary(raw)).unwrap(), phrase);
        assert_eq!(decode_seed_frame(&ScannedFrame::Binary(entropy.to_vec())).unwrap(), phrase);
    }

    #[test]
    fn extraction_failure_is_not_an_error() {
        assert_eq!(extract_byte_mode_payload(&[0x12, 0x34]), None);
        assert_eq!(extract_byte_mode_payload(&[0x41, 0x00]), None);
        assert!(decode_seed_frame(&ScannedFrame::Binary(vec![7u8; 20])).is_none());
        assert!(decode_seed_frame(&ScannedFrame::Text("hello".into())).is_none());
    }
}
