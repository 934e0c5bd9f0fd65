use std::fmt;
use num_enum::TryFromPrimitive;

/// CRC-32 (ISO-HDLC) over `data`.
///
/// This is the checksum the fountain parts carry and the one Bytewords
/// appends to every body.
#[inline]
pub fn compute_checksum(data: &[u8]) -> u32 {
    use crc32fast::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

// ============================================================
// Base-36 (two digit counters used by segmented frames)
// ============================================================

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode `value` (< 1296) as two upper-case base-36 digits.
pub fn base36_pair(value: usize) -> Option<String> {
    if value >= 36 * 36 {
        return None;
    }
    let hi = BASE36_DIGITS[value / 36] as char;
    let lo = BASE36_DIGITS[value % 36] as char;
    Some([hi, lo].iter().collect())
}

/// Parse two base-36 digits (case-insensitive).
pub fn parse_base36_pair(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let digit = |b: u8| -> Option<usize> {
        match b {
            b'0'..=b'9' => Some((b - b'0') as usize),
            b'A'..=b'Z' => Some((b - b'A') as usize + 10),
            b'a'..=b'z' => Some((b - b'a') as usize + 10),
            _ => None,
        }
    };
    Some(digit(bytes[0])? * 36 + digit(bytes[1])?)
}

// ============================================================
// Base32 (RFC 4648 alphabet, no padding)
// ============================================================

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

/// Decode unpadded Base32. Trailing `=` is tolerated; leftover bits must be zero.
pub fn base32_decode(text: &str) -> Option<Vec<u8>> {
    let text = text.trim_end_matches('=');
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for c in text.bytes() {
        let v = match c {
            b'A'..=b'Z' => c - b'A',
            b'a'..=b'z' => c - b'a',
            b'2'..=b'7' => c - b'2' + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | v as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    // A dangling group of 5+ bits can never come out of the encoder.
    if bits >= 5 || buffer != 0 {
        return None;
    }
    Some(out)
}

// ============================================================
// 1-byte-per-character mapping for binary QR segments
// ============================================================

/// Map every byte to the code point of the same value (ISO-8859-1).
pub fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Inverse of [`latin1_string`]; `None` if any char is above U+00FF.
pub fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(c as u32).ok())
        .collect()
}
