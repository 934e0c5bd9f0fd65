//! Base58Check for extended public keys.

use sha2::{Digest, Sha256};

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
pub const TPUB_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

pub fn encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // base-256 to base-58, little-endian digits
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for d in digits.iter_mut() {
            carry += (*d as u32) << 8;
            *d = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// `data` followed by the first four bytes of its double SHA-256.
pub fn encode_check(data: &[u8]) -> String {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut payload = Vec::with_capacity(data.len() + 4);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&digest[..4]);
    encode(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zeros_become_ones() {
        assert_eq!(encode(&[0, 0, 1]), "112");
        assert_eq!(encode(b""), "");
        assert_eq!(encode(&[0xFF]), "5Q");
    }
}
