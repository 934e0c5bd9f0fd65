//! 11-bit word index packing.

use sha2::{Digest, Sha256};

use crate::constants::BITS_PER_WORD;

/// Pack indices MSB first; the last byte is zero-filled.
pub fn pack_indices(indices: &[u16]) -> Vec<u8> {
    let total_bits = indices.len() * BITS_PER_WORD;
    let mut out = vec![0u8; total_bits.div_ceil(8)];
    for (w, &index) in indices.iter().enumerate() {
        for b in 0..BITS_PER_WORD {
            if (index >> (BITS_PER_WORD - 1 - b)) & 1 == 1 {
                let pos = w * BITS_PER_WORD + b;
                out[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    out
}

/// Read `count` 11-bit indices MSB first. `bits` must hold `count * 11` bits.
pub fn unpack_indices(bits: &[u8], count: usize) -> Vec<u16> {
    (0..count)
        .map(|w| {
            (0..BITS_PER_WORD).fold(0u16, |acc, b| {
                let pos = w * BITS_PER_WORD + b;
                let bit = bits.get(pos / 8).map_or(0, |byte| (byte >> (7 - pos % 8)) & 1);
                (acc << 1) | bit as u16
            })
        })
        .collect()
}

/// Leading `entropy.len() / 4` bits of SHA-256, left-aligned in one byte.
pub fn checksum_byte(entropy: &[u8]) -> u8 {
    let checksum_bits = entropy.len() / 4;
    let digest = Sha256::digest(entropy);
    digest[0] & (0xFFu8 << (8 - checksum_bits))
}
