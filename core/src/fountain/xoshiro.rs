//! fountain/xoshiro.rs
//! xoshiro256** seeded from a SHA-256 digest.
//!
//! Encoder and decoder build one generator per part from
//! `BE32(seq_num) || BE32(checksum)`; there is no shared random state.

use byteorder::{BigEndian, ByteOrder};
use rand::RngCore;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// State words are the digest read as four big-endian u64.
    pub fn from_seed_bytes(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        let mut s = [0u64; 4];
        for (slot, chunk) in s.iter_mut().zip(digest.chunks_exact(8)) {
            *slot = BigEndian::read_u64(chunk);
        }
        Self { s }
    }

    /// Generator that selects the fragments of part `seq_num`.
    pub fn for_part(seq_num: u32, checksum: u32) -> Self {
        let mut seed = [0u8; 8];
        BigEndian::write_u32(&mut seed[0..4], seq_num);
        BigEndian::write_u32(&mut seed[4..8], checksum);
        Self::from_seed_bytes(&seed)
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        let result = self.s[1]
            .wrapping_mul(5)
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        self.next() as f64 / (u64::MAX as f64 + 1.0)
    }

    /// Uniform in `[low, high]`.
    #[inline]
    pub fn next_int(&mut self, low: u64, high: u64) -> u64 {
        (self.next_double() * (high - low + 1) as f64) as u64 + low
    }
}

impl RngCore for Xoshiro256 {
    fn next_u32(&mut self) -> u32 {
        (self.next() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
