//! fountain/fragments.rs
//! Fragment sizing, index-set bitsets and deterministic part selection.

use crate::fountain::sampler::{choose_degree, shuffled};
use crate::fountain::types::FountainError;
use crate::fountain::xoshiro::Xoshiro256;

/// Smallest even split of `message_len` whose fragments fit `max_fragment_len`.
///
/// The fragment count is searched from 1 up to `message_len / min_fragment_len`
/// (at least 1), so tiny messages collapse into a single fragment.
pub fn fragment_length(
    message_len: usize,
    min_fragment_len: usize,
    max_fragment_len: usize,
) -> Result<usize, FountainError> {
    if message_len == 0 {
        return Err(FountainError::EmptyMessage);
    }
    if min_fragment_len == 0 || min_fragment_len > max_fragment_len {
        return Err(FountainError::InvalidLimits { min: min_fragment_len, max: max_fragment_len });
    }

    let max_count = (message_len / min_fragment_len).max(1);
    let mut fragment_len = message_len;
    for count in 1..=max_count {
        fragment_len = message_len.div_ceil(count);
        if fragment_len <= max_fragment_len {
            break;
        }
    }
    Ok(fragment_len)
}

/// Zero-pad `message` to a whole number of fragments and slice it.
pub fn partition(message: &[u8], fragment_len: usize) -> Vec<Vec<u8>> {
    let count = message.len().div_ceil(fragment_len);
    let mut padded = message.to_vec();
    padded.resize(count * fragment_len, 0);
    padded.chunks(fragment_len).map(<[u8]>::to_vec).collect()
}

/// Byte-wise `dst ^= src` over the common prefix.
#[inline]
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Fragment indices covered by part `seq_num`.
///
/// Pure function of `(seq_num, seq_len, checksum)`: pure parts map to
/// `{seq_num - 1}`, later parts draw a degree and take that many indices
/// from a seeded shuffle.
pub fn choose_fragments(seq_num: u32, seq_len: u32, checksum: u32) -> FragmentSet {
    let n = seq_len as usize;
    if seq_num <= seq_len {
        return FragmentSet::from_indices(n, [(seq_num - 1) as usize]);
    }

    let mut rng = Xoshiro256::for_part(seq_num, checksum);
    let degree = choose_degree(n, &mut rng);
    let order = shuffled((0..n).collect(), &mut rng);
    FragmentSet::from_indices(n, order.into_iter().take(degree))
}

// ============================================================
// FragmentSet: fixed-width bitset over fragment indices
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentSet {
    words: Vec<u64>,
    width: usize,
}

impl FragmentSet {
    pub fn new(width: usize) -> Self {
        Self { words: vec![0; width.div_ceil(64)], width }
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(width: usize, indices: I) -> Self {
        let mut set = Self::new(width);
        for i in indices {
            set.insert(i);
        }
        set
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < self.width);
        self.words[index / 64] |= 1 << (index % 64);
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.width && self.words[index / 64] & (1 << (index % 64)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Lowest member.
    pub fn first(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }

    /// The only member, if there is exactly one.
    pub fn single(&self) -> Option<usize> {
        if self.len() == 1 { self.first() } else { None }
    }

    /// Symmetric difference in place.
    #[inline]
    pub fn xor_with(&mut self, other: &FragmentSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(move |&i| self.contains(i))
    }
}
