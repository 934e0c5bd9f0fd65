use std::fmt;

use bip39::Language;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::WORDLIST_LEN;
use crate::seed::bits::{checksum_byte, pack_indices, unpack_indices};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("expected 12 or 24 words, got {0}")]
    WordCount(usize),

    #[error("word {position} is not in the word list")]
    UnknownWord { position: usize },

    #[error("word index {0} outside 0..2048")]
    IndexOutOfRange(u32),

    #[error("standard form must be 48 or 96 digits, got {0} characters")]
    DigitLength(usize),

    #[error("standard form contains a non-digit character")]
    NonDigit,

    #[error("compact form must be 16 or 32 bytes, got {0}")]
    EntropyLength(usize),

    #[error("recovery phrase checksum does not match")]
    Checksum,
}

/// Word indices of a 12- or 24-word recovery phrase, checksum verified.
///
/// Indices are wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase {
    indices: Vec<u16>,
}

impl Drop for SeedPhrase {
    fn drop(&mut self) {
        self.indices.zeroize();
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedPhrase")
            .field("words", &self.indices.len())
            .finish_non_exhaustive()
    }
}

impl SeedPhrase {
    /// Validates count, range and the embedded checksum.
    pub fn from_indices(indices: Vec<u16>) -> Result<Self, SeedError> {
        if indices.len() != 12 && indices.len() != 24 {
            return Err(SeedError::WordCount(indices.len()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= WORDLIST_LEN) {
            return Err(SeedError::IndexOutOfRange(bad as u32));
        }
        let phrase = Self { indices };
        let packed = Zeroizing::new(pack_indices(&phrase.indices));
        let entropy_len = phrase.entropy_len();
        let checksum_bits = entropy_len / 4;
        let carried = packed[entropy_len] & (0xFFu8 << (8 - checksum_bits));
        if carried != checksum_byte(&packed[..entropy_len]) {
            return Err(SeedError::Checksum);
        }
        Ok(phrase)
    }

    /// Build from raw entropy, appending the recomputed checksum.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, SeedError> {
        if entropy.len() != 16 && entropy.len() != 32 {
            return Err(SeedError::EntropyLength(entropy.len()));
        }
        let mut bits = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
        bits.extend_from_slice(entropy);
        bits.push(checksum_byte(entropy));
        let count = entropy.len() * 8 * 33 / 32 / 11;
        Self::from_indices(unpack_indices(&bits, count))
    }

    /// Parse space-separated English words.
    pub fn from_phrase(phrase: &str) -> Result<Self, SeedError> {
        let indices = phrase
            .split_whitespace()
            .enumerate()
            .map(|(position, word)| {
                Language::English
                    .find_word(&word.to_lowercase())
                    .ok_or(SeedError::UnknownWord { position })
            })
            .collect::<Result<Vec<u16>, _>>()?;
        Self::from_indices(indices)
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// 16 bytes for 12 words, 32 for 24.
    #[inline]
    pub fn entropy_len(&self) -> usize {
        self.indices.len() * 11 * 32 / 33 / 8
    }

    pub fn entropy(&self) -> Zeroizing<Vec<u8>> {
        let mut packed = Zeroizing::new(pack_indices(&self.indices));
        packed.truncate(self.entropy_len());
        packed
    }

    pub fn words(&self) -> Vec<&'static str> {
        let list = Language::English.word_list();
        self.indices.iter().map(|&i| list[i as usize]).collect()
    }

    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn known_phrase_round_trips_through_entropy() {
        let phrase = SeedPhrase::from_phrase(ABANDON_ABOUT).unwrap();
        assert_eq!(phrase.word_count(), 12);
        assert_eq!(phrase.indices()[11], 3);
        assert_eq!(phrase.entropy().as_slice(), &[0u8; 16]);
        assert_eq!(SeedPhrase::from_entropy(&[0u8; 16]).unwrap(), phrase);
        assert_eq!(phrase.phrase().as_str(), ABANDON_ABOUT);
    }

    #[test]
    fn bad_checksum_and_counts() {
        let wrong = ABANDON_ABOUT.replace("about", "abandon");
        assert_eq!(SeedPhrase::from_phrase(&wrong), Err(SeedError::Checksum));
        assert_eq!(SeedPhrase::from_phrase("abandon about"), Err(SeedError::WordCount(2)));
        assert!(matches!(
            SeedPhrase::from_phrase("abandon notaword"),
            Err(SeedError::UnknownWord { position: 1 })
        ));
        assert_eq!(SeedPhrase::from_indices(vec![2048; 12]), Err(SeedError::IndexOutOfRange(2048)));
    }

    #[test]
    fn debug_never_shows_words() {
        let phrase = SeedPhrase::from_phrase(ABANDON_ABOUT).unwrap();
        assert!(!format!("{phrase:?}").contains("abandon"));
    }
}
