use std::fmt::Write;

use zeroize::Zeroizing;

use crate::seed::types::SeedPhrase;

/// Four zero-padded digits per word: 48 or 96 characters.
pub fn encode_standard(phrase: &SeedPhrase) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::with_capacity(phrase.word_count() * 4));
    for index in phrase.indices() {
        // writing into a String cannot fail
        let _ = write!(out, "{index:04}");
    }
    out
}

/// Entropy bytes with the checksum bits dropped: 16 or 32 bytes.
pub fn encode_compact(phrase: &SeedPhrase) -> Zeroizing<Vec<u8>> {
    phrase.entropy()
}
