// Recovery phrase QR forms:

// * standard digit form (4 digits per word)
// * compact entropy form, bare or inside a byte-mode segment
// * agreement with the reference word list implementation

#[cfg(test)]
mod tests {
    use airgap_qr_core::detect::ScannedFrame;
    use airgap_qr_core::seed::{
        decode_seed_frame, decode_standard, encode_compact, encode_standard, SeedError, SeedPhrase,
    };
    use proptest::prelude::*;

    fn byte_mode_segment(data: &[u8]) -> Vec<u8> {
        let len = data.len() as u8;
        let mut raw = vec![0x40 | (len >> 4)];
        let mut carry = len & 0x0F;
        for &b in data {
            raw.push((carry << 4) | (b >> 4));
            carry = b & 0x0F;
        }
        raw.push(carry << 4);
        raw.extend_from_slice(&[0xEC, 0x11]);
        raw
    }

    fn entropy() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            prop::collection::vec(any::<u8>(), 16),
            prop::collection::vec(any::<u8>(), 32),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_standard_form_roundtrip(entropy in entropy()) {
            let phrase = SeedPhrase::from_entropy(&entropy).unwrap();
            let digits = encode_standard(&phrase);
            prop_assert_eq!(digits.len(), phrase.word_count() * 4);

            let text = ScannedFrame::Text(digits.to_string());
            prop_assert_eq!(decode_seed_frame(&text), Some(phrase.clone()));
            let binary = ScannedFrame::Binary(digits.as_bytes().to_vec());
            prop_assert_eq!(decode_seed_frame(&binary), Some(phrase));
        }

        #[test]
        fn prop_compact_form_roundtrip(entropy in entropy()) {
            let phrase = SeedPhrase::from_entropy(&entropy).unwrap();
            let compact = encode_compact(&phrase);
            prop_assert_eq!(compact.as_slice(), entropy.as_slice());

            let bare = ScannedFrame::Binary(compact.to_vec());
            prop_assert_eq!(decode_seed_frame(&bare), Some(phrase.clone()));
            let wrapped = ScannedFrame::Binary(byte_mode_segment(&compact));
            prop_assert_eq!(decode_seed_frame(&wrapped), Some(phrase));
        }

        #[test]
        fn prop_words_match_reference_list(entropy in entropy()) {
            let phrase = SeedPhrase::from_entropy(&entropy).unwrap();
            let reference = bip39::Mnemonic::from_entropy(&entropy).unwrap().to_string();
            let words = phrase.phrase();
            prop_assert_eq!(words.as_str(), reference.as_str());
            prop_assert_eq!(SeedPhrase::from_phrase(&reference).unwrap(), phrase);
        }
    }

    #[test]
    fn twelve_and_twenty_four_words() {
        let twelve = SeedPhrase::from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(twelve.word_count(), 12);
        assert_eq!(&*encode_standard(&twelve), "000000000000000000000000000000000000000000000003");

        let twenty_four = SeedPhrase::from_entropy(&[0u8; 32]).unwrap();
        assert_eq!(twenty_four.word_count(), 24);
        assert_eq!(twenty_four.words().last().copied(), Some("art"));
    }

    #[test]
    fn broken_checksum_is_rejected() {
        // "abandon" x12 needs "about" (0003) as its last word
        let digits = "000000000000000000000000000000000000000000000004";
        assert_eq!(decode_standard(digits), Err(SeedError::Checksum));
        assert_eq!(decode_seed_frame(&ScannedFrame::Text(digits.into())), None);
    }

    #[test]
    fn unrelated_frames_are_not_seeds() {
        assert_eq!(decode_seed_frame(&ScannedFrame::Text("ur:psbt/aeae".into())), None);
        assert_eq!(decode_seed_frame(&ScannedFrame::Binary(vec![1, 2, 3])), None);
        assert_eq!(decode_seed_frame(&ScannedFrame::Text("9".repeat(48))), None);
    }
}
