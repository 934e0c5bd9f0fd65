//! Descriptor checksum: eight characters after `#`, a BCH code over the
//! descriptor's character classes.

const INPUT_CHARSET: &str =
    "0123456789()[],'/*abcdefgh@:$%{}IJKLMNOPQRSTUVWXYZ&+-.;<=>?!^_|~ijklmnopqrstuvwxyzABCDEFGH`#\"\\ ";
const CHECKSUM_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u64; 5] = [0xf5dee51989, 0xa9fdca3312, 0x1bab10e32d, 0x3706b1677a, 0x644d626ffd];

fn polymod(symbols: impl IntoIterator<Item = u64>) -> u64 {
    let mut chk = 1u64;
    for value in symbols {
        let top = chk >> 35;
        chk = ((chk & 0x7_ffff_ffff) << 5) ^ value;
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn expand(desc: &str) -> Option<Vec<u64>> {
    let mut symbols = Vec::with_capacity(desc.len() + desc.len() / 3 + 9);
    let mut groups = Vec::with_capacity(3);
    for c in desc.chars() {
        let v = INPUT_CHARSET.find(c)? as u64;
        symbols.push(v & 31);
        groups.push(v >> 5);
        if groups.len() == 3 {
            symbols.push(groups[0] * 9 + groups[1] * 3 + groups[2]);
            groups.clear();
        }
    }
    match groups.as_slice() {
        [a] => symbols.push(*a),
        [a, b] => symbols.push(a * 3 + b),
        _ => {}
    }
    Some(symbols)
}

/// Checksum of a descriptor without its `#` suffix. `None` for characters
/// outside the descriptor alphabet.
pub fn descriptor_checksum(desc: &str) -> Option<String> {
    let mut symbols = expand(desc)?;
    symbols.extend([0u64; 8]);
    let chk = polymod(symbols) ^ 1;
    Some(
        (0..8)
            .map(|i| CHECKSUM_CHARSET[((chk >> (5 * (7 - i))) & 31) as usize] as char)
            .collect(),
    )
}

/// `desc#checksum`; a descriptor that already carries a suffix is returned
/// unchanged.
pub fn add_checksum(desc: &str) -> Option<String> {
    if desc.contains('#') {
        return Some(desc.to_string());
    }
    Some(format!("{desc}#{}", descriptor_checksum(desc)?))
}

pub fn verify_checksum(desc_with_checksum: &str) -> bool {
    match desc_with_checksum.rsplit_once('#') {
        Some((desc, sum)) => descriptor_checksum(desc).is_some_and(|c| c == sum),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_checksum() {
        assert_eq!(descriptor_checksum("raw(deadbeef)").as_deref(), Some("89f8spxm"));
        assert!(verify_checksum("raw(deadbeef)#89f8spxm"));
        assert!(!verify_checksum("raw(deadbeef)#89f8spxn"));
    }

    #[test]
    fn existing_suffix_is_kept_and_bad_chars_rejected() {
        assert_eq!(add_checksum("raw(deadbeef)#89f8spxm").as_deref(), Some("raw(deadbeef)#89f8spxm"));
        assert_eq!(descriptor_checksum("raw(é)"), None);
    }
}
