//! ur/bytewords.rs
//! Bytewords, minimal style: two letters per byte plus a 4-byte CRC-32.

use std::sync::OnceLock;

use crate::ur::types::UrError;
use crate::utils::compute_checksum;

const WORDS: [&str; 256] = [
    "able", "acid", "also", "apex", "aqua", "arch", "atom", "aunt", "away", "axis",
    "back", "bald", "barn", "belt", "beta", "bias", "blue", "body", "brag", "brew",
    "bulb", "buzz", "calm", "cash", "cats", "chef", "city", "claw", "code", "cola",
    "cook", "cost", "crux", "curl", "cusp", "cyan", "dark", "data", "days", "deli",
    "dice", "diet", "door", "down", "draw", "drop", "drum", "dull", "duty", "each",
    "easy", "echo", "edge", "epic", "even", "exam", "exit", "eyes", "fact", "fair",
    "fern", "figs", "film", "fish", "fizz", "flap", "flew", "flux", "foxy", "free",
    "frog", "fuel", "fund", "gala", "game", "gear", "gems", "gift", "girl", "glow",
    "good", "gray", "grim", "guru", "gush", "gyro", "half", "hang", "hard", "hawk",
    "heat", "help", "high", "hill", "holy", "hope", "horn", "huts", "iced", "idea",
    "idle", "inch", "inky", "into", "iris", "iron", "item", "jade", "jazz", "join",
    "jolt", "jowl", "judo", "jugs", "jump", "junk", "jury", "keep", "keno", "kept",
    "keys", "kick", "kiln", "king", "kite", "kiwi", "knob", "lamb", "lava", "lazy",
    "leaf", "legs", "liar", "limp", "lion", "list", "logo", "loud", "love", "luau",
    "luck", "lung", "main", "many", "math", "maze", "memo", "menu", "meow", "mild",
    "mint", "miss", "monk", "nail", "navy", "need", "news", "next", "noon", "note",
    "numb", "obey", "oboe", "omit", "onyx", "open", "oval", "owls", "paid", "part",
    "peck", "play", "plus", "poem", "pool", "pose", "puff", "puma", "purr", "quad",
    "quiz", "race", "ramp", "real", "redo", "rich", "road", "rock", "roof", "ruby",
    "ruin", "runs", "rust", "safe", "saga", "scar", "sets", "silk", "skew", "slot",
    "soap", "solo", "song", "stub", "surf", "swan", "taco", "task", "taxi", "tent",
    "tied", "time", "tiny", "toil", "tomb", "toys", "trip", "tuna", "twin", "ugly",
    "undo", "unit", "urge", "user", "vast", "very", "veto", "vial", "vibe", "view",
    "visa", "void", "vows", "wall", "wand", "warm", "wasp", "wave", "waxy", "webs",
    "what", "when", "whiz", "wolf", "work", "yank", "yawn", "yell", "yoga", "yurt",
    "zaps", "zero", "zest", "zinc", "zone", "zoom",
];

/// `(first - 'a') * 26 + (last - 'a')` → byte value, or -1.
fn minimal_table() -> &'static [i16; 26 * 26] {
    static TABLE: OnceLock<[i16; 26 * 26]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [-1i16; 26 * 26];
        for (value, word) in WORDS.iter().enumerate() {
            let w = word.as_bytes();
            let key = (w[0] - b'a') as usize * 26 + (w[3] - b'a') as usize;
            table[key] = value as i16;
        }
        table
    })
}

/// Encode `data` and its CRC-32 as minimal bytewords.
pub fn encode_minimal(data: &[u8]) -> String {
    let crc = compute_checksum(data).to_be_bytes();
    let mut out = String::with_capacity((data.len() + 4) * 2);
    for &b in data.iter().chain(crc.iter()) {
        let w = WORDS[b as usize].as_bytes();
        out.push(w[0] as char);
        out.push(w[3] as char);
    }
    out
}

/// Decode minimal bytewords (case-insensitive) and verify the trailing CRC-32.
pub fn decode_minimal(text: &str) -> Result<Vec<u8>, UrError> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(UrError::Bytewords("odd length".into()));
    }
    if bytes.len() < 10 {
        return Err(UrError::Bytewords("too short for body and checksum".into()));
    }

    let table = minimal_table();
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let (a, b) = (pair[0].to_ascii_lowercase(), pair[1].to_ascii_lowercase());
        if !a.is_ascii_lowercase() || !b.is_ascii_lowercase() {
            return Err(UrError::Bytewords(format!("invalid character in {:?}", pair)));
        }
        let value = table[(a - b'a') as usize * 26 + (b - b'a') as usize];
        if value < 0 {
            return Err(UrError::Bytewords(format!(
                "unknown word {}{}", a as char, b as char
            )));
        }
        out.push(value as u8);
    }

    let body_len = out.len() - 4;
    let expected = u32::from_be_bytes([out[body_len], out[body_len + 1], out[body_len + 2], out[body_len + 3]]);
    out.truncate(body_len);
    let actual = compute_checksum(&out);
    if expected != actual {
        return Err(UrError::Bytewords(format!(
            "checksum {:08x} != {:08x}", actual, expected
        )));
    }
    Ok(out)
}
