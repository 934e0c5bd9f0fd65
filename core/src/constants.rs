/// Fountain scheme prefix ("Uniform Resource").
pub const UR_SCHEME: &str = "ur:";

/// Fountain type tags.
pub mod ur_types {
    pub const CRYPTO_PSBT: &str = "crypto-psbt";
    pub const PSBT: &str = "psbt";
    pub const CRYPTO_OUTPUT: &str = "crypto-output";
    pub const OUTPUT_DESCRIPTOR: &str = "output-descriptor";
    pub const BYTES: &str = "bytes";
}

/// Segmented-Base32 (BBQr) magic.
pub const BBQR_MAGIC: &str = "B$";
/// Magic + encoding + type + total(2) + part(2).
pub const BBQR_HEADER_LEN: usize = 8;
/// Two base-36 digits.
pub const BBQR_MAX_PARTS: usize = 36 * 36 - 1;

/// Simple convention marker: `p<part>/<total> <chunk>`.
pub const SIMPLE_MARKER: char = 'p';
pub const SIMPLE_SEPARATOR: char = ' ';

/// Fountain fragment limits per density: (max, min) bytes.
pub const FRAGMENT_LIMITS_LOW: (usize, usize) = (60, 10);
pub const FRAGMENT_LIMITS_MEDIUM: (usize, usize) = (200, 10);
pub const FRAGMENT_LIMITS_HIGH: (usize, usize) = (400, 10);

/// Segmented frame capacity per density, in characters (multiples of 8).
pub const SEGMENT_CHARS_LOW: usize = 200;
pub const SEGMENT_CHARS_MEDIUM: usize = 480;
pub const SEGMENT_CHARS_HIGH: usize = 960;

/// Extra mixed parts emitted on top of the pure ones, in percent.
pub const DEFAULT_REDUNDANCY_PERCENT: u32 = 100;

/// Default raster side in pixels.
pub const DEFAULT_RENDER_SIZE: u32 = 512;
pub const DEFAULT_FOREGROUND: u32 = 0xFF00_0000;
pub const DEFAULT_BACKGROUND: u32 = 0xFFFF_FFFF;

/// Recovery phrase geometry.
pub const BITS_PER_WORD: usize = 11;
pub const WORDLIST_LEN: usize = 2048;
pub const STANDARD_DIGITS_PER_WORD: usize = 4;
