//! Text encoding detection and decoding contracts.

use repopack_shared::Result;

/// Label used when detection yields no confident guess.
pub const DEFAULT_ENCODING_LABEL: &str = "utf-8";

/// Best-guess encoding for a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingGuess {
    /// WHATWG encoding label (e.g. `utf-8`, `windows-1252`).
    pub label: Box<str>,
    /// Whether the detector considers the guess reliable.
    pub confident: bool,
}

impl EncodingGuess {
    /// Label to decode with: the guess when confident, otherwise UTF-8.
    #[must_use]
    pub fn effective_label(guess: Option<&Self>) -> &str {
        match guess {
            Some(guess) if guess.confident => &guess.label,
            _ => DEFAULT_ENCODING_LABEL,
        }
    }
}

/// Statistical encoding detector.
pub trait EncodingDetectorPort: Send + Sync {
    /// Guess the encoding of `bytes`. `None` means no result at all.
    fn detect(&self, bytes: &[u8]) -> Option<EncodingGuess>;
}

/// Decoder parameterized by an encoding label.
pub trait TextDecoderPort: Send + Sync {
    /// Decode `bytes` with `label`. Malformed input fails; it is never
    /// replaced or truncated.
    fn decode(&self, bytes: &[u8], label: &str) -> Result<String>;
}
