//! Encoding detection via `chardetng` and strict decoding via `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use repopack_ports::{EncodingDetectorPort, EncodingGuess, TextDecoderPort};
use repopack_shared::{ErrorCode, ErrorEnvelope, Result};

/// Statistical detector plus label-driven decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChardetEncoding;

impl ChardetEncoding {
    /// Build the adapter.
    pub const fn new() -> Self {
        Self
    }
}

impl EncodingDetectorPort for ChardetEncoding {
    fn detect(&self, bytes: &[u8]) -> Option<EncodingGuess> {
        if bytes.is_empty() {
            return None;
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let (encoding, confident) = detector.guess_assess(None, true);

        Some(EncodingGuess {
            label: encoding.name().to_ascii_lowercase().into_boxed_str(),
            confident,
        })
    }
}

impl TextDecoderPort for ChardetEncoding {
    /// A leading byte order mark overrides `label` and is dropped.
    fn decode(&self, bytes: &[u8], label: &str) -> Result<String> {
        let (encoding, body) = match Encoding::for_bom(bytes) {
            Some((encoding, bom_length)) => {
                (encoding, bytes.get(bom_length..).unwrap_or_default())
            },
            None => (labelled_encoding(label)?, bytes),
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(std::borrow::Cow::into_owned)
            .ok_or_else(|| {
                ErrorEnvelope::expected(
                    decode_failed_code(),
                    format!("content is not valid {}", encoding.name()),
                )
                .with_metadata("encoding", encoding.name())
            })
    }
}

fn labelled_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        ErrorEnvelope::expected(
            decode_failed_code(),
            format!("unknown encoding label: {label}"),
        )
        .with_metadata("encoding", label)
    })
}

fn decode_failed_code() -> ErrorCode {
    ErrorCode::new("encoding", "decode_failed")
}
