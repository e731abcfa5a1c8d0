//! # repopack-shared
//!
//! The error envelope every repopack crate returns, and the `Result` alias
//! built on it. Depends on `serde` only, so the envelope can be written to
//! JSON logs and CLI output unchanged.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod result;

pub use errors::{CORE_NAMESPACE, ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use result::{Result, ResultExt};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_code_and_metadata() {
        let error = ErrorEnvelope::expected(ErrorCode::new("config", "empty_value"), "empty")
            .with_metadata("field", "filePath");

        assert_eq!(error.code.namespace(), "config");
        assert_eq!(error.metadata_value("field"), Some("filePath"));
        assert!(!shared_crate_version().is_empty());
    }

    #[test]
    fn result_alias_defaults_to_envelope() {
        let value: Result<u8> = Ok(5);
        assert!(matches!(value.with_metadata("field", "name"), Ok(5)));
    }
}
