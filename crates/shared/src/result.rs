//! Result helpers for shared error handling.

use crate::errors::ErrorEnvelope;

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Extension helpers for attaching diagnostic context to envelope results.
pub trait ResultExt<T> {
    /// Attach a metadata entry to the error, preserving the success value.
    fn with_metadata(self, key: &str, value: impl Into<String>) -> Result<T>;

    /// Attach a metadata entry computed lazily (only on the error path).
    fn with_metadata_lazy<F>(self, key: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_metadata(self, key: &str, value: impl Into<String>) -> Result<T> {
        self.map_err(|error| error.with_metadata(key, value))
    }

    fn with_metadata_lazy<F>(self, key: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|error| error.with_metadata(key, op()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCode, ErrorEnvelope};

    #[test]
    fn with_metadata_tags_errors() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let tagged = value.with_metadata("path", "src/lib.rs");

        let error = tagged.err();
        assert_eq!(
            error.as_ref().and_then(|error| error.metadata_value("path")),
            Some("src/lib.rs")
        );
    }

    #[test]
    fn with_metadata_lazy_skips_success() {
        let value: Result<i32> = Ok(2);
        let mut called = false;
        let tagged = value.with_metadata_lazy("path", || {
            called = true;
            "unused".to_string()
        });

        assert!(matches!(tagged, Ok(2)));
        assert!(!called);
    }
}
