//! # repopack-domain
//!
//! Domain entities and pure logic for packing repositories.
//!
//! This crate contains the core domain model with no infrastructure dependencies:
//!
//! - **Patterns** - the default ignore catalog and ordered `IgnorePatterns`
//! - **Sanitize** - `SanitizeOptions`, `SanitizedFile`, `FileOutcome`
//! - **Transform** - empty-line removal, trimming, and line numbering
//!
//! Nothing here touches the filesystem; the app layer feeds these types
//! through ports.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod patterns;
pub mod sanitize;
pub mod transform;

pub use patterns::{
    DEFAULT_IGNORE_LIST, DEFAULT_OUTPUT_FILE_NAME, GITIGNORE_FILE_NAME, IgnorePatterns, IgnoreSettings,
    PatternSource, REPOPACK_IGNORE_FILE_NAME,
};
pub use sanitize::{FileOutcome, FileProcessingError, SanitizeOptions, SanitizedFile, SkipReason};
pub use transform::{
    LINE_NUMBER_SEPARATOR, TransformError, add_line_numbers, remove_empty_lines, transform,
    validate_options,
};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_file_is_in_the_catalog() {
        assert!(DEFAULT_IGNORE_LIST.contains(&DEFAULT_OUTPUT_FILE_NAME));
        assert!(!domain_crate_version().is_empty());
    }
}
