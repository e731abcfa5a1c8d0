//! Sanitization options, records, and per-file outcomes.

use repopack_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only view of the output options that drive the transform pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOptions {
    /// Reserved stage. Requesting it always fails.
    pub remove_comments: bool,
    /// Drop lines that are blank after trimming.
    pub remove_empty_lines: bool,
    /// Prefix lines with right-aligned line numbers.
    pub show_line_numbers: bool,
}

/// A successfully sanitized file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedFile {
    /// Path relative to the repository root.
    pub path: Box<str>,
    /// Final, non-empty content.
    pub content: Box<str>,
}

/// Failure while processing a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error processing file {path}: {cause}")]
pub struct FileProcessingError {
    /// Path relative to the repository root.
    pub path: Box<str>,
    /// Original cause.
    #[source]
    pub cause: ErrorEnvelope,
}

impl FileProcessingError {
    /// Wrap a cause with the offending path.
    pub fn new(path: impl Into<Box<str>>, cause: impl Into<ErrorEnvelope>) -> Self {
        Self {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

impl From<FileProcessingError> for ErrorEnvelope {
    fn from(error: FileProcessingError) -> Self {
        let message = error.to_string();
        let FileProcessingError { path, cause } = error;
        Self {
            kind: cause.kind,
            class: cause.class,
            code: ErrorCode::new("sanitize", "file_processing"),
            message,
            metadata: cause.metadata,
        }
        .with_metadata("path", path)
        .with_metadata("cause", cause.code.to_string())
    }
}

/// Why a candidate produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Classified as binary; never decoded.
    Binary,
    /// Content was empty after trimming.
    Empty,
}

/// Result of running the pipeline on one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Sanitized record to include in the output.
    Included(SanitizedFile),
    /// Binary file, skipped by policy.
    SkippedBinary {
        /// Path relative to the repository root.
        path: Box<str>,
    },
    /// Empty after trimming, skipped by policy.
    SkippedEmpty {
        /// Path relative to the repository root.
        path: Box<str>,
    },
    /// Processing failed.
    Failed(FileProcessingError),
}

impl FileOutcome {
    /// Path of the candidate this outcome belongs to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Included(file) => &file.path,
            Self::SkippedBinary { path } | Self::SkippedEmpty { path } => path,
            Self::Failed(error) => &error.path,
        }
    }

    /// Skip reason, when the candidate was skipped.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::SkippedBinary { .. } => Some(SkipReason::Binary),
            Self::SkippedEmpty { .. } => Some(SkipReason::Empty),
            Self::Included(_) | Self::Failed(_) => None,
        }
    }

    /// Convert into the record-or-error shape used by aborting batches.
    pub fn into_result(self) -> Result<Option<SanitizedFile>, FileProcessingError> {
        match self {
            Self::Included(file) => Ok(Some(file)),
            Self::SkippedBinary { .. } | Self::SkippedEmpty { .. } => Ok(None),
            Self::Failed(error) => Err(error),
        }
    }
}
