//! Error envelope shared by every crate in the workspace.
//!
//! Failures carry a stable [`ErrorCode`] (`namespace:code`), a kind that
//! says who is at fault, and string metadata such as the offending path or
//! env var. The CLI maps kinds and codes onto exit codes.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::{fmt, io};

/// Metadata attached to errors for diagnostics.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Namespace of the built-in codes.
pub const CORE_NAMESPACE: &str = "core";

/// Who is at fault for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad input or configuration, or an unsupported option.
    Expected,
    /// A broken internal invariant.
    Invariant,
    /// The environment failed underneath us (filesystem, OS).
    Unexpected,
}

impl ErrorKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Expected => "expected",
            Self::Invariant => "invariant",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Whether repeating the operation may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// A retry may succeed (interrupted or timed-out I/O).
    Retriable,
    /// A retry will fail the same way.
    NonRetriable,
}

impl ErrorClass {
    /// Returns true when a retry may succeed.
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        matches!(self, Self::Retriable)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Retriable => "retriable",
            Self::NonRetriable => "non-retriable",
        })
    }
}

/// Stable `namespace:code` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: Cow<'static, str>,
    code: Cow<'static, str>,
}

impl ErrorCode {
    /// Create a code in any namespace (`config`, `sanitize`, `encoding`, ...).
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        code: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    const fn core(code: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(CORE_NAMESPACE),
            code: Cow::Borrowed(code),
        }
    }

    /// `core:invalid_input`
    #[must_use]
    pub const fn invalid_input() -> Self {
        Self::core("invalid_input")
    }

    /// `core:invalid_data` (malformed bytes, undecodable content).
    #[must_use]
    pub const fn invalid_data() -> Self {
        Self::core("invalid_data")
    }

    /// `core:not_found`
    #[must_use]
    pub const fn not_found() -> Self {
        Self::core("not_found")
    }

    /// `core:permission_denied`
    #[must_use]
    pub const fn permission_denied() -> Self {
        Self::core("permission_denied")
    }

    /// `core:io`, any other filesystem failure.
    #[must_use]
    pub const fn io() -> Self {
        Self::core("io")
    }

    /// `core:internal`
    #[must_use]
    pub const fn internal() -> Self {
        Self::core("internal")
    }

    /// Returns the namespace portion.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the code identifier.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// True for the codes produced from `io::Error`.
    #[must_use]
    pub fn is_filesystem(&self) -> bool {
        self.namespace == CORE_NAMESPACE
            && matches!(
                &*self.code,
                "io" | "not_found" | "permission_denied" | "invalid_data"
            )
    }

    fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::not_found(),
            io::ErrorKind::PermissionDenied => Self::permission_denied(),
            io::ErrorKind::InvalidData => Self::invalid_data(),
            _ => Self::io(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured failure passed across crate boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Who is at fault.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Additional diagnostic metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    fn with_kind(kind: ErrorKind, class: ErrorClass, code: ErrorCode, message: String) -> Self {
        Self {
            kind,
            class,
            code,
            message,
            metadata: BTreeMap::new(),
        }
    }

    /// An expected, non-retriable failure.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Expected, ErrorClass::NonRetriable, code, message.into())
    }

    /// An invariant violation (never retriable).
    pub fn invariant(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Invariant, ErrorClass::NonRetriable, code, message.into())
    }

    /// An environment failure with an explicit retry classification.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self::with_kind(ErrorKind::Unexpected, class, code, message.into())
    }

    /// An `io::Error` tagged with the path it happened on.
    #[must_use]
    pub fn io_at(error: io::Error, path: &Path) -> Self {
        Self::from(error).with_metadata("path", path.to_string_lossy())
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata value by key.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// True when the filesystem, not the caller, failed.
    #[must_use]
    pub fn is_filesystem_failure(&self) -> bool {
        self.kind == ErrorKind::Unexpected && self.code.is_filesystem()
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind, self.class, self.code, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {}

impl From<io::Error> for ErrorEnvelope {
    fn from(error: io::Error) -> Self {
        let kind = error.kind();
        let class = if matches!(
            kind,
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
        ) {
            ErrorClass::Retriable
        } else {
            ErrorClass::NonRetriable
        };
        Self::unexpected(ErrorCode::from_io_kind(kind), error.to_string(), class)
    }
}
