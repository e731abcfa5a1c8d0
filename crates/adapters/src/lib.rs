//! # repopack-adapters
//!
//! Adapter implementations for ports: local filesystem, gitignore compiler,
//! encoding detection, and structured loggers.
//! This crate depends on `ports` and `shared`.

pub mod encoding;
pub mod fs;
pub mod gitignore;
pub mod log_sink;
pub mod logger;
pub mod tracing_logger;

pub use encoding::ChardetEncoding;
pub use fs::LocalFileSystem;
pub use gitignore::{GitignoreCompiler, GitignorePredicate};
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use tracing_logger::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
