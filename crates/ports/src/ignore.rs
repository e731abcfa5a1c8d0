//! Ignore matcher boundary contract.

use repopack_domain::IgnorePatterns;
use std::fmt;
use std::sync::Arc;

/// Compiled path-inclusion predicate.
///
/// Implementations are stateless after compilation and safe to share across
/// threads.
pub trait IgnorePredicate: Send + Sync + fmt::Debug {
    /// Returns true when the entry should be included. `is_dir` enables
    /// directory-only patterns (trailing `/`).
    fn is_entry_included(&self, relative_path: &str, is_dir: bool) -> bool;

    /// Returns true when the file path should be included.
    fn is_included(&self, relative_path: &str) -> bool {
        self.is_entry_included(relative_path, false)
    }
}

/// A pattern the compiler could not parse. It is left out of the predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    /// Raw pattern text.
    pub pattern: Box<str>,
    /// Parser message.
    pub reason: Box<str>,
}

/// Output of compiling an ordered pattern list.
#[derive(Debug, Clone)]
pub struct IgnoreCompilation {
    /// Compiled predicate.
    pub predicate: Arc<dyn IgnorePredicate>,
    /// Patterns skipped because they failed to parse.
    pub rejected: Vec<RejectedPattern>,
}

/// Boundary contract for compiling gitignore-style patterns.
pub trait IgnoreCompilerPort: Send + Sync {
    /// Compile patterns into a predicate. Later patterns take precedence.
    fn compile(&self, patterns: &IgnorePatterns) -> IgnoreCompilation;
}
