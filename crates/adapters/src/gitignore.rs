//! Gitignore-semantics pattern compiler backed by the `ignore` crate.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use repopack_ports::{
    IgnoreCompilation, IgnoreCompilerPort, IgnorePatterns, IgnorePredicate, RejectedPattern,
};
use std::path::Path;
use std::sync::Arc;

/// Compiles ordered patterns with full gitignore semantics: `*`, `**`,
/// trailing `/`, `!` negation, and anchoring. The last matching pattern wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitignoreCompiler;

impl GitignoreCompiler {
    /// Build a compiler.
    pub const fn new() -> Self {
        Self
    }
}

impl IgnoreCompilerPort for GitignoreCompiler {
    fn compile(&self, patterns: &IgnorePatterns) -> IgnoreCompilation {
        // Paths are matched relative to the repository root, so the builder
        // root is `.` and nothing gets stripped from candidates.
        let mut builder = GitignoreBuilder::new(".");
        let mut rejected = Vec::new();

        for pattern in patterns.iter() {
            if let Err(error) = builder.add_line(None, pattern) {
                rejected.push(RejectedPattern {
                    pattern: pattern.into(),
                    reason: error.to_string().into_boxed_str(),
                });
            }
        }

        let matcher = match builder.build() {
            Ok(matcher) => matcher,
            Err(error) => {
                rejected.push(RejectedPattern {
                    pattern: "(pattern set)".into(),
                    reason: format!("pattern set failed to build: {error}").into_boxed_str(),
                });
                Gitignore::empty()
            },
        };

        IgnoreCompilation {
            predicate: Arc::new(GitignorePredicate { matcher }),
            rejected,
        }
    }
}

/// Compiled predicate. A path is excluded when it, or any parent directory,
/// resolves to an ignore match.
#[derive(Debug, Clone)]
pub struct GitignorePredicate {
    matcher: Gitignore,
}

impl GitignorePredicate {
    /// Number of patterns that compiled.
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    /// Returns true when no pattern compiled.
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}

impl IgnorePredicate for GitignorePredicate {
    fn is_entry_included(&self, relative_path: &str, is_dir: bool) -> bool {
        let normalized = normalize_candidate(relative_path);
        if normalized.is_empty() {
            return true;
        }
        !self
            .matcher
            .matched_path_or_any_parents(Path::new(&normalized), is_dir)
            .is_ignore()
    }
}

fn normalize_candidate(relative_path: &str) -> String {
    let replaced = relative_path.replace('\\', "/");
    let trimmed = replaced.trim_start_matches("./").trim_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_owned()
    }
}
