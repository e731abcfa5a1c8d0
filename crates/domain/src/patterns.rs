//! Ignore pattern catalog and ordered pattern lists.

use serde::{Deserialize, Serialize};

/// VCS ignore file read from the repository root.
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Tool-specific ignore file read from the repository root (always attempted).
pub const REPOPACK_IGNORE_FILE_NAME: &str = ".repopackignore";

/// Default output document name. Also part of the default ignore catalog.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "repopack-output.txt";

/// Built-in ignore catalog applied when `useDefaultPatterns` is enabled.
///
/// Entries are kept verbatim and in order, duplicates included.
pub static DEFAULT_IGNORE_LIST: &[&str] = &[
    // Version control
    ".git",
    ".gitignore",
    ".gitattributes",
    ".hg",
    ".hgignore",
    ".svn",
    // Dependency directories
    "node_modules",
    "bower_components",
    // Logs
    "logs",
    "*.log",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    // Runtime data
    "pids",
    "*.pid",
    "*.seed",
    "*.pid.lock",
    // Instrumented libs (jscoverage/JSCover)
    "lib-cov",
    // Coverage (istanbul)
    "coverage",
    // nyc
    ".nyc_output",
    // Grunt intermediate storage
    ".grunt",
    // Bower
    "bower_components",
    // node-waf
    ".lock-wscript",
    // Compiled binary addons
    "build/Release",
    // Dependency directories
    "jspm_packages/",
    // TypeScript v1 declaration files
    "typings/",
    // npm cache
    ".npm",
    // eslint cache
    ".eslintcache",
    // REPL history
    ".node_repl_history",
    // npm pack output
    "*.tgz",
    // Yarn
    ".yarn/*",
    ".yarn-integrity",
    // dotenv
    ".env",
    // next.js / nuxt.js / vuepress build output
    ".next",
    ".nuxt",
    ".vuepress/dist",
    // Serverless, FuseBox, DynamoDB Local
    ".serverless/",
    ".fusebox/",
    ".dynamodb/",
    // TypeScript output
    "dist",
    // OS metadata
    ".DS_Store",
    "Thumbs.db",
    // Editors
    ".idea",
    ".vscode",
    "*.swp",
    "*.swo",
    "*.swn",
    "*.bak",
    // Lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    // Build outputs
    "build",
    "out",
    // Temporary files
    "tmp",
    "temp",
    // repopack output
    DEFAULT_OUTPUT_FILE_NAME,
];

/// Where a group of patterns came from. Order of variants is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternSource {
    /// Built-in catalog.
    Defaults,
    /// `.gitignore` at the repository root.
    Gitignore,
    /// `.repopackignore` at the repository root.
    RepopackIgnore,
    /// Patterns from configuration or command-line flags.
    Custom,
}

impl PatternSource {
    /// Stable label used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Gitignore => "gitignore",
            Self::RepopackIgnore => "repopackignore",
            Self::Custom => "custom",
        }
    }
}

/// Switches that decide which pattern sources are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreSettings {
    /// Prepend [`DEFAULT_IGNORE_LIST`].
    pub use_default_patterns: bool,
    /// Read `.gitignore` from the repository root.
    pub use_gitignore: bool,
    /// Appended verbatim after every file-based source.
    pub custom_patterns: Vec<Box<str>>,
}

impl Default for IgnoreSettings {
    fn default() -> Self {
        Self {
            use_default_patterns: true,
            use_gitignore: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// Ordered sequence of raw gitignore-style patterns.
///
/// Later entries take precedence when the matcher resolves overlaps; entries
/// are never deduplicated or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnorePatterns {
    patterns: Vec<Box<str>>,
}

impl IgnorePatterns {
    /// Create an empty pattern list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append patterns in order.
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
    }

    /// Append the built-in default catalog.
    pub fn extend_defaults(&mut self) {
        self.extend(DEFAULT_IGNORE_LIST.iter().copied());
    }

    /// Iterate the patterns as string slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(AsRef::as_ref)
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true when no patterns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<S> FromIterator<S> for IgnorePatterns
where
    S: Into<Box<str>>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut patterns = Self::new();
        patterns.extend(iter);
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_contains_core_entries() {
        for entry in [".git", "node_modules", "dist", "build", "repopack-output.txt"] {
            assert!(
                DEFAULT_IGNORE_LIST.contains(&entry),
                "missing default entry: {entry}"
            );
        }
    }

    #[test]
    fn default_catalog_keeps_duplicates() {
        let bower = DEFAULT_IGNORE_LIST
            .iter()
            .filter(|entry| **entry == "bower_components")
            .count();
        assert_eq!(bower, 2);
    }

    #[test]
    fn patterns_preserve_insertion_order() {
        let mut patterns = IgnorePatterns::new();
        patterns.extend(["b.txt", "a.txt"]);
        patterns.extend(["b.txt"]);

        let collected: Vec<&str> = patterns.iter().collect();
        assert_eq!(collected, vec!["b.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn extend_defaults_appends_full_catalog() {
        let mut patterns: IgnorePatterns = ["custom"].into_iter().collect();
        patterns.extend_defaults();

        assert_eq!(patterns.len(), DEFAULT_IGNORE_LIST.len() + 1);
        assert_eq!(patterns.iter().next(), Some("custom"));
        assert_eq!(patterns.iter().last(), Some(DEFAULT_OUTPUT_FILE_NAME));
    }
}
