//! Ignore-pattern resolution: load pattern files, aggregate sources, compile.
//!
//! Aggregation order is fixed and later sources take precedence:
//! defaults, `.gitignore`, `.repopackignore`, then custom patterns.

use crate::diagnostics::{emit, emit_error};
use repopack_domain::{
    DEFAULT_IGNORE_LIST, GITIGNORE_FILE_NAME, IgnorePatterns, IgnoreSettings, PatternSource,
    REPOPACK_IGNORE_FILE_NAME,
};
use repopack_ports::{
    FileSystemPort, IgnoreCompilerPort, IgnorePredicate, LogLevel, LoggerPort, SafeRelativePath,
    log_field,
};
use repopack_shared::ErrorCode;
use std::path::Path;
use std::sync::Arc;

/// Dependencies for ignore-pattern resolution.
#[derive(Clone)]
pub struct IgnoreRulesDeps {
    /// Filesystem adapter used to read ignore files.
    pub filesystem: Arc<dyn FileSystemPort>,
    /// Gitignore-style pattern compiler.
    pub compiler: Arc<dyn IgnoreCompilerPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Patterns contributed by one source, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    /// Where the patterns came from.
    pub source: PatternSource,
    /// Raw patterns.
    pub patterns: Vec<Box<str>>,
}

/// Parse ignore-file text: trim each line, drop blanks and `#` comments.
pub fn parse_ignore_lines(text: &str) -> Vec<Box<str>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Into::into)
        .collect()
}

/// Read patterns from `file_name` under `root`.
///
/// Never fails: a missing file yields no patterns (debug), any other read
/// failure yields no patterns (warn).
pub fn load_ignore_patterns(deps: &IgnoreRulesDeps, root: &Path, file_name: &str) -> Vec<Box<str>> {
    let logger = deps.logger.as_ref();
    let file = match SafeRelativePath::new(file_name) {
        Ok(file) => file,
        Err(error) => {
            emit_error(
                logger,
                LogLevel::Warn,
                "ignore.file.read_failed",
                "ignore file name is not a relative path",
                Some(log_field("file", file_name)),
                &error,
            );
            return Vec::new();
        },
    };

    match deps.filesystem.read_file_text(root, &file) {
        Ok(text) => parse_ignore_lines(&text),
        Err(error) if error.code == ErrorCode::not_found() => {
            emit(
                logger,
                LogLevel::Debug,
                "ignore.file.not_found",
                "ignore file not found",
                Some(log_field("file", file.as_str())),
            );
            Vec::new()
        },
        Err(error) => {
            emit_error(
                logger,
                LogLevel::Warn,
                "ignore.file.read_failed",
                "could not read ignore file",
                Some(log_field("file", file.as_str())),
                &error,
            );
            Vec::new()
        },
    }
}

/// Collect the enabled pattern sources in precedence order.
///
/// `.repopackignore` is always attempted; empty groups are kept so callers
/// can report every source that was consulted.
pub fn collect_pattern_groups(
    deps: &IgnoreRulesDeps,
    root: &Path,
    settings: &IgnoreSettings,
) -> Vec<PatternGroup> {
    let mut groups = Vec::with_capacity(4);

    if settings.use_default_patterns {
        groups.push(PatternGroup {
            source: PatternSource::Defaults,
            patterns: DEFAULT_IGNORE_LIST.iter().map(|pattern| Box::from(*pattern)).collect(),
        });
    }
    if settings.use_gitignore {
        groups.push(PatternGroup {
            source: PatternSource::Gitignore,
            patterns: load_ignore_patterns(deps, root, GITIGNORE_FILE_NAME),
        });
    }
    groups.push(PatternGroup {
        source: PatternSource::RepopackIgnore,
        patterns: load_ignore_patterns(deps, root, REPOPACK_IGNORE_FILE_NAME),
    });
    groups.push(PatternGroup {
        source: PatternSource::Custom,
        patterns: settings.custom_patterns.clone(),
    });

    groups
}

/// Build the ordered pattern list for `root`.
pub fn build_pattern_list(
    deps: &IgnoreRulesDeps,
    root: &Path,
    settings: &IgnoreSettings,
) -> IgnorePatterns {
    collect_pattern_groups(deps, root, settings)
        .into_iter()
        .flat_map(|group| group.patterns)
        .collect()
}

/// Compile patterns into a predicate, warning about each skipped pattern.
pub fn compile_ignore_filter(
    deps: &IgnoreRulesDeps,
    patterns: &IgnorePatterns,
) -> Arc<dyn IgnorePredicate> {
    let compilation = deps.compiler.compile(patterns);
    for rejected in &compilation.rejected {
        let mut fields = log_field("pattern", rejected.pattern.as_ref());
        fields.insert("reason".into(), rejected.reason.as_ref().into());
        emit(
            deps.logger.as_ref(),
            LogLevel::Warn,
            "ignore.pattern.invalid",
            "skipping invalid ignore pattern",
            Some(fields),
        );
    }
    compilation.predicate
}

/// Aggregate and compile in one step.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.display()))]
pub fn build_ignore_filter(
    deps: &IgnoreRulesDeps,
    root: &Path,
    settings: &IgnoreSettings,
) -> Arc<dyn IgnorePredicate> {
    let patterns = build_pattern_list(deps, root, settings);
    compile_ignore_filter(deps, &patterns)
}
