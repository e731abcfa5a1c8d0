//! # repopack-app
//!
//! Application use cases: ignore-pattern resolution, repository scan, and
//! file sanitization.
//! This crate depends on `ports`, `domain`, and `shared`.

mod diagnostics;
pub mod ignore_rules;
pub mod sanitize;
pub mod scan;

#[cfg(test)]
mod test_support;

pub use ignore_rules::{
    IgnoreRulesDeps, PatternGroup, build_ignore_filter, build_pattern_list, collect_pattern_groups,
    compile_ignore_filter, load_ignore_patterns, parse_ignore_lines,
};
pub use sanitize::{
    SanitizeDeps, SanitizeError, decode_bytes, is_binary, sanitize_file, sanitize_file_outcomes,
    sanitize_files, sanitize_files_parallel,
};
pub use scan::{ScanDeps, scan_repository};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use repopack_domain::domain_crate_version;
    use repopack_ports::ports_crate_version;
    use repopack_shared::shared_crate_version;

    #[test]
    fn app_crate_compiles() {
        let version = app_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn app_can_use_ports_domain_shared() {
        let ports_version = ports_crate_version();
        let domain_version = domain_crate_version();
        let shared_version = shared_crate_version();

        assert!(!ports_version.is_empty());
        assert!(!domain_version.is_empty());
        assert!(!shared_version.is_empty());
    }
}
