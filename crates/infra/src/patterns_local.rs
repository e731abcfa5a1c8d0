//! Effective ignore-pattern listing for a repository.

use crate::InfraResult;
use crate::observability::observability_from_env;
use crate::pack_local::{PackRequest, normalize_root};
use crate::wiring::LocalDeps;
use repopack_app::collect_pattern_groups;
use repopack_config::{PackEnv, load_pack_config_for_root};
use repopack_domain::PatternSource;
use repopack_ports::LoggerPort;
use repopack_shared::ErrorEnvelope;
use serde::Serialize;
use std::sync::Arc;

/// Patterns from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPatternGroup {
    /// Source of the patterns.
    pub source: PatternSource,
    /// Patterns in file order.
    pub patterns: Vec<Box<str>>,
}

/// Every consulted source, in precedence order (later wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPatterns {
    /// Groups in aggregation order.
    pub groups: Vec<ResolvedPatternGroup>,
}

impl ResolvedPatterns {
    /// The flattened pattern list handed to the compiler.
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.patterns.iter().map(|pattern| &**pattern))
    }
}

/// Resolve patterns with process env overrides.
pub fn resolve_patterns_local(request: &PackRequest) -> InfraResult<ResolvedPatterns> {
    let env = PackEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    let observability = observability_from_env();
    resolve_patterns_with_env(request, &env, observability.logger)
}

/// Resolve patterns with explicit env overrides and logger.
pub fn resolve_patterns_with_env(
    request: &PackRequest,
    env: &PackEnv,
    logger: Option<Arc<dyn LoggerPort>>,
) -> InfraResult<ResolvedPatterns> {
    let root = normalize_root(&request.root);
    let config = load_pack_config_for_root(
        &root,
        request.config_path.as_deref(),
        request.overrides_json.as_deref(),
        env,
    )?;
    let deps = LocalDeps::new(logger);

    let groups = collect_pattern_groups(&deps.ignore, &root, &config.ignore_settings())
        .into_iter()
        .map(|group| ResolvedPatternGroup {
            source: group.source,
            patterns: group.patterns,
        })
        .collect();
    Ok(ResolvedPatterns { groups })
}
