//! # repopack-infra
//!
//! Infrastructure wiring and runtime composition.
//! This crate depends on `app`, `adapters`, `config`, and `shared`.

use repopack_shared::ErrorEnvelope;

/// Config loading helpers used by CLI surfaces.
pub mod config_check;
/// Logger selection from the environment.
pub mod observability;
/// Plain-text output document.
pub mod output;
/// Local pack orchestration.
pub mod pack_local;
/// Effective pattern listing.
pub mod patterns_local;
/// Local adapter wiring.
pub mod wiring;

/// Infra-level error type.
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

pub use config_check::load_effective_config_json;
pub use observability::{
    LOG_FORMAT_ENV, LOG_LEVEL_ENV, LogFormat, Observability, observability_from_env,
    observability_from_map,
};
pub use output::{FILE_SEPARATOR, SECTION_SEPARATOR, render_output};
pub use pack_local::{PackRequest, PackSummary, TopFile, run_pack_local, run_pack_with_env};
pub use patterns_local::{
    ResolvedPatternGroup, ResolvedPatterns, resolve_patterns_local, resolve_patterns_with_env,
};
pub use wiring::LocalDeps;

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
