//! Patterns command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, log_info, to_ndjson_line, to_pretty_line};
use repopack_config::PackEnv;
use repopack_infra::{PackRequest, ResolvedPatterns, observability_from_map, resolve_patterns_with_env};
use repopack_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Run the patterns command.
pub fn run_patterns(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    request: &PackRequest,
) -> Result<CliOutput, CliError> {
    let pack_env = match PackEnv::from_map(env) {
        Ok(pack_env) => pack_env,
        Err(error) => return Ok(format_error_output(mode, &ErrorEnvelope::from(error))),
    };
    let observability = observability_from_map(env);

    match resolve_patterns_with_env(request, &pack_env, observability.logger) {
        Ok(resolved) => format_patterns_output(mode, &resolved),
        Err(error) => Ok(format_error_output(mode, &error)),
    }
}

fn format_patterns_output(
    mode: OutputMode,
    resolved: &ResolvedPatterns,
) -> Result<CliOutput, CliError> {
    let mut stderr = String::new();
    log_info(&mut stderr, "patterns resolved", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let mut out = String::new();
        for group in &resolved.groups {
            for pattern in &group.patterns {
                out.push_str(&to_ndjson_line(&serde_json::json!({
                    "type": "pattern",
                    "source": group.source,
                    "pattern": pattern,
                }))?);
            }
        }
        out.push_str(&to_ndjson_line(&serde_json::json!({
            "type": "summary",
            "status": "ok",
            "kind": "patterns",
            "total": resolved.flattened().count(),
        }))?);
        out
    } else if mode.is_json() {
        to_pretty_line(&serde_json::json!({
            "status": "ok",
            "groups": resolved.groups,
        }))?
    } else {
        format_patterns_text(resolved)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn format_patterns_text(resolved: &ResolvedPatterns) -> String {
    let mut out = String::from("status: ok\n");
    for group in &resolved.groups {
        let _ = writeln!(out, "{} ({}):", group.source.as_str(), group.patterns.len());
        for pattern in &group.patterns {
            let _ = writeln!(out, "  {pattern}");
        }
    }
    out
}
