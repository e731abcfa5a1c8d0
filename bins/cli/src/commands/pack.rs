//! Pack command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, log_info, to_ndjson_line, to_pretty_line};
use repopack_config::PackEnv;
use repopack_infra::{PackRequest, PackSummary, observability_from_map, run_pack_with_env};
use repopack_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Run the pack command.
pub fn run_pack(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    request: &PackRequest,
) -> Result<CliOutput, CliError> {
    let pack_env = match PackEnv::from_map(env) {
        Ok(pack_env) => pack_env,
        Err(error) => return Ok(format_error_output(mode, &ErrorEnvelope::from(error))),
    };
    let observability = observability_from_map(env);

    match run_pack_with_env(request, &pack_env, observability.logger) {
        Ok(summary) => format_pack_output(mode, &summary),
        Err(error) => Ok(format_error_output(mode, &error)),
    }
}

fn format_pack_output(mode: OutputMode, summary: &PackSummary) -> Result<CliOutput, CliError> {
    let mut stderr = String::new();
    log_info(&mut stderr, "pack completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let mut payload = serde_json::json!({
            "type": "summary",
            "status": "ok",
            "kind": "pack",
        });
        if let (Some(object), serde_json::Value::Object(fields)) =
            (payload.as_object_mut(), serde_json::to_value(summary)?)
        {
            object.extend(fields);
        }
        to_ndjson_line(&payload)?
    } else if mode.is_json() {
        to_pretty_line(&serde_json::json!({
            "status": "ok",
            "summary": summary,
        }))?
    } else {
        format_pack_text(summary)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn format_pack_text(summary: &PackSummary) -> String {
    let mut out = format!(
        "status: ok\nfiles: {}\nchars: {}\noutput: {}\n",
        summary.total_files,
        summary.total_chars,
        summary.output_path.display()
    );
    if !summary.top_files.is_empty() {
        out.push_str("top files:\n");
        for (rank, file) in summary.top_files.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({} chars)", rank + 1, file.path, file.chars);
        }
    }
    out
}
