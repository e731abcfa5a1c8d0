//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, log_info, to_ndjson_line, to_pretty_line};
use repopack_config::pack_config_schema;
use repopack_infra::{PackRequest, load_effective_config_json};
use std::collections::BTreeMap;

/// Print the effective config for a repository.
pub fn run_config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    request: &PackRequest,
) -> Result<CliOutput, CliError> {
    let config_json = match load_effective_config_json(
        env,
        &request.root,
        request.config_path.as_deref(),
        request.overrides_json.as_deref(),
    ) {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_ndjson() || mode.is_json() {
        let config_value: serde_json::Value = serde_json::from_str(config_json.trim())?;
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": request
                .config_path
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            "effectiveConfig": config_value,
        });
        if mode.is_ndjson() {
            to_ndjson_line(&payload)?
        } else {
            to_pretty_line(&payload)?
        }
    } else {
        let mut out = config_json;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Print the config JSON Schema.
pub fn run_config_schema(mode: OutputMode) -> Result<CliOutput, CliError> {
    let schema = serde_json::to_value(pack_config_schema())?;

    let stdout = if mode.is_ndjson() {
        to_ndjson_line(&serde_json::json!({ "status": "ok", "schema": schema }))?
    } else if mode.is_json() {
        to_pretty_line(&serde_json::json!({ "status": "ok", "schema": schema }))?
    } else {
        to_pretty_line(&schema)?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{OutputFormat, quiet_mode};

    #[test]
    fn show_applies_env_over_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let env = BTreeMap::from([(
            "REPOPACK_OUTPUT_FILE_PATH".to_owned(),
            "from-env.txt".to_owned(),
        )]);
        let request = PackRequest {
            root: dir.path().to_path_buf(),
            config_path: None,
            overrides_json: Some(r#"{"output":{"filePath":"from-flag.txt"}}"#.to_owned()),
        };

        let output = run_config_show(quiet_mode(OutputFormat::Json), &env, &request)?;
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;

        assert_eq!(value["effectiveConfig"]["output"]["filePath"], "from-env.txt");
        assert_eq!(value["configPath"], serde_json::Value::Null);
        Ok(())
    }

    #[test]
    fn missing_explicit_config_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let request = PackRequest {
            root: dir.path().to_path_buf(),
            config_path: Some(dir.path().join("missing.json")),
            overrides_json: None,
        };

        let output = run_config_show(quiet_mode(OutputFormat::Text), &BTreeMap::new(), &request)?;

        assert_ne!(output.exit_code, ExitCode::Ok);
        assert!(output.stdout.starts_with("status: error\n"));
        Ok(())
    }

    #[test]
    fn schema_describes_the_config_sections() -> Result<(), Box<dyn std::error::Error>> {
        let output = run_config_schema(quiet_mode(OutputFormat::Text))?;
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;

        assert!(value["properties"]["output"].is_object());
        assert!(value["properties"]["ignore"].is_object());
        Ok(())
    }
}
