//! Config loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{DEFAULT_CONFIG_FILE_NAME, PackConfig, PackEnv, ValidatedPackConfig, apply_env_overrides};
use repopack_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the pack config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`PackEnv`)
/// - overrides JSON (partial config)
/// - config JSON (file content)
/// - defaults (`PackConfig::default()`)
pub fn load_pack_config_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &PackEnv,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let config = match config_json {
        None => PackConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    merge_and_validate(config, overrides_json, env)
}

/// Load the pack config from an optional file path.
pub fn load_pack_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &PackEnv,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let config = match config_path {
        None => PackConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    merge_and_validate(config, overrides_json, env)
}

/// Load the pack config for a repository root.
///
/// An explicit path must exist. Without one, `repopack.config.json` under the
/// root is used when present and defaults apply otherwise.
pub fn load_pack_config_for_root(
    root: &Path,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &PackEnv,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    if config_path.is_some() {
        return load_pack_config_from_path(config_path, overrides_json, env);
    }

    let candidate = root.join(DEFAULT_CONFIG_FILE_NAME);
    let discovered = candidate.is_file().then_some(candidate.as_path());
    load_pack_config_from_path(discovered, overrides_json, env)
}

/// Load the pack config for a repository root, reading env overrides from
/// the current process.
pub fn load_pack_config_std_env(
    root: &Path,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let env = PackEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_pack_config_for_root(root, config_path, overrides_json, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &PackConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &PackConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn merge_and_validate(
    mut config: PackConfig,
    overrides_json: Option<&str>,
    env: &PackEnv,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut config, overrides);
    }

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

fn parse_config_unvalidated(input: &str, format: ConfigFormat) -> Result<PackConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<PackConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct PackConfigOverrides {
    version: Option<u32>,
    output: OutputConfigOverrides,
    ignore: IgnoreConfigOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct OutputConfigOverrides {
    file_path: Option<Box<str>>,
    header_text: Option<Box<str>>,
    remove_comments: Option<bool>,
    remove_empty_lines: Option<bool>,
    show_line_numbers: Option<bool>,
    top_files_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct IgnoreConfigOverrides {
    use_gitignore: Option<bool>,
    use_default_patterns: Option<bool>,
    custom_patterns: Option<Vec<Box<str>>>,
}

fn apply_overrides(config: &mut PackConfig, overrides: PackConfigOverrides) {
    let PackConfigOverrides {
        version,
        output,
        ignore,
    } = overrides;

    set_value(&mut config.version, version);

    set_value(&mut config.output.file_path, output.file_path);
    if output.header_text.is_some() {
        config.output.header_text = output.header_text;
    }
    set_value(&mut config.output.remove_comments, output.remove_comments);
    set_value(
        &mut config.output.remove_empty_lines,
        output.remove_empty_lines,
    );
    set_value(&mut config.output.show_line_numbers, output.show_line_numbers);
    set_value(&mut config.output.top_files_length, output.top_files_length);

    set_value(&mut config.ignore.use_gitignore, ignore.use_gitignore);
    set_value(
        &mut config.ignore.use_default_patterns,
        ignore.use_default_patterns,
    );
    set_value(&mut config.ignore.custom_patterns, ignore.custom_patterns);
}

fn set_value<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
