//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a present but invalid value fails fast instead of
//! being ignored. Pattern lists keep their order.

use crate::schema::{PackConfig, ValidatedPackConfig};
use repopack_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: output document path.
pub const ENV_OUTPUT_FILE_PATH: &str = "REPOPACK_OUTPUT_FILE_PATH";
/// Env var: output header text.
pub const ENV_OUTPUT_HEADER_TEXT: &str = "REPOPACK_OUTPUT_HEADER_TEXT";
/// Env var: prefix lines with line numbers.
pub const ENV_OUTPUT_SHOW_LINE_NUMBERS: &str = "REPOPACK_OUTPUT_SHOW_LINE_NUMBERS";
/// Env var: drop blank lines.
pub const ENV_OUTPUT_REMOVE_EMPTY_LINES: &str = "REPOPACK_OUTPUT_REMOVE_EMPTY_LINES";
/// Env var: request comment removal (reserved).
pub const ENV_OUTPUT_REMOVE_COMMENTS: &str = "REPOPACK_OUTPUT_REMOVE_COMMENTS";
/// Env var: number of largest files listed in the summary.
pub const ENV_OUTPUT_TOP_FILES_LENGTH: &str = "REPOPACK_OUTPUT_TOP_FILES_LENGTH";
/// Env var: read `.gitignore`.
pub const ENV_IGNORE_USE_GITIGNORE: &str = "REPOPACK_IGNORE_USE_GITIGNORE";
/// Env var: apply the default ignore catalog.
pub const ENV_IGNORE_USE_DEFAULT_PATTERNS: &str = "REPOPACK_IGNORE_USE_DEFAULT_PATTERNS";
/// Env var: comma separated custom ignore patterns.
pub const ENV_IGNORE_CUSTOM_PATTERNS: &str = "REPOPACK_IGNORE_CUSTOM_PATTERNS";

const ALL_ENV_VARS: [&str; 9] = [
    ENV_OUTPUT_FILE_PATH,
    ENV_OUTPUT_HEADER_TEXT,
    ENV_OUTPUT_SHOW_LINE_NUMBERS,
    ENV_OUTPUT_REMOVE_EMPTY_LINES,
    ENV_OUTPUT_REMOVE_COMMENTS,
    ENV_OUTPUT_TOP_FILES_LENGTH,
    ENV_IGNORE_USE_GITIGNORE,
    ENV_IGNORE_USE_DEFAULT_PATTERNS,
    ENV_IGNORE_CUSTOM_PATTERNS,
];

const MAX_CSV_ITEMS: usize = 10_000;

/// Parsed env overrides. `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackEnv {
    /// `REPOPACK_OUTPUT_FILE_PATH`.
    pub output_file_path: Option<Box<str>>,
    /// `REPOPACK_OUTPUT_HEADER_TEXT`.
    pub output_header_text: Option<Box<str>>,
    /// `REPOPACK_OUTPUT_SHOW_LINE_NUMBERS`.
    pub output_show_line_numbers: Option<bool>,
    /// `REPOPACK_OUTPUT_REMOVE_EMPTY_LINES`.
    pub output_remove_empty_lines: Option<bool>,
    /// `REPOPACK_OUTPUT_REMOVE_COMMENTS`.
    pub output_remove_comments: Option<bool>,
    /// `REPOPACK_OUTPUT_TOP_FILES_LENGTH`.
    pub output_top_files_length: Option<u32>,
    /// `REPOPACK_IGNORE_USE_GITIGNORE`.
    pub ignore_use_gitignore: Option<bool>,
    /// `REPOPACK_IGNORE_USE_DEFAULT_PATTERNS`.
    pub ignore_use_default_patterns: Option<bool>,
    /// `REPOPACK_IGNORE_CUSTOM_PATTERNS`.
    pub ignore_custom_patterns: Option<Vec<Box<str>>>,
}

impl PackEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            output_file_path: parse_optional_trimmed_string(map, ENV_OUTPUT_FILE_PATH)?,
            output_header_text: parse_optional_trimmed_string(map, ENV_OUTPUT_HEADER_TEXT)?,
            output_show_line_numbers: parse_optional_bool(map, ENV_OUTPUT_SHOW_LINE_NUMBERS)?,
            output_remove_empty_lines: parse_optional_bool(map, ENV_OUTPUT_REMOVE_EMPTY_LINES)?,
            output_remove_comments: parse_optional_bool(map, ENV_OUTPUT_REMOVE_COMMENTS)?,
            output_top_files_length: parse_optional_u32(map, ENV_OUTPUT_TOP_FILES_LENGTH)?,
            ignore_use_gitignore: parse_optional_bool(map, ENV_IGNORE_USE_GITIGNORE)?,
            ignore_use_default_patterns: parse_optional_bool(map, ENV_IGNORE_USE_DEFAULT_PATTERNS)?,
            ignore_custom_patterns: parse_optional_csv_patterns(map, ENV_IGNORE_CUSTOM_PATTERNS)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: PackConfig,
    env: &PackEnv,
) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let mut config = base;

    if let Some(path) = env.output_file_path.as_ref() {
        config.output.file_path = path.clone();
    }
    if let Some(header) = env.output_header_text.as_ref() {
        config.output.header_text = Some(header.clone());
    }
    set_bool(
        &mut config.output.show_line_numbers,
        env.output_show_line_numbers,
    );
    set_bool(
        &mut config.output.remove_empty_lines,
        env.output_remove_empty_lines,
    );
    set_bool(&mut config.output.remove_comments, env.output_remove_comments);
    if let Some(length) = env.output_top_files_length {
        config.output.top_files_length = length;
    }
    set_bool(&mut config.ignore.use_gitignore, env.ignore_use_gitignore);
    set_bool(
        &mut config.ignore.use_default_patterns,
        env.ignore_use_default_patterns,
    );
    if let Some(patterns) = env.ignore_custom_patterns.as_ref() {
        config.ignore.custom_patterns.clone_from(patterns);
    }

    config.validate_and_normalize().map_err(Into::into)
}

const fn set_bool(field: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Typed errors for env parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// CSV list exceeds a safety limit.
    CsvTooLarge {
        /// Env var name.
        var: &'static str,
        /// Number of items.
        len: usize,
        /// Max allowed items.
        max: usize,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::CsvTooLarge { .. } => ErrorCode::new("config", "invalid_env_csv"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
            EnvParseError::CsvTooLarge { var, len, max } => envelope
                .with_metadata("env_var", var)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_csv_patterns(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<Box<str>>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let items: Vec<Box<str>> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Into::into)
        .collect();
    if items.len() > MAX_CSV_ITEMS {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: items.len(),
            max: MAX_CSV_ITEMS,
        });
    }

    Ok(Some(items))
}
