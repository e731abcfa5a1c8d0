//! Pack configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims pattern entries but never reorders them; pattern
//!   order decides negation precedence.

use repopack_domain::{DEFAULT_OUTPUT_FILE_NAME, IgnoreSettings, SanitizeOptions};
use repopack_shared::{ErrorCode, ErrorEnvelope};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Config file looked up under the repository root when no path is given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "repopack.config.json";

/// Default number of largest files listed in the pack summary.
pub const DEFAULT_TOP_FILES_LENGTH: u32 = 5;

const TOP_FILES_LENGTH_MAX: u32 = 1_000;
const CUSTOM_PATTERNS_MAX: usize = 512;

/// Top-level pack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PackConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Output document and transform settings.
    pub output: OutputConfig,
    /// Ignore pattern sources.
    pub ignore: IgnoreConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            output: OutputConfig::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl PackConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedPackConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.output.normalize_and_validate()?;
        self.ignore.normalize_and_validate()?;
        Ok(ValidatedPackConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Config that passed validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPackConfig {
    raw: PackConfig,
}

impl ValidatedPackConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &PackConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> PackConfig {
        self.raw
    }

    /// Transform switches consumed by the sanitization pipeline.
    #[must_use]
    pub const fn sanitize_options(&self) -> SanitizeOptions {
        self.raw.output.sanitize_options()
    }

    /// Pattern source switches consumed by the pattern aggregator.
    #[must_use]
    pub fn ignore_settings(&self) -> IgnoreSettings {
        self.raw.ignore.to_settings()
    }
}

impl AsRef<PackConfig> for ValidatedPackConfig {
    fn as_ref(&self) -> &PackConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedPackConfig {
    type Target = PackConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Output document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct OutputConfig {
    /// Output document path, relative to the repository root.
    pub file_path: Box<str>,
    /// Free text written into the document header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_text: Option<Box<str>>,
    /// Reserved; requesting comment removal fails at sanitization time.
    pub remove_comments: bool,
    /// Drop blank lines from every file.
    pub remove_empty_lines: bool,
    /// Prefix every line with its line number.
    pub show_line_numbers: bool,
    /// Number of largest files listed in the summary.
    pub top_files_length: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: DEFAULT_OUTPUT_FILE_NAME.into(),
            header_text: None,
            remove_comments: false,
            remove_empty_lines: false,
            show_line_numbers: false,
            top_files_length: DEFAULT_TOP_FILES_LENGTH,
        }
    }
}

impl OutputConfig {
    /// Transform switches for the sanitization pipeline.
    #[must_use]
    pub const fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            remove_comments: self.remove_comments,
            remove_empty_lines: self.remove_empty_lines,
            show_line_numbers: self.show_line_numbers,
        }
    }

    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        let trimmed = self.file_path.trim();
        if trimmed.is_empty() {
            return Err(ConfigSchemaError::EmptyValue {
                section: "output",
                field: "filePath",
            });
        }
        if trimmed.len() != self.file_path.len() {
            self.file_path = trimmed.into();
        }

        if let Some(header) = self.header_text.as_deref()
            && header.trim().is_empty()
        {
            self.header_text = None;
        }

        if self.top_files_length > TOP_FILES_LENGTH_MAX {
            return Err(ConfigSchemaError::LimitOutOfRange {
                section: "output",
                field: "topFilesLength",
                value: u64::from(self.top_files_length),
                min: 0,
                max: u64::from(TOP_FILES_LENGTH_MAX),
            });
        }

        Ok(())
    }
}

/// Ignore pattern sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct IgnoreConfig {
    /// Read `.gitignore` from the repository root.
    pub use_gitignore: bool,
    /// Apply the built-in default catalog.
    pub use_default_patterns: bool,
    /// Extra gitignore-style patterns, applied last.
    pub custom_patterns: Vec<Box<str>>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        let settings = IgnoreSettings::default();
        Self {
            use_gitignore: settings.use_gitignore,
            use_default_patterns: settings.use_default_patterns,
            custom_patterns: settings.custom_patterns,
        }
    }
}

impl IgnoreConfig {
    /// Pattern source switches for the aggregator.
    #[must_use]
    pub fn to_settings(&self) -> IgnoreSettings {
        IgnoreSettings {
            use_default_patterns: self.use_default_patterns,
            use_gitignore: self.use_gitignore,
            custom_patterns: self.custom_patterns.clone(),
        }
    }

    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        self.custom_patterns = normalize_custom_patterns(&self.custom_patterns)?;

        if self.custom_patterns.len() > CUSTOM_PATTERNS_MAX {
            return Err(ConfigSchemaError::ListTooLarge {
                section: "ignore",
                field: "customPatterns",
                len: self.custom_patterns.len(),
                max: CUSTOM_PATTERNS_MAX,
            });
        }

        Ok(())
    }
}

fn normalize_custom_patterns(patterns: &[Box<str>]) -> Result<Vec<Box<str>>, ConfigSchemaError> {
    patterns
        .iter()
        .map(|pattern| {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                Err(ConfigSchemaError::InvalidIgnorePattern {
                    pattern: pattern.to_string(),
                })
            } else {
                Ok(trimmed.into())
            }
        })
        .collect()
}

/// Parse a pack config from a JSON string, applying validation and normalization.
pub fn parse_pack_config_json(input: &str) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let config: PackConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a pack config from a TOML string, applying validation and normalization.
pub fn parse_pack_config_toml(input: &str) -> Result<ValidatedPackConfig, ErrorEnvelope> {
    let config: PackConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Typed validation errors for the configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A required string field is empty after trimming.
    EmptyValue {
        /// Schema section (e.g. `output`).
        section: &'static str,
        /// Field name in the config file (e.g. `filePath`).
        field: &'static str,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// A list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Number of entries after normalization.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// An ignore pattern entry is invalid.
    InvalidIgnorePattern {
        /// Invalid ignore pattern value.
        pattern: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_value"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::InvalidIgnorePattern { .. } => ErrorCode::new("config", "invalid_ignore_pattern"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::EmptyValue { section, field } => {
                write!(formatter, "{section}.{field} must be non-empty")
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be within [{min}, {max}] (got {value})"
            ),
            Self::ListTooLarge {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} must have at most {max} entries (got {len})"
            ),
            Self::InvalidIgnorePattern { pattern } => {
                write!(formatter, "invalid ignore pattern entry: {pattern:?}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::EmptyValue { section, field } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field),
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::ListTooLarge {
                section,
                field,
                len,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidIgnorePattern { pattern } => {
                envelope.with_metadata("pattern", pattern)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PackConfig::default();
        assert_eq!(config.version, CURRENT_CONFIG_VERSION);
        assert_eq!(config.output.file_path.as_ref(), "repopack-output.txt");
        assert_eq!(config.output.top_files_length, 5);
        assert!(!config.output.remove_comments);
        assert!(!config.output.show_line_numbers);
        assert!(config.ignore.use_gitignore);
        assert!(config.ignore.use_default_patterns);
        assert!(config.ignore.custom_patterns.is_empty());
    }

    #[test]
    fn partial_json_fills_defaults() -> Result<(), ErrorEnvelope> {
        let config = parse_pack_config_json(r#"{ "output": { "showLineNumbers": true } }"#)?;
        assert!(config.output.show_line_numbers);
        assert!(config.ignore.use_default_patterns);
        assert_eq!(config.output.file_path.as_ref(), DEFAULT_OUTPUT_FILE_NAME);
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse_pack_config_json(r#"{ "output": { "style": "xml" } }"#).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_json"))
        );
    }

    #[test]
    fn custom_patterns_are_trimmed_in_order() -> Result<(), ErrorEnvelope> {
        let config = parse_pack_config_json(
            r#"{ "ignore": { "customPatterns": [" *.log ", "!keep.log", "tmp/"] } }"#,
        )?;
        let patterns: Vec<&str> = config
            .ignore
            .custom_patterns
            .iter()
            .map(AsRef::as_ref)
            .collect();
        assert_eq!(patterns, vec!["*.log", "!keep.log", "tmp/"]);
        Ok(())
    }

    #[test]
    fn blank_custom_pattern_is_rejected() {
        let error = parse_pack_config_json(r#"{ "ignore": { "customPatterns": ["  "] } }"#).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_ignore_pattern"))
        );
    }

    #[test]
    fn empty_output_path_is_rejected() {
        let error = parse_pack_config_json(r#"{ "output": { "filePath": "  " } }"#).err();
        let error = error.map(|error| (error.code.clone(), error.metadata_value("field").map(str::to_owned)));
        assert_eq!(
            error,
            Some((
                ErrorCode::new("config", "empty_value"),
                Some("filePath".to_owned())
            ))
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = parse_pack_config_json(r#"{ "version": 2 }"#).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "unsupported_version"))
        );
    }

    #[test]
    fn too_many_custom_patterns_are_rejected() {
        let config = PackConfig {
            ignore: IgnoreConfig {
                custom_patterns: (0..=CUSTOM_PATTERNS_MAX)
                    .map(|index| format!("file-{index}").into_boxed_str())
                    .collect(),
                ..IgnoreConfig::default()
            },
            ..PackConfig::default()
        };
        assert!(matches!(
            config.validate_and_normalize(),
            Err(ConfigSchemaError::ListTooLarge { len, .. }) if len == CUSTOM_PATTERNS_MAX + 1
        ));
    }

    #[test]
    fn toml_config_parses() -> Result<(), ErrorEnvelope> {
        let config = parse_pack_config_toml(
            "version = 1\n[output]\nremoveEmptyLines = true\n[ignore]\nuseGitignore = false\n",
        )?;
        assert!(config.output.remove_empty_lines);
        assert!(!config.ignore.use_gitignore);
        Ok(())
    }

    #[test]
    fn validated_config_exposes_pipeline_views() -> Result<(), ErrorEnvelope> {
        let config = parse_pack_config_json(
            r#"{ "output": { "removeEmptyLines": true },
                 "ignore": { "useDefaultPatterns": false, "customPatterns": ["*.md"] } }"#,
        )?;
        let options = config.sanitize_options();
        assert!(options.remove_empty_lines);
        assert!(!options.show_line_numbers);

        let settings = config.ignore_settings();
        assert!(!settings.use_default_patterns);
        assert!(settings.use_gitignore);
        assert_eq!(settings.custom_patterns, vec![Box::<str>::from("*.md")]);
        Ok(())
    }
}
