//! # repopack-config
//!
//! Configuration schema, validation, loading, and env overrides for the
//! packer. This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// JSON Schema export for the config.
pub mod json_schema;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_IGNORE_CUSTOM_PATTERNS, ENV_IGNORE_USE_DEFAULT_PATTERNS, ENV_IGNORE_USE_GITIGNORE,
    ENV_OUTPUT_FILE_PATH, ENV_OUTPUT_HEADER_TEXT, ENV_OUTPUT_REMOVE_COMMENTS,
    ENV_OUTPUT_REMOVE_EMPTY_LINES, ENV_OUTPUT_SHOW_LINE_NUMBERS, ENV_OUTPUT_TOP_FILES_LENGTH,
    EnvParseError, PackEnv, apply_env_overrides,
};
pub use json_schema::pack_config_schema;
pub use load::{
    load_pack_config_for_root, load_pack_config_from_path, load_pack_config_from_sources,
    load_pack_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_CONFIG_FILE_NAME,
    DEFAULT_TOP_FILES_LENGTH, IgnoreConfig, OutputConfig, PackConfig, ValidatedPackConfig,
    parse_pack_config_json, parse_pack_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
