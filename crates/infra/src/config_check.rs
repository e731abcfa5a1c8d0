//! Config loading helpers for CLI surfaces.

use crate::InfraResult;
use repopack_config::{PackEnv, load_pack_config_for_root, to_pretty_json};
use repopack_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Load and validate the effective config for `root`, returning
/// deterministic pretty JSON.
pub fn load_effective_config_json(
    env: &BTreeMap<String, String>,
    root: &Path,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> InfraResult<String> {
    let env = PackEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let config = load_pack_config_for_root(root, config_path, overrides_json, &env)?;
    to_pretty_json(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use repopack_config::ENV_OUTPUT_SHOW_LINE_NUMBERS;
    use repopack_shared::ErrorCode;

    #[test]
    fn env_wins_over_overrides() -> InfraResult<()> {
        let dir = tempfile::tempdir()?;
        let env = BTreeMap::from([(ENV_OUTPUT_SHOW_LINE_NUMBERS.to_owned(), "false".to_owned())]);

        let json = load_effective_config_json(
            &env,
            dir.path(),
            None,
            Some(r#"{"output":{"showLineNumbers":true,"filePath":"packed.txt"}}"#),
        )?;
        let value: serde_json::Value = serde_json::from_str(&json)
            .map_err(|error| ErrorEnvelope::expected(ErrorCode::invalid_data(), error.to_string()))?;

        assert_eq!(value.pointer("/output/showLineNumbers"), Some(&serde_json::json!(false)));
        assert_eq!(value.pointer("/output/filePath"), Some(&serde_json::json!("packed.txt")));
        Ok(())
    }

    #[test]
    fn invalid_env_is_rejected() {
        let env = BTreeMap::from([(ENV_OUTPUT_SHOW_LINE_NUMBERS.to_owned(), "maybe".to_owned())]);

        let error = load_effective_config_json(&env, Path::new("."), None, None).err();

        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_env_bool"))
        );
    }
}
