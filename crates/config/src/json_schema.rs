//! JSON Schema export for the pack config.

use crate::PackConfig;
use schemars::{Schema, schema_for};

/// JSON Schema for `PackConfig`.
#[must_use]
pub fn pack_config_schema() -> Schema {
    schema_for!(PackConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_camel_case_properties() {
        let schema = pack_config_schema().to_value();
        let output = schema
            .pointer("/$defs/OutputConfig/properties")
            .and_then(serde_json::Value::as_object);

        let keys: Vec<&str> = output
            .map(|properties| properties.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert!(keys.contains(&"filePath"), "keys: {keys:?}");
        assert!(keys.contains(&"showLineNumbers"), "keys: {keys:?}");
        assert!(keys.contains(&"removeEmptyLines"), "keys: {keys:?}");
    }

    #[test]
    fn schema_rejects_unknown_top_level_keys() {
        let schema = pack_config_schema().to_value();
        assert_eq!(
            schema.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false))
        );
    }
}
