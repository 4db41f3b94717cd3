//! YAML text to [`ConfigMapping`].

use std::collections::BTreeMap;

use serde_yaml::Value;

use super::ConfigError;

/// A single configuration layer: string keys mapped to YAML values.
pub type ConfigMapping = BTreeMap<String, Value>;

/// Parses raw YAML text into a configuration mapping.
///
/// Empty, whitespace-only, comment-only and null documents yield an empty mapping.
/// Anything that is not a mapping with string keys at the top level fails with
/// [`ConfigError::InvalidFormat`]; no partial mapping is ever returned.
pub fn parse(text: &str) -> Result<ConfigMapping, ConfigError> {
    if text.trim().is_empty() {
        return Ok(ConfigMapping::new());
    }

    let mut document: Value =
        serde_yaml::from_str(text).map_err(|e| ConfigError::invalid_format(e.to_string()))?;
    document
        .apply_merge()
        .map_err(|e| ConfigError::invalid_format(e.to_string()))?;

    match document {
        Value::Null => Ok(ConfigMapping::new()),
        Value::Mapping(mapping) => {
            let mut table = ConfigMapping::new();
            for (key, value) in mapping {
                match key {
                    Value::String(key) => {
                        table.insert(key, value);
                    }
                    other => {
                        return Err(ConfigError::invalid_format(format!(
                            "top-level keys must be strings, found {}",
                            kind(&other)
                        )));
                    }
                }
            }
            Ok(table)
        }
        other => Err(ConfigError::invalid_format(format!(
            "top level must be a mapping, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
