//! One-level settings merge.
//!
//! Tenant overrides replace default fields by name. Nested objects are
//! replaced whole; they are never merged recursively.

use crate::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A settings object before validation.
pub type RawSettings = Map<String, Value>;

/// Merge `overrides` over `base`, one level deep.
///
/// # Examples
///
/// ```
/// use bluprint_config::merge_settings;
/// use serde_json::json;
///
/// let base = json!({"a": 1, "b": 2});
/// let overrides = json!({"b": 3});
///
/// let merged = merge_settings(base.as_object().unwrap(), overrides.as_object().unwrap());
/// assert_eq!(serde_json::Value::Object(merged), json!({"a": 1, "b": 3}));
/// ```
pub fn merge_settings(base: &RawSettings, overrides: &RawSettings) -> RawSettings {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Validate a merged settings object into `T`.
///
/// `section` names the tenant (or `default`) in the error.
pub fn validate_settings<T: DeserializeOwned>(section: &str, merged: RawSettings) -> Result<T> {
    serde_json::from_value(Value::Object(merged)).map_err(|e| ConfigError::validation(section, e))
}

/// Merge then validate, the way every tenant record is produced.
pub fn merge_and_validate<T: DeserializeOwned>(
    section: &str,
    base: &RawSettings,
    overrides: &RawSettings,
) -> Result<T> {
    validate_settings(section, merge_settings(base, overrides))
}

/// Interpret a settings section value as an object.
///
/// `null` (an empty YAML section) is an empty object; any other non-object
/// value is a validation error.
pub fn as_settings_object(section: &str, value: Value) -> Result<RawSettings> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawSettings::new()),
        other => Err(ConfigError::validation(
            section,
            format!("expected a mapping, found {}", json_type(&other)),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn obj(value: Value) -> RawSettings {
        value.as_object().cloned().unwrap()
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        a: i64,
        b: i64,
    }

    #[test]
    fn test_override_wins_field_by_field() {
        let merged = merge_settings(&obj(json!({"a": 1, "b": 2})), &obj(json!({"b": 3})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3}));
    }

    #[test]
    fn test_nested_objects_are_replaced_not_merged() {
        let base = obj(json!({"mail": {"host": "smtp", "port": 25}}));
        let overrides = obj(json!({"mail": {"port": 587}}));

        let merged = merge_settings(&base, &overrides);
        assert_eq!(Value::Object(merged), json!({"mail": {"port": 587}}));
    }

    #[test]
    fn test_merge_and_validate() {
        let sample: Sample =
            merge_and_validate("acme", &obj(json!({"a": 1, "b": 2})), &obj(json!({"b": 3})))
                .unwrap();
        assert_eq!(sample, Sample { a: 1, b: 3 });
    }

    #[test]
    fn test_validation_error_names_section() {
        let result: Result<Sample> = validate_settings("acme", obj(json!({"a": 1})));

        match result {
            Err(ConfigError::ValidationError { section, .. }) => assert_eq!(section, "acme"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_section_is_empty() {
        assert!(as_settings_object("acme", Value::Null).unwrap().is_empty());
        assert!(as_settings_object("acme", json!("nope")).is_err());
    }
}
