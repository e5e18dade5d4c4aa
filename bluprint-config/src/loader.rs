// Settings file loaders

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Tenants file loader
///
/// Files are YAML; JSON documents parse too since JSON is a subset of YAML.
/// The result is normalized into a `serde_json::Value` so that merging and
/// validation only deal with one representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load settings from file
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse settings from string
    pub fn parse(&self, content: &str) -> Result<Value> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("YAML parse error: {}", e)))?;

        yaml_to_json(yaml)
    }
}

// YAML allows non-string mapping keys (`123:` or `true:`); tenant ids are
// always strings, so scalar keys are stringified.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::ParseError(format!(
            "Unsupported mapping key: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let loader = ConfigLoader::new();
        let yaml = r#"
default:
  PROJECT_NAME: billing
acme:
  website_url: https://acme.example.com
"#;

        let result = loader.parse(yaml).unwrap();
        assert_eq!(result["default"]["PROJECT_NAME"], "billing");
        assert_eq!(result["acme"]["website_url"], "https://acme.example.com");
    }

    #[test]
    fn test_parse_yaml_numeric_keys() {
        let loader = ConfigLoader::new();
        let result = loader.parse("123:\n  a: 1\n").unwrap();

        assert_eq!(result["123"]["a"], 1);
    }

    #[test]
    fn test_parse_yaml_invalid() {
        let loader = ConfigLoader::new();
        let result = loader.parse("default: [unclosed");

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_parse_json_document() {
        let loader = ConfigLoader::new();
        let result = loader.parse(r#"{"default": {"a": 1}, "acme": {"b": "x"}}"#).unwrap();

        assert_eq!(result["default"]["a"], 1);
        assert_eq!(result["acme"]["b"], "x");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigLoader::new().load_file(Path::new("/nonexistent/tenants.yaml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
