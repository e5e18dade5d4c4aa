//! Process-wide settings shared by every Bluprint service.

use crate::merge::{RawSettings, validate_settings};
use crate::{ConfigError, EnvLoader, Result};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings read from the `default` section of the tenants file.
///
/// Keys use the upper-case spelling of the settings file. Keys this struct
/// does not know are kept in [`GeneralSettings::extra`] so services can read
/// their own process-wide values with [`GeneralSettings::extra_as`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GeneralSettings {
    /// Project name; `PROJECT_NAME` in the environment always wins
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Deployment environment, part of every cache key namespace
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_debug")]
    pub debug: bool,

    /// Base URL of the IAM sidecar used for token introspection and ACL
    #[serde(default = "default_iam_sidecar_url")]
    pub iam_sidecar_url: String,

    /// Token endpoint advertised to clients
    #[serde(default = "default_iam_token_url")]
    pub iam_token_url: String,

    /// Level name (`INFO`, `WARNING`, ...) or numeric level (`20`)
    #[serde(default = "default_log_level", deserialize_with = "level_string")]
    pub log_level: String,

    #[serde(flatten)]
    pub extra: RawSettings,
}

fn default_project_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "bluprint".to_string())
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_debug() -> bool {
    true
}

fn default_iam_sidecar_url() -> String {
    "http://iam:8000/api/iam/sidecar".to_string()
}

fn default_iam_token_url() -> String {
    "/api/iam/auth/login/basic".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn level_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "LOG_LEVEL must be a string or a number, got {}",
            other
        ))),
    }
}

impl GeneralSettings {
    /// Validate general settings from a `default` section, applying the
    /// `PROJECT_NAME` environment override.
    pub fn from_defaults(defaults: &RawSettings) -> Result<Self> {
        Self::from_defaults_with(defaults, &EnvLoader::default())
    }

    /// Same as [`GeneralSettings::from_defaults`] with an explicit env loader.
    pub fn from_defaults_with(defaults: &RawSettings, env: &EnvLoader) -> Result<Self> {
        let mut raw = defaults.clone();
        if let Some(project_name) = env.load_opt("PROJECT_NAME") {
            raw.insert("PROJECT_NAME".to_string(), Value::String(project_name));
        }
        validate_settings(crate::DEFAULT_CONFIG_KEY, raw)
    }

    /// Route prefix of the service API.
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.project_name)
    }

    /// Namespace separating deployments that share one cache cluster.
    pub fn cache_namespace(&self) -> String {
        format!("{}:{}", self.environment, self.project_name)
    }

    /// Deserialize the service-specific part of the general settings.
    pub fn extra_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.extra.clone()))
            .map_err(|e| ConfigError::validation(crate::DEFAULT_CONFIG_KEY, e))
    }
}
