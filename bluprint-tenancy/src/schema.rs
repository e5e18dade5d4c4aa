//! Tenant settings types and their validation against the file defaults.

use bluprint_config::{ConfigError, RawSettings, merge_and_validate};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

/// Settings record of one tenant.
///
/// Implemented by the service's own settings struct. Services resolving
/// tenants by host return the tenant's public URLs from
/// [`TenantSettings::website_urls`].
pub trait TenantSettings:
    Serialize + DeserializeOwned + JsonSchema + Clone + Send + Sync + 'static
{
    /// URLs the tenant is served under.
    fn website_urls(&self) -> Vec<String> {
        Vec::new()
    }
}

/// One URL or a list of URLs, as written in the tenants file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum WebsiteUrls {
    One(String),
    Many(Vec<String>),
}

impl WebsiteUrls {
    pub fn urls(&self) -> Vec<String> {
        match self {
            WebsiteUrls::One(url) => vec![url.clone()],
            WebsiteUrls::Many(urls) => urls.clone(),
        }
    }
}

/// Validates raw settings into `T` against the `default` section.
pub struct SettingsSchema<T> {
    defaults: RawSettings,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TenantSettings> SettingsSchema<T> {
    pub fn new(defaults: RawSettings) -> Self {
        Self {
            defaults,
            _marker: PhantomData,
        }
    }

    pub fn defaults(&self) -> &RawSettings {
        &self.defaults
    }

    /// `merge(defaults, raw)` validated into `T`.
    pub fn validate(&self, tenant: &str, raw: &RawSettings) -> Result<T, ConfigError> {
        merge_and_validate(tenant, &self.defaults, raw)
    }

    /// JSON schema of `T`.
    pub fn json_schema(&self) -> Value {
        let schema = schemars::schema_for!(T);
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

impl<T> Clone for SettingsSchema<T> {
    fn clone(&self) -> Self {
        Self {
            defaults: self.defaults.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for SettingsSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsSchema")
            .field("defaults", &self.defaults)
            .finish()
    }
}
