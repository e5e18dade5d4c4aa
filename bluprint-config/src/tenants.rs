// Tenants file: one `default` section plus one override section per tenant

use crate::loader::ConfigLoader;
use crate::merge::{RawSettings, as_settings_object, merge_and_validate, validate_settings};
use crate::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reserved top-level key holding the defaults every tenant inherits.
pub const DEFAULT_CONFIG_KEY: &str = "default";

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_TENANTS_FILE: &str = "tenants.yaml";

/// `./tenants.yaml`
pub fn default_tenants_path() -> PathBuf {
    PathBuf::from(".").join(DEFAULT_TENANTS_FILE)
}

/// Parsed but unvalidated tenants file.
///
/// Keeping the raw sections around lets the resolver validate documents from
/// the cache or the store against the same defaults the file declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantsDocument {
    defaults: RawSettings,
    tenants: Vec<(String, RawSettings)>,
}

impl TenantsDocument {
    /// Split a parsed document into defaults and tenant overrides.
    ///
    /// Tenant keys are trimmed. A repeated key (after trimming) keeps the
    /// last section.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(map) => map,
            Value::Null => RawSettings::new(),
            _ => {
                return Err(ConfigError::ParseError(
                    "Tenants file must be a mapping of tenant ids".to_string(),
                ));
            }
        };

        let defaults = match root.remove(DEFAULT_CONFIG_KEY) {
            Some(value) => as_settings_object(DEFAULT_CONFIG_KEY, value)?,
            None => RawSettings::new(),
        };

        let mut tenants: Vec<(String, RawSettings)> = Vec::with_capacity(root.len());
        for (key, value) in root {
            let tenant = key.trim().to_string();
            if tenant.is_empty() {
                return Err(ConfigError::validation(key, "tenant id must not be empty"));
            }
            let overrides = as_settings_object(&tenant, value)?;
            match tenants.iter_mut().find(|(existing, _)| *existing == tenant) {
                Some(entry) => entry.1 = overrides,
                None => tenants.push((tenant, overrides)),
            }
        }

        Ok(Self { defaults, tenants })
    }

    /// Load a YAML tenants file.
    pub fn load(path: &Path) -> Result<Self> {
        let value = ConfigLoader::new().load_file(path)?;
        let document = Self::from_value(value)?;

        tracing::debug!(
            path = %path.display(),
            tenants = document.tenants.len(),
            "Loaded tenants file"
        );
        Ok(document)
    }

    /// The `default` section.
    pub fn defaults(&self) -> &RawSettings {
        &self.defaults
    }

    /// Tenant ids in file order.
    pub fn tenant_ids(&self) -> impl Iterator<Item = &str> {
        self.tenants.iter().map(|(tenant, _)| tenant.as_str())
    }

    /// Raw override section of one tenant.
    pub fn overrides(&self, tenant: &str) -> Option<&RawSettings> {
        self.tenants
            .iter()
            .find(|(existing, _)| existing == tenant)
            .map(|(_, overrides)| overrides)
    }

    /// Validate the defaults alone.
    pub fn defaults_as<T: DeserializeOwned>(&self) -> Result<T> {
        validate_settings(DEFAULT_CONFIG_KEY, self.defaults.clone())
    }

    /// Validate `merge(defaults, override)` for every tenant.
    pub fn settings<T: DeserializeOwned>(&self) -> Result<HashMap<String, T>> {
        self.tenants
            .iter()
            .map(|(tenant, overrides)| {
                merge_and_validate(tenant, &self.defaults, overrides)
                    .map(|settings| (tenant.clone(), settings))
            })
            .collect()
    }
}

/// Load and validate every tenant of a tenants file.
///
/// Each tenant's record is its override section merged over the `default`
/// section (one level deep) and validated into `T`. The `default` key itself
/// is not a tenant.
///
/// ```rust,no_run
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Settings {
///     title: String,
/// }
///
/// let tenants = bluprint_config::load_settings::<Settings>(None).unwrap();
/// for (tenant, settings) in &tenants {
///     println!("{}: {}", tenant, settings.title);
/// }
/// ```
pub fn load_settings<T: DeserializeOwned>(path: Option<&Path>) -> Result<HashMap<String, T>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_tenants_path);
    TenantsDocument::load(&path)?.settings()
}

/// Load only the `default` section, validated into `T`, as a single-entry
/// map keyed [`DEFAULT_CONFIG_KEY`].
pub fn load_defaults<T: DeserializeOwned>(path: Option<&Path>) -> Result<HashMap<String, T>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_tenants_path);
    let defaults = TenantsDocument::load(&path)?.defaults_as()?;

    let mut map = HashMap::with_capacity(1);
    map.insert(DEFAULT_CONFIG_KEY.to_string(), defaults);
    Ok(map)
}
