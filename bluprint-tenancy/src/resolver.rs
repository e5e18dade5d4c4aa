//! Tenant Settings Resolution
//!
//! [`TenantConfigs`] answers "what are the settings of tenant X" by walking
//! the configured sources in order:
//!
//! 1. the tenant cache,
//! 2. the settings document store (writing hits back to the cache),
//! 3. the tenants file.
//!
//! Cache and store failures are logged and skipped; only an unknown tenant
//! fails a lookup.

use crate::cache::TenantSettingsCache;
use crate::error::TenantError;
use crate::request::Inbound;
use crate::schema::{SettingsSchema, TenantSettings};
use crate::selector::{TenantDependency, TenantSourceSelector};
use crate::store::SettingsDocumentStore;
use crate::tenant::TenantId;
use bluprint_cache::CacheLayer;
use bluprint_config::{
    ConfigError, EnvLoader, GeneralSettings, RawSettings, TenantsDocument, default_tenants_path,
    merge_settings,
};
use bluprint_jwt::{Authenticator, SidecarAuth};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Cache namespace of the general settings entry.
const GENERAL_CACHE_NAMESPACE: &str = "general";

/// Which dynamic sources a resolver consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceConfig {
    CacheAndStore,
    StoreOnly,
    StaticOnly,
}

impl DataSourceConfig {
    /// The cache only fronts a store; without one the tenants file is used
    /// directly.
    pub fn resolve(cache_enabled: bool, store_present: bool) -> Self {
        match (cache_enabled, store_present) {
            (true, true) => DataSourceConfig::CacheAndStore,
            (false, true) => DataSourceConfig::StoreOnly,
            (_, false) => DataSourceConfig::StaticOnly,
        }
    }

    pub fn uses_cache(self) -> bool {
        self == DataSourceConfig::CacheAndStore
    }

    pub fn uses_store(self) -> bool {
        self != DataSourceConfig::StaticOnly
    }
}

impl fmt::Display for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceConfig::CacheAndStore => write!(f, "cache+store"),
            DataSourceConfig::StoreOnly => write!(f, "store"),
            DataSourceConfig::StaticOnly => write!(f, "static"),
        }
    }
}

/// Settings of every tenant of a service.
pub struct TenantConfigs<T> {
    general: GeneralSettings,
    schema: SettingsSchema<T>,
    settings: Arc<HashMap<TenantId, T>>,
    selector: TenantSourceSelector,
    data_sources: DataSourceConfig,
    cache: TenantSettingsCache,
    store: Option<Arc<dyn SettingsDocumentStore>>,
}

impl<T: TenantSettings> TenantConfigs<T> {
    pub fn builder() -> TenantConfigsBuilder {
        TenantConfigsBuilder::new()
    }

    /// Current settings of `tenant`.
    pub async fn get(&self, tenant: &TenantId) -> Result<T, TenantError> {
        if self.data_sources.uses_cache()
            && let Some(settings) = self.from_cache(tenant).await
        {
            return Ok(settings);
        }

        if self.data_sources.uses_store()
            && let Some(settings) = self.from_store(tenant).await
        {
            return Ok(settings);
        }

        self.settings
            .get(tenant)
            .cloned()
            .ok_or_else(|| TenantError::NotFound(tenant.to_string()))
    }

    /// Resolve the tenant of `inbound` with `dependency`, then its settings.
    pub async fn settings_for<'a>(
        &self,
        dependency: &TenantDependency,
        inbound: impl Into<Inbound<'a>>,
    ) -> Result<T, TenantError> {
        let tenant = dependency.require(inbound).await?;
        self.get(&tenant).await
    }

    async fn from_cache(&self, tenant: &TenantId) -> Option<T> {
        let raw = match self.cache.get(tenant).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "Tenant cache read failed");
                return None;
            }
        };

        match self.schema.validate(tenant.as_str(), &raw) {
            Ok(settings) => {
                tracing::debug!(tenant = %tenant, "Tenant settings served from cache");
                Some(settings)
            }
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "Cached tenant settings are invalid");
                None
            }
        }
    }

    async fn from_store(&self, tenant: &TenantId) -> Option<T> {
        let store = self.store.as_ref()?;
        let document = match store.find_one(tenant).await {
            Ok(Some(document)) => document,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "Settings store read failed");
                return None;
            }
        };

        let settings = match self.schema.validate(tenant.as_str(), &document.settings) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(tenant = %tenant, error = %e, "Stored tenant settings are invalid");
                return None;
            }
        };

        if self.data_sources.uses_cache()
            && let Err(e) = self.cache.set(tenant, &settings).await
        {
            tracing::warn!(tenant = %tenant, error = %e, "Tenant cache write failed");
        }

        tracing::debug!(tenant = %tenant, "Tenant settings served from store");
        Some(settings)
    }

    /// Whether `tenant` is listed in the tenants file.
    pub fn contains(&self, tenant: &str) -> bool {
        self.settings.contains_key(tenant)
    }

    pub fn general(&self) -> &GeneralSettings {
        &self.general
    }

    /// Settings loaded from the tenants file.
    pub fn settings(&self) -> &HashMap<TenantId, T> {
        &self.settings
    }

    pub fn selector(&self) -> &TenantSourceSelector {
        &self.selector
    }

    pub fn data_sources(&self) -> DataSourceConfig {
        self.data_sources
    }

    pub fn schema(&self) -> &SettingsSchema<T> {
        &self.schema
    }

    pub fn store(&self) -> Option<&Arc<dyn SettingsDocumentStore>> {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &TenantSettingsCache {
        &self.cache
    }
}

impl<T> fmt::Debug for TenantConfigs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantConfigs")
            .field("project", &self.general.project_name)
            .field("tenants", &self.settings.len())
            .field("data_sources", &self.data_sources)
            .field("cache", &self.cache)
            .field("store", &self.store.is_some())
            .finish()
    }
}

/// Builder for [`TenantConfigs`]
///
/// # Examples
///
/// ```rust,ignore
/// let configs = TenantConfigs::<MySettings>::builder()
///     .path("config/tenants.yaml")
///     .cache(CacheLayer::connect(CacheConfig::from_env()).await)
///     .store(Arc::new(MongoSettingsStore::new(client)))
///     .build::<MySettings>()
///     .await?;
/// ```
pub struct TenantConfigsBuilder {
    path: Option<PathBuf>,
    document: Option<TenantsDocument>,
    cache: CacheLayer,
    store: Option<Arc<dyn SettingsDocumentStore>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    env: EnvLoader,
}

impl TenantConfigsBuilder {
    pub fn new() -> Self {
        Self {
            path: None,
            document: None,
            cache: CacheLayer::disabled(),
            store: None,
            authenticator: None,
            env: EnvLoader::default(),
        }
    }

    /// Tenants file to load. Defaults to `./tenants.yaml`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use an already parsed tenants document instead of a file.
    pub fn document(mut self, document: TenantsDocument) -> Self {
        self.document = Some(document);
        self
    }

    pub fn cache(mut self, cache: CacheLayer) -> Self {
        self.cache = cache;
        self
    }

    pub fn store(mut self, store: Arc<dyn SettingsDocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Authenticator for claim sources. Defaults to the IAM sidecar.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn env(mut self, env: EnvLoader) -> Self {
        self.env = env;
        self
    }

    /// Load the tenants file and wire every source.
    pub async fn build<T: TenantSettings>(self) -> Result<TenantConfigs<T>, ConfigError> {
        let document = match self.document {
            Some(document) => document,
            None => {
                let path = self.path.unwrap_or_else(default_tenants_path);
                TenantsDocument::load(&path)?
            }
        };

        let general = load_general(&document, &self.cache, &self.env).await?;

        let mut settings = HashMap::new();
        for (tenant, value) in document.settings::<T>()? {
            let id = TenantId::new(&tenant).map_err(|e| ConfigError::validation(&tenant, e))?;
            settings.insert(id, value);
        }

        let authenticator = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(
                SidecarAuth::new(general.iam_sidecar_url.clone())
                    .map_err(|e| ConfigError::validation("IAM_SIDECAR_URL", e))?,
            ),
        };

        let selector = TenantSourceSelector::new(
            settings.iter().map(|(id, value)| (id, value.website_urls())),
            authenticator,
        );
        let data_sources = DataSourceConfig::resolve(self.cache.is_enabled(), self.store.is_some());
        let cache = TenantSettingsCache::new(&self.cache, &general);

        tracing::info!(
            project = %general.project_name,
            environment = %general.environment,
            tenants = settings.len(),
            data_sources = %data_sources,
            "Tenant settings loaded"
        );

        Ok(TenantConfigs {
            schema: SettingsSchema::new(document.defaults().clone()),
            general,
            settings: Arc::new(settings),
            selector,
            data_sources,
            cache,
            store: self.store,
        })
    }
}

impl Default for TenantConfigsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// General settings, with the cached entry of the project merged over the
/// file defaults when a cache is available.
async fn load_general(
    document: &TenantsDocument,
    cache: &CacheLayer,
    env: &EnvLoader,
) -> Result<GeneralSettings, ConfigError> {
    let defaults = document.defaults();
    let general = GeneralSettings::from_defaults_with(defaults, env)?;
    if !cache.is_enabled() {
        return Ok(general);
    }

    let project = general.project_name.clone();
    let cached = cache
        .scoped(GENERAL_CACHE_NAMESPACE)
        .get::<RawSettings>(&project)
        .await;

    match cached {
        Ok(Some(overrides)) => {
            tracing::debug!(project = %project, "General settings served from cache");
            GeneralSettings::from_defaults_with(&merge_settings(defaults, &overrides), env)
        }
        Ok(None) => Ok(general),
        Err(e) => {
            tracing::warn!(project = %project, error = %e, "General settings cache read failed");
            Ok(general)
        }
    }
}
