//! Tenant-Aware Caching
//!
//! Settings of every tenant are cached under
//! `{prefix}:{ENVIRONMENT}:{PROJECT_NAME}:{tenant}`.

use crate::tenant::TenantId;
use bluprint_cache::{CacheLayer, CacheResult};
use bluprint_config::{GeneralSettings, RawSettings};
use serde::Serialize;

/// Cache of resolved tenant settings.
#[derive(Debug, Clone)]
pub struct TenantSettingsCache {
    layer: CacheLayer,
}

impl TenantSettingsCache {
    /// Namespace `layer` for the service described by `general`.
    pub fn new(layer: &CacheLayer, general: &GeneralSettings) -> Self {
        Self {
            layer: layer.scoped(&general.cache_namespace()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.layer.is_enabled()
    }

    /// Full cache key of `tenant`.
    pub fn key(&self, tenant: &TenantId) -> String {
        self.layer.key(tenant.as_str())
    }

    /// Cached settings of `tenant` as a raw object.
    ///
    /// Entries are validated by the caller, so older entries written before a
    /// settings field was added still resolve.
    pub async fn get(&self, tenant: &TenantId) -> CacheResult<Option<RawSettings>> {
        self.layer.get(tenant.as_str()).await
    }

    pub async fn set<T: Serialize>(&self, tenant: &TenantId, settings: &T) -> CacheResult<()> {
        self.layer.set(tenant.as_str(), settings).await
    }

    pub async fn delete(&self, tenant: &TenantId) -> CacheResult<()> {
        self.layer.delete(tenant.as_str()).await
    }
}
