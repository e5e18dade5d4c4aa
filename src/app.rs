//! Composition root
//!
//! A service owns one [`Bluprint`] and initializes it at startup. Later
//! initializations hand back the instance built first without touching the
//! tenants file, cache or store again.

use bluprint_cache::CacheLayer;
use bluprint_config::{ConfigError, GeneralSettings};
use bluprint_log::{LogConfig, LogError};
use bluprint_tenancy::{TenantConfigs, TenantConfigsBuilder, TenantSettings, TenantSettingsAdmin};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Environment variable that enables the Redis cache.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Shared tenant settings of a service.
///
/// ```rust,ignore
/// static BLUPRINT: Bluprint<Settings> = Bluprint::new();
///
/// let configs = BLUPRINT
///     .initialize(TenantConfigs::<Settings>::builder().cache(cache_from_env().await))
///     .await?;
/// ```
pub struct Bluprint<T> {
    configs: OnceCell<Arc<TenantConfigs<T>>>,
}

impl<T> Bluprint<T> {
    pub const fn new() -> Self {
        Self {
            configs: OnceCell::const_new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.configs.initialized()
    }

    /// Settings built by [`Bluprint::initialize`], if it ran.
    pub fn configs(&self) -> Option<Arc<TenantConfigs<T>>> {
        self.configs.get().cloned()
    }
}

impl<T: TenantSettings> Bluprint<T> {
    /// Build the tenant settings once.
    ///
    /// Concurrent callers wait for the first build; a failed build leaves the
    /// cell empty so a later call can retry.
    pub async fn initialize(
        &self,
        builder: TenantConfigsBuilder,
    ) -> Result<Arc<TenantConfigs<T>>, ConfigError> {
        if let Some(configs) = self.configs.get() {
            tracing::debug!("Tenant settings already initialized");
            return Ok(configs.clone());
        }

        let configs = self
            .configs
            .get_or_try_init(|| async { builder.build::<T>().await.map(Arc::new) })
            .await?;
        Ok(configs.clone())
    }

    /// Administration handle over the initialized settings.
    pub fn admin(&self) -> Option<TenantSettingsAdmin<T>> {
        self.configs.get().cloned().map(TenantSettingsAdmin::new)
    }
}

impl<T> Default for Bluprint<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache layer for the current environment.
///
/// The cache is only used when `REDIS_URL` is set and the server answers
/// `PING`; otherwise the layer is disabled.
#[cfg(feature = "redis")]
pub async fn cache_from_env() -> CacheLayer {
    match std::env::var(REDIS_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => {
            CacheLayer::connect(bluprint_cache::CacheConfig::redis(url)).await
        }
        _ => {
            tracing::info!("REDIS_URL not set, cache disabled");
            CacheLayer::disabled()
        }
    }
}

/// Cache layer for the current environment; always disabled without Redis
/// support.
#[cfg(not(feature = "redis"))]
pub async fn cache_from_env() -> CacheLayer {
    CacheLayer::disabled()
}

/// Install the log subscriber for a service from its general settings.
pub fn init_logging(general: &GeneralSettings) -> Result<(), LogError> {
    bluprint_log::init(&LogConfig::from_settings(
        general.project_name.clone(),
        &general.log_level,
    ))
}
