//! Typed, namespaced access to an optional cache store.
//!
//! Whether a cache is available is decided once, when the layer is created.
//! A disabled layer turns every read into a miss and every write into a
//! no-op, so callers never branch on availability themselves.

use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Prefix shared by every key written through a [`CacheLayer`].
pub const DEFAULT_KEY_PREFIX: &str = "cache";

/// Cache handle that is either backed by a store or disabled.
#[derive(Clone)]
pub struct CacheLayer {
    store: Option<Arc<dyn CacheStore>>,
    prefix: String,
}

impl CacheLayer {
    /// Layer backed by `store`, with the default key prefix.
    pub fn from_store(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store: Some(store),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Layer without a store.
    pub fn disabled() -> Self {
        Self {
            store: None,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Connect to Redis and check it with `PING`.
    ///
    /// Any failure leaves the layer disabled; the service keeps running on
    /// its other settings sources.
    #[cfg(feature = "redis")]
    pub async fn connect(config: crate::CacheConfig) -> Self {
        let url = config.url.clone();
        let ping = async {
            let cache = crate::RedisCache::new(config).await?;
            cache.ping().await?;
            Ok::<_, CacheError>(cache)
        };

        match ping.await {
            Ok(cache) => {
                tracing::info!(url = %url, "Cache enabled");
                Self::from_store(Arc::new(cache))
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Cache unavailable, continuing without it");
                Self::disabled()
            }
        }
    }

    /// Whether a store backs this layer.
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Key prefix of this layer.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Same store, keys nested one level deeper.
    ///
    /// ```
    /// use bluprint_cache::CacheLayer;
    ///
    /// let layer = CacheLayer::disabled().scoped("prod:billing");
    /// assert_eq!(layer.key("acme"), "cache:prod:billing:acme");
    /// ```
    pub fn scoped(&self, namespace: &str) -> Self {
        Self {
            store: self.store.clone(),
            prefix: format!("{}:{}", self.prefix, namespace),
        }
    }

    /// Full key for `key` in this layer.
    pub fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// Read and decode a value. A disabled layer always misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        match store.get_json(&self.key(key)).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| CacheError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Encode and store a value without expiry.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let json =
            serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        store.set_json(&self.key(key), json, None).await
    }

    /// Remove a value.
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match &self.store {
            Some(store) => store.delete(&self.key(key)).await,
            None => Ok(()),
        }
    }

    /// Round-trip to the backing store.
    pub async fn ping(&self) -> CacheResult<()> {
        match &self.store {
            Some(store) => store.ping().await,
            None => Err(CacheError::Disabled),
        }
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("enabled", &self.is_enabled())
            .field("prefix", &self.prefix)
            .finish()
    }
}
