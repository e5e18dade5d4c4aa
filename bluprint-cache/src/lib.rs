//! Settings cache for Bluprint services.
//!
//! Provides a small store interface with Redis and in-memory backends, and a
//! [`CacheLayer`] that decides once at startup whether caching is available.
//!
//! # Features
//!
//! - `redis` - Enable Redis cache support (enabled by default)
//!
//! # Examples
//!
//! ```no_run
//! use bluprint_cache::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CacheError> {
//!     // Disabled (with a warning) when Redis does not answer PING
//!     let cache = CacheLayer::connect(CacheConfig::from_env()).await;
//!     let tenants = cache.scoped("production:billing");
//!
//!     tenants.set("acme", &serde_json::json!({"title": "Acme"})).await?;
//!     let cached: Option<serde_json::Value> = tenants.get("acme").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod memory;
pub mod traits;

#[cfg(feature = "redis")]
pub mod redis_cache;

pub use config::{CacheConfig, DEFAULT_REDIS_URL};
pub use error::{CacheError, CacheResult};
pub use layer::{CacheLayer, DEFAULT_KEY_PREFIX};
pub use memory::InMemoryCache;
pub use traits::CacheStore;

#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::layer::CacheLayer;
    pub use crate::memory::InMemoryCache;
    pub use crate::traits::CacheStore;

    #[cfg(feature = "redis")]
    pub use crate::redis_cache::RedisCache;
}
