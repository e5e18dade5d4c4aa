// Bluprint - multi-tenant settings for Rust services
//
// Tenant identification, layered per-tenant settings (cache, document store,
// tenants file) and the ambient logging, configuration and health checks a
// service needs around them.

pub mod app;
pub mod health;

pub use app::{Bluprint, REDIS_URL_ENV, cache_from_env, init_logging};

// Re-export member crates
pub use bluprint_cache;
pub use bluprint_config;
pub use bluprint_jwt;
pub use bluprint_log;
pub use bluprint_tenancy;

pub use bluprint_tenancy::*;

// Prelude for common imports
pub mod prelude {
    pub use crate::app::{Bluprint, cache_from_env, init_logging};
    pub use crate::health::{
        CacheHealthIndicator, DocumentStoreHealthIndicator, HealthIndicator, HealthService,
        HealthStatus,
    };
    pub use bluprint_cache::{CacheConfig, CacheLayer};
    pub use bluprint_config::{GeneralSettings, load_dotenv};
    pub use bluprint_tenancy::prelude::*;
}
