//! Multi-Tenancy for Bluprint
//!
//! Tenant identification and per-tenant settings resolution.
//!
//! # Features
//!
//! - **Tenant Identification** - Host header, path segment, body token, bearer
//!   claims or broker message context
//! - **Layered Settings** - Cache, then document store, then the tenants file
//! - **Administration** - Schema export and validated settings updates with
//!   cache invalidation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bluprint_tenancy::prelude::*;
//!
//! #[derive(Clone, Serialize, Deserialize, JsonSchema)]
//! struct Settings {
//!     #[serde(rename = "WEBSITE_URL")]
//!     website_url: WebsiteUrls,
//!     #[serde(rename = "SEATS", default)]
//!     seats: u32,
//! }
//!
//! impl TenantSettings for Settings {
//!     fn website_urls(&self) -> Vec<String> {
//!         self.website_url.urls()
//!     }
//! }
//!
//! let configs = TenantConfigs::<Settings>::builder()
//!     .path("tenants.yaml")
//!     .build::<Settings>()
//!     .await?;
//!
//! let by_host = configs.selector().dependency(TenantSourceKind::HeaderHost);
//! let settings = configs.settings_for(&by_host, &request).await?;
//! ```

pub mod admin;
pub mod cache;
pub mod error;
pub mod request;
pub mod resolver;
pub mod schema;
pub mod selector;
pub mod source;
pub mod store;
pub mod tenant;

pub use admin::TenantSettingsAdmin;
pub use cache::TenantSettingsCache;
pub use error::TenantError;
pub use request::{Inbound, InboundRequest, MessageContext};
pub use resolver::{DataSourceConfig, TenantConfigs, TenantConfigsBuilder};
pub use schema::{SettingsSchema, TenantSettings, WebsiteUrls};
pub use selector::{TenantDependency, TenantSourceKind, TenantSourceSelector};
pub use source::{
    FORWARDED_HOST_HEADER, HostTable, TENANT_CONTEXT_KEY, TENANT_PATH_PARAM, TenantSource,
};
pub use store::{InMemoryDocumentStore, SettingsDocument, SettingsDocumentStore, StoreError};
pub use tenant::TenantId;

/// Prelude for common imports
pub mod prelude {
    pub use crate::admin::TenantSettingsAdmin;
    pub use crate::error::TenantError;
    pub use crate::request::{InboundRequest, MessageContext};
    pub use crate::resolver::TenantConfigs;
    pub use crate::schema::{TenantSettings, WebsiteUrls};
    pub use crate::selector::{TenantDependency, TenantSourceKind};
    pub use crate::store::{SettingsDocument, SettingsDocumentStore};
    pub use crate::tenant::TenantId;
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
}
