// Tenant settings files and process-wide settings for Bluprint services

pub mod env;
pub mod error;
pub mod general;
pub mod loader;
pub mod merge;
pub mod tenants;

pub use env::{EnvLoader, load_dotenv};
pub use error::{ConfigError, Result};
pub use general::GeneralSettings;
pub use loader::ConfigLoader;
pub use merge::{RawSettings, merge_and_validate, merge_settings, validate_settings};
pub use tenants::{
    DEFAULT_CONFIG_KEY, DEFAULT_TENANTS_FILE, TenantsDocument, default_tenants_path,
    load_defaults, load_settings,
};
