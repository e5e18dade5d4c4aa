//! Tenant settings administration
//!
//! Read the settings schema, read a tenant's settings, and replace a tenant's
//! stored override. Writes go to the document store first; the cache entry
//! is dropped afterwards so the next read refills it from the store.

use crate::error::TenantError;
use crate::resolver::TenantConfigs;
use crate::schema::TenantSettings;
use crate::store::SettingsDocument;
use crate::tenant::TenantId;
use bluprint_config::RawSettings;
use serde_json::Value;
use std::sync::Arc;

/// Administrative operations on tenant settings.
#[derive(Debug)]
pub struct TenantSettingsAdmin<T> {
    configs: Arc<TenantConfigs<T>>,
}

impl<T> Clone for TenantSettingsAdmin<T> {
    fn clone(&self) -> Self {
        Self {
            configs: self.configs.clone(),
        }
    }
}

impl<T: TenantSettings> TenantSettingsAdmin<T> {
    pub fn new(configs: Arc<TenantConfigs<T>>) -> Self {
        Self { configs }
    }

    /// JSON schema of the settings record.
    pub fn get_tenant_schema(&self) -> Value {
        self.configs.schema().json_schema()
    }

    pub async fn get_tenant_settings(&self, tenant: &str) -> Result<T, TenantError> {
        let tenant = TenantId::new(tenant)?;
        self.configs.get(&tenant).await
    }

    /// Replace the stored override of `tenant` with `setting`.
    ///
    /// Returns the settings the tenant resolves to from now on.
    pub async fn set_tenant_settings(
        &self,
        setting: RawSettings,
        tenant: &str,
    ) -> Result<T, TenantError> {
        let tenant = TenantId::new(tenant)?;
        let validated = self.configs.schema().validate(tenant.as_str(), &setting)?;

        let store = self
            .configs
            .store()
            .ok_or_else(|| TenantError::Storage("no settings store configured".to_string()))?;
        store
            .save(SettingsDocument::new(tenant.clone(), setting))
            .await
            .map_err(|e| TenantError::Storage(e.to_string()))?;

        if let Err(e) = self.configs.cache().delete(&tenant).await {
            tracing::warn!(tenant = %tenant, error = %e, "Tenant cache invalidation failed");
        }

        tracing::info!(tenant = %tenant, "Tenant settings updated");
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryDocumentStore, SettingsDocumentStore};
    use bluprint_config::TenantsDocument;
    use bluprint_jwt::UnverifiedAuth;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Settings {
        #[serde(rename = "SEATS")]
        seats: u32,
    }

    impl TenantSettings for Settings {}

    async fn admin(store: Option<Arc<InMemoryDocumentStore>>) -> TenantSettingsAdmin<Settings> {
        let document = TenantsDocument::from_value(json!({
            "default": {"PROJECT_NAME": "billing", "SEATS": 5},
            "acme": {},
        }))
        .unwrap();

        let mut builder = TenantConfigs::<Settings>::builder()
            .document(document)
            .authenticator(Arc::new(UnverifiedAuth));
        if let Some(store) = store {
            builder = builder.store(store);
        }
        TenantSettingsAdmin::new(Arc::new(builder.build().await.unwrap()))
    }

    fn raw(value: Value) -> RawSettings {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_saves_document() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let admin = admin(Some(store.clone())).await;

        let settings = admin
            .set_tenant_settings(raw(json!({"SEATS": 12})), "acme")
            .await
            .unwrap();
        assert_eq!(settings.seats, 12);

        let acme = TenantId::new("acme").unwrap();
        let saved = store.find_one(&acme).await.unwrap().unwrap();
        assert_eq!(saved.settings, raw(json!({"SEATS": 12})));
        assert_eq!(admin.get_tenant_settings("acme").await.unwrap().seats, 12);
    }

    #[tokio::test]
    async fn test_invalid_settings_are_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let admin = admin(Some(store.clone())).await;

        let result = admin
            .set_tenant_settings(raw(json!({"SEATS": "many"})), "acme")
            .await;
        assert!(matches!(result, Err(TenantError::InvalidSettings(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_without_store() {
        let admin = admin(None).await;

        let result = admin.set_tenant_settings(raw(json!({"SEATS": 1})), "acme").await;
        assert!(matches!(result, Err(TenantError::Storage(_))));
    }

    #[tokio::test]
    async fn test_schema_and_unknown_tenant() {
        let admin = admin(None).await;

        assert!(admin.get_tenant_schema()["properties"]["SEATS"].is_object());
        assert!(matches!(
            admin.get_tenant_settings("initech").await,
            Err(TenantError::NotFound(_))
        ));
    }
}
