//! Settings Document Store
//!
//! Persistent per-tenant settings overrides. The store is the source of truth
//! that the tenant cache mirrors; services plug in their own database behind
//! [`SettingsDocumentStore`].

use crate::tenant::TenantId;
use async_trait::async_trait;
use bluprint_config::RawSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stored settings override of one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub tenant: TenantId,
    pub settings: RawSettings,
}

impl SettingsDocument {
    pub fn new(tenant: TenantId, settings: RawSettings) -> Self {
        Self { tenant, settings }
    }
}

/// Document store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store query error: {0}")]
    Query(String),

    #[error("Malformed settings document: {0}")]
    Malformed(String),
}

/// Document store holding one [`SettingsDocument`] per tenant.
#[async_trait]
pub trait SettingsDocumentStore: Send + Sync {
    /// Document of `tenant`, if one was saved.
    async fn find_one(&self, tenant: &TenantId) -> Result<Option<SettingsDocument>, StoreError>;

    /// Insert or replace the document of `document.tenant`.
    async fn save(&self, document: SettingsDocument) -> Result<(), StoreError>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// In-memory document store for testing
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: parking_lot::RwLock<HashMap<TenantId, SettingsDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    pub fn with_document(self, tenant: TenantId, settings: RawSettings) -> Self {
        self.documents
            .write()
            .insert(tenant.clone(), SettingsDocument::new(tenant, settings));
        self
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl SettingsDocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, tenant: &TenantId) -> Result<Option<SettingsDocument>, StoreError> {
        Ok(self.documents.read().get(tenant).cloned())
    }

    async fn save(&self, document: SettingsDocument) -> Result<(), StoreError> {
        self.documents
            .write()
            .insert(document.tenant.clone(), document);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
