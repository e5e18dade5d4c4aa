//! Integration tests for common Bluprint workflows.

use bluprint::bluprint_config::TenantsDocument;
use bluprint::bluprint_jwt::UnverifiedAuth;
use bluprint::prelude::*;
use bluprint::{InMemoryDocumentStore, TenantConfigs};
use bluprint_cache::InMemoryCache;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Settings {
    title: String,
    #[serde(default)]
    seats: u32,
    website_url: WebsiteUrls,
}

impl TenantSettings for Settings {
    fn website_urls(&self) -> Vec<String> {
        self.website_url.urls()
    }
}

fn document() -> TenantsDocument {
    TenantsDocument::from_value(json!({
        "default": {
            "PROJECT_NAME": "storefront",
            "ENVIRONMENT": "production",
            "TITLE": "Storefront",
            "WEBSITE_URL": "https://shop.example.com",
        },
        "acme": {"TITLE": "Acme Shop", "WEBSITE_URL": "https://shop.acme.example.com"},
        "globex": {"WEBSITE_URL": ["https://globex.example.com", "https://shop.globex.example.com"]},
    }))
    .unwrap()
}

#[tokio::test]
async fn test_request_to_settings_workflow() {
    let bluprint = Bluprint::<Settings>::new();
    let store = Arc::new(InMemoryDocumentStore::new());
    let memory = InMemoryCache::new();

    let configs = bluprint
        .initialize(
            TenantConfigs::<Settings>::builder()
                .document(document())
                .cache(CacheLayer::from_store(Arc::new(memory.clone())))
                .store(store.clone())
                .authenticator(Arc::new(UnverifiedAuth)),
        )
        .await
        .unwrap();
    assert_eq!(configs.general().api_prefix(), "/api/storefront");

    let by_host = configs.selector().dependency(TenantSourceKind::HeaderHost);
    let request =
        InboundRequest::new("GET", "/api/storefront/cart").with_header("x-forwarded-host", "shop.globex.example.com");

    let settings = configs.settings_for(&by_host, &request).await.unwrap();
    assert_eq!(settings.title, "Storefront");
    assert_eq!(settings.seats, 0);

    // An administrator raises the seat count
    let admin = bluprint.admin().unwrap();
    admin
        .set_tenant_settings(
            json!({"SEATS": 50}).as_object().cloned().unwrap(),
            "globex",
        )
        .await
        .unwrap();

    let settings = configs.settings_for(&by_host, &request).await.unwrap();
    assert_eq!(settings.seats, 50);
    assert_eq!(
        memory.keys().await,
        vec!["cache:production:storefront:globex".to_string()]
    );
}

#[tokio::test]
async fn test_health_reflects_backends() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let health = HealthService::new()
        .with_indicator(CacheHealthIndicator::new(CacheLayer::disabled()))
        .with_indicator(DocumentStoreHealthIndicator::new(store));

    let response = health.check().await;
    assert!(response.status.is_healthy());
    assert_eq!(response.components["store"].status, HealthStatus::Up);
}

#[tokio::test]
async fn test_errors_map_to_status_codes() {
    let configs = TenantConfigs::<Settings>::builder()
        .document(document())
        .authenticator(Arc::new(UnverifiedAuth))
        .build::<Settings>()
        .await
        .unwrap();
    let by_host = configs.selector().dependency(TenantSourceKind::HeaderHost);

    let missing_header = InboundRequest::new("GET", "/");
    let err = configs.settings_for(&by_host, &missing_header).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let unknown = InboundRequest::new("GET", "/").with_header("x-forwarded-host", "shop.example.com");
    let err = configs.settings_for(&by_host, &unknown).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    let by_claim = configs.selector().dependency(TenantSourceKind::Claim);
    let err = configs.settings_for(&by_claim, &missing_header).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
}
