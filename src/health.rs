//! Health checks for the backends a Bluprint service depends on.
//!
//! ```rust,ignore
//! use bluprint::health::{CacheHealthIndicator, DocumentStoreHealthIndicator, HealthService};
//!
//! let health = HealthService::new()
//!     .with_indicator(CacheHealthIndicator::new(cache.clone()))
//!     .with_indicator(DocumentStoreHealthIndicator::new(store.clone()));
//!
//! let response = health.check().await;
//! assert!(response.status.is_healthy());
//! ```

use async_trait::async_trait;
use bluprint_cache::CacheLayer;
use bluprint_tenancy::SettingsDocumentStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Health status of a component or the overall service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// Component is functioning normally
    Up,
    /// Component is not functioning
    Down,
    /// Component is functioning but with issues
    Degraded,
    /// Component status is unknown
    #[default]
    Unknown,
}

impl HealthStatus {
    /// Returns true if the status indicates the component is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded)
    }

    /// Returns the HTTP status code for this health status
    pub fn http_status_code(&self) -> u16 {
        match self {
            HealthStatus::Up | HealthStatus::Degraded => 200,
            HealthStatus::Down | HealthStatus::Unknown => 503,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Up => write!(f, "UP"),
            HealthStatus::Down => write!(f, "DOWN"),
            HealthStatus::Degraded => write!(f, "DEGRADED"),
            HealthStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Result of a health check for a single component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub details: HashMap<String, String>,
    /// Time taken to perform the check, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether a failure of this component takes the service down
    #[serde(default)]
    pub critical: bool,
}

impl HealthCheckResult {
    fn with_status(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            details: HashMap::new(),
            duration_ms: None,
            error: None,
            critical: false,
        }
    }

    pub fn up(name: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Up)
    }

    pub fn down(name: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Down)
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Unknown)
    }

    /// Adds a detail to the health check result
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Sets the error message and marks the component down
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.status = HealthStatus::Down;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Aggregated health of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub components: HashMap<String, HealthCheckResult>,
    pub timestamp: u64,
}

impl HealthResponse {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            components: HashMap::new(),
            timestamp: current_timestamp(),
        }
    }

    /// Overall status from the component results.
    ///
    /// A critical component that is down takes the service down; any other
    /// unhealthy component only degrades it.
    pub fn calculate_status(&mut self) {
        let critical_down = self
            .components
            .values()
            .any(|c| c.critical && !c.status.is_healthy());
        let any_unhealthy = self.components.values().any(|c| !c.status.is_healthy());
        let any_degraded = self
            .components
            .values()
            .any(|c| c.status == HealthStatus::Degraded);

        self.status = if critical_down {
            HealthStatus::Down
        } else if any_unhealthy || any_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Up
        };
    }
}

/// Trait for implementing health indicators.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Returns the name of this health indicator
    fn name(&self) -> &str;

    /// Performs the health check and returns the result
    async fn check(&self) -> HealthCheckResult;

    /// If a critical indicator fails, the overall status will be DOWN.
    fn is_critical(&self) -> bool {
        false
    }
}

/// Pings the cache backend.
///
/// A disabled cache reports `UNKNOWN`; the service runs without it.
pub struct CacheHealthIndicator {
    cache: CacheLayer,
}

impl CacheHealthIndicator {
    pub fn new(cache: CacheLayer) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthIndicator for CacheHealthIndicator {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthCheckResult {
        if !self.cache.is_enabled() {
            return HealthCheckResult::unknown("cache").with_detail("reason", "cache disabled");
        }

        let start = Instant::now();
        match self.cache.ping().await {
            Ok(()) => HealthCheckResult::up("cache").with_duration(start.elapsed()),
            Err(e) => HealthCheckResult::down("cache")
                .with_error(e.to_string())
                .with_duration(start.elapsed()),
        }
    }
}

/// Pings the settings document store.
pub struct DocumentStoreHealthIndicator {
    store: Arc<dyn SettingsDocumentStore>,
}

impl DocumentStoreHealthIndicator {
    pub fn new(store: Arc<dyn SettingsDocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HealthIndicator for DocumentStoreHealthIndicator {
    fn name(&self) -> &str {
        "store"
    }

    async fn check(&self) -> HealthCheckResult {
        let start = Instant::now();
        match self.store.ping().await {
            Ok(()) => HealthCheckResult::up("store").with_duration(start.elapsed()),
            Err(e) => HealthCheckResult::down("store")
                .with_error(e.to_string())
                .with_duration(start.elapsed()),
        }
    }

    fn is_critical(&self) -> bool {
        true
    }
}

/// Runs every registered indicator and aggregates the results.
#[derive(Default)]
pub struct HealthService {
    indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a health indicator
    pub fn with_indicator(mut self, indicator: impl HealthIndicator + 'static) -> Self {
        self.indicators.push(Arc::new(indicator));
        self
    }

    pub fn register(&mut self, indicator: Arc<dyn HealthIndicator>) {
        self.indicators.push(indicator);
    }

    /// Performs a full health check on all registered indicators
    pub async fn check(&self) -> HealthResponse {
        let mut response = HealthResponse::new(HealthStatus::Up);

        // Run all health checks concurrently
        let futures: Vec<_> = self
            .indicators
            .iter()
            .map(|indicator| {
                let indicator = Arc::clone(indicator);
                async move {
                    let start = Instant::now();
                    let mut result = indicator.check().await;
                    if result.duration_ms.is_none() {
                        result.duration_ms = Some(start.elapsed().as_millis() as u64);
                    }
                    result.critical = indicator.is_critical();
                    result
                }
            })
            .collect();

        for result in join_all(futures).await {
            if !result.status.is_healthy() {
                tracing::warn!(
                    component = %result.name,
                    status = %result.status,
                    error = result.error.as_deref().unwrap_or(""),
                    "Health check failed"
                );
            }
            response.components.insert(result.name.clone(), result);
        }

        response.calculate_status();
        response
    }

    /// Returns the number of registered indicators
    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
