//! Source selection
//!
//! Handlers pick how their tenant is identified by kind; the selector hands
//! out a ready [`TenantDependency`] for each kind.

use crate::error::TenantError;
use crate::request::Inbound;
use crate::source::{HostTable, TenantSource};
use crate::tenant::TenantId;
use bluprint_jwt::Authenticator;
use std::collections::HashSet;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// The ways a tenant can be identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantSourceKind {
    HeaderHost,
    PathSegment,
    BodyToken,
    Claim,
    OptionalClaim,
    MessageContext,
}

impl TenantSourceKind {
    pub const ALL: [TenantSourceKind; 6] = [
        TenantSourceKind::HeaderHost,
        TenantSourceKind::PathSegment,
        TenantSourceKind::BodyToken,
        TenantSourceKind::Claim,
        TenantSourceKind::OptionalClaim,
        TenantSourceKind::MessageContext,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TenantSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TenantSourceKind::HeaderHost => "header_host",
            TenantSourceKind::PathSegment => "path_segment",
            TenantSourceKind::BodyToken => "body_token",
            TenantSourceKind::Claim => "claim",
            TenantSourceKind::OptionalClaim => "optional_claim",
            TenantSourceKind::MessageContext => "message_context",
        };
        f.write_str(name)
    }
}

/// Resolves the tenant of an inbound request or message with one source.
#[derive(Debug, Clone)]
pub struct TenantDependency {
    kind: TenantSourceKind,
    source: Arc<TenantSource>,
    tenants: Arc<HashSet<TenantId>>,
}

impl TenantDependency {
    pub fn kind(&self) -> TenantSourceKind {
        self.kind
    }

    /// Tenant of `inbound`, or `None` when an optional source found no
    /// credentials.
    ///
    /// Identifiers are normalized and must name a tenant from the tenants
    /// file.
    pub async fn resolve<'a>(
        &self,
        inbound: impl Into<Inbound<'a>>,
    ) -> Result<Option<TenantId>, TenantError> {
        let Some(raw) = self.source.extract(inbound.into()).await? else {
            return Ok(None);
        };

        let tenant = TenantId::new(raw)?;
        if !self.tenants.contains(&tenant) {
            tracing::debug!(tenant = %tenant, source = %self.kind, "Unknown tenant");
            return Err(TenantError::NotFound(tenant.into_inner()));
        }
        Ok(Some(tenant))
    }

    /// Like [`TenantDependency::resolve`], but a missing tenant is an error.
    pub async fn require<'a>(
        &self,
        inbound: impl Into<Inbound<'a>>,
    ) -> Result<TenantId, TenantError> {
        self.resolve(inbound)
            .await?
            .ok_or_else(|| TenantError::Unauthorized("missing bearer token".to_string()))
    }
}

/// One ready dependency per [`TenantSourceKind`].
#[derive(Debug, Clone)]
pub struct TenantSourceSelector {
    dependencies: [TenantDependency; 6],
}

impl TenantSourceSelector {
    /// Build every source eagerly.
    ///
    /// `tenants` yields each known tenant with its website URLs.
    pub fn new<'a, I>(tenants: I, authenticator: Arc<dyn Authenticator>) -> Self
    where
        I: IntoIterator<Item = (&'a TenantId, Vec<String>)>,
    {
        let tenants: Vec<(&TenantId, Vec<String>)> = tenants.into_iter().collect();
        let known: Arc<HashSet<TenantId>> =
            Arc::new(tenants.iter().map(|(tenant, _)| (*tenant).clone()).collect());
        let hosts = Arc::new(HostTable::build(tenants));

        let dependency = |kind: TenantSourceKind| {
            let source = match kind {
                TenantSourceKind::HeaderHost => TenantSource::HeaderHost(hosts.clone()),
                TenantSourceKind::PathSegment => TenantSource::PathSegment,
                TenantSourceKind::BodyToken => TenantSource::BodyToken,
                TenantSourceKind::Claim => TenantSource::Claim {
                    authenticator: authenticator.clone(),
                    optional: false,
                },
                TenantSourceKind::OptionalClaim => TenantSource::Claim {
                    authenticator: authenticator.clone(),
                    optional: true,
                },
                TenantSourceKind::MessageContext => TenantSource::MessageContext,
            };
            TenantDependency {
                kind,
                source: Arc::new(source),
                tenants: known.clone(),
            }
        };

        Self {
            dependencies: TenantSourceKind::ALL.map(dependency),
        }
    }

    /// Dependency for one source kind.
    pub fn dependency(&self, kind: TenantSourceKind) -> TenantDependency {
        self.dependencies[kind.slot()].clone()
    }

    pub fn tenants(&self) -> &HashSet<TenantId> {
        &self.dependencies[0].tenants
    }
}

impl Index<TenantSourceKind> for TenantSourceSelector {
    type Output = TenantDependency;

    fn index(&self, kind: TenantSourceKind) -> &Self::Output {
        &self.dependencies[kind.slot()]
    }
}
