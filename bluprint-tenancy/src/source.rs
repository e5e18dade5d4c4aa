//! Tenant identity sources
//!
//! Each source reads a raw tenant identifier from one part of an inbound
//! request or message. Normalization and the membership check are applied
//! by [`TenantDependency`](crate::TenantDependency).

use crate::error::TenantError;
use crate::request::{Inbound, InboundRequest, MessageContext};
use crate::tenant::TenantId;
use bluprint_jwt::{Authenticator, RequestTarget, UserClaims, bearer_token, decode_unverified};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Header carrying the public host a request was addressed to.
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";

/// Path parameter holding the tenant id.
pub const TENANT_PATH_PARAM: &str = "tenant";

/// Message context entry holding the tenant id.
pub const TENANT_CONTEXT_KEY: &str = "tenant";

/// Host → tenant table built from the tenants' website URLs.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    hosts: HashMap<String, TenantId>,
}

impl HostTable {
    /// Build the table from `(tenant, urls)` pairs.
    ///
    /// Only the host part of each URL is kept. URLs that do not parse or
    /// have no host are skipped with a warning.
    pub fn build<'a, I>(tenants: I) -> Self
    where
        I: IntoIterator<Item = (&'a TenantId, Vec<String>)>,
    {
        let mut hosts = HashMap::new();
        for (tenant, urls) in tenants {
            for raw in urls {
                match url::Url::parse(&raw) {
                    Ok(parsed) => match parsed.host_str() {
                        Some(host) => {
                            hosts.insert(host.to_lowercase(), tenant.clone());
                        }
                        None => tracing::warn!(tenant = %tenant, url = %raw, "Website URL has no host"),
                    },
                    Err(e) => {
                        tracing::warn!(tenant = %tenant, url = %raw, error = %e, "Invalid website URL")
                    }
                }
            }
        }
        Self { hosts }
    }

    /// Tenant served at `host`.
    ///
    /// The first entry of a comma-separated header value is used and any
    /// port is ignored.
    pub fn lookup(&self, host: &str) -> Option<&TenantId> {
        self.hosts.get(&normalize_host(host))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

fn normalize_host(value: &str) -> String {
    let host = value.split(',').next().unwrap_or(value).trim();

    let host = if let Some(rest) = host.strip_prefix('[') {
        // [::1]:8080
        rest.split(']').next().unwrap_or(rest)
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        }
    };

    host.to_lowercase()
}

/// Where a tenant identifier is read from.
#[derive(Clone)]
pub enum TenantSource {
    /// `x-forwarded-host` header mapped through the host table
    HeaderHost(Arc<HostTable>),
    /// `tenant` path parameter
    PathSegment,
    /// `token` field of a JSON body, decoded without verification
    BodyToken,
    /// `Authorization: Bearer` token checked by the authenticator
    Claim {
        authenticator: Arc<dyn Authenticator>,
        optional: bool,
    },
    /// `tenant` entry of a broker message context
    MessageContext,
}

impl TenantSource {
    /// Read the raw tenant identifier.
    ///
    /// `Ok(None)` means "no tenant" and is only produced by an optional
    /// claim source without credentials.
    pub async fn extract(&self, inbound: Inbound<'_>) -> Result<Option<String>, TenantError> {
        match (self, inbound) {
            (TenantSource::HeaderHost(hosts), Inbound::Http(request)) => {
                from_forwarded_host(hosts, request).map(Some)
            }
            (TenantSource::PathSegment, Inbound::Http(request)) => {
                from_path(request).map(Some)
            }
            (TenantSource::BodyToken, Inbound::Http(request)) => {
                from_body_token(request).map(Some)
            }
            (
                TenantSource::Claim {
                    authenticator,
                    optional,
                },
                Inbound::Http(request),
            ) => from_claims(authenticator.as_ref(), *optional, request).await,
            (TenantSource::MessageContext, Inbound::Message(message)) => {
                from_message(message).map(Some)
            }
            (source, inbound) => Err(TenantError::Unsupported(format!(
                "{} source cannot read a {}",
                source, inbound
            ))),
        }
    }
}

impl fmt::Display for TenantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantSource::HeaderHost(_) => f.write_str("header host"),
            TenantSource::PathSegment => f.write_str("path segment"),
            TenantSource::BodyToken => f.write_str("body token"),
            TenantSource::Claim { optional: false, .. } => f.write_str("claim"),
            TenantSource::Claim { optional: true, .. } => f.write_str("optional claim"),
            TenantSource::MessageContext => f.write_str("message context"),
        }
    }
}

impl fmt::Debug for TenantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantSource::HeaderHost(hosts) => {
                f.debug_tuple("HeaderHost").field(&hosts.len()).finish()
            }
            TenantSource::Claim { optional, .. } => f
                .debug_struct("Claim")
                .field("optional", optional)
                .finish_non_exhaustive(),
            other => write!(f, "{}", other),
        }
    }
}

fn from_forwarded_host(hosts: &HostTable, request: &InboundRequest) -> Result<String, TenantError> {
    let host = request.header(FORWARDED_HOST_HEADER).ok_or_else(|| {
        TenantError::BadRequest(format!("Missing {} header", FORWARDED_HOST_HEADER))
    })?;

    hosts
        .lookup(host)
        .map(|tenant| tenant.to_string())
        .ok_or_else(|| TenantError::UnknownHost(host.to_string()))
}

fn from_path(request: &InboundRequest) -> Result<String, TenantError> {
    request
        .param(TENANT_PATH_PARAM)
        .map(str::to_string)
        .ok_or_else(|| {
            TenantError::BadRequest(format!("Missing {} path parameter", TENANT_PATH_PARAM))
        })
}

fn from_body_token(request: &InboundRequest) -> Result<String, TenantError> {
    let body: serde_json::Value = request
        .json()
        .map_err(|_| TenantError::BadRequest("Request body is not JSON decodable.".to_string()))?;

    let token = body
        .get("token")
        .and_then(|token| token.as_str())
        .ok_or_else(|| TenantError::BadRequest("Token not found in request body.".to_string()))?;

    let claims: UserClaims = decode_unverified(token)?;
    Ok(claims.tenant)
}

async fn from_claims(
    authenticator: &dyn Authenticator,
    optional: bool,
    request: &InboundRequest,
) -> Result<Option<String>, TenantError> {
    let Some(token) = request.header("authorization").and_then(bearer_token) else {
        if optional {
            return Ok(None);
        }
        return Err(TenantError::Unauthorized("missing bearer token".to_string()));
    };

    let claims = authenticator
        .authenticate(token, RequestTarget::new(&request.method, &request.path))
        .await?;
    Ok(Some(claims.tenant))
}

fn from_message(message: &MessageContext) -> Result<String, TenantError> {
    message
        .get(TENANT_CONTEXT_KEY)
        .map(str::to_string)
        .ok_or(TenantError::MissingContext)
}
