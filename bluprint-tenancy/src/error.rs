//! Tenant resolution errors

use bluprint_config::ConfigError;
use bluprint_jwt::{AuthError, JwtError};

/// Errors surfaced to callers of the tenancy layer.
///
/// Each variant maps to the HTTP status an adapter should answer with.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Tenant {0} not found in settings")]
    NotFound(String),

    #[error("No tenant is served at host {0}")]
    UnknownHost(String),

    #[error("Invalid tenant identifier: {0}")]
    Invalid(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Message has no tenant in its context")]
    MissingContext,

    #[error("Unsupported tenant source: {0}")]
    Unsupported(String),

    #[error("Invalid tenant settings: {0}")]
    InvalidSettings(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TenantError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            TenantError::NotFound(_) | TenantError::UnknownHost(_) => 404,
            TenantError::Invalid(_)
            | TenantError::BadRequest(_)
            | TenantError::MissingContext
            | TenantError::Unsupported(_) => 400,
            TenantError::InvalidClaims(_) | TenantError::InvalidSettings(_) => 422,
            TenantError::Unauthorized(_) => 401,
            TenantError::Forbidden(_) => 403,
            TenantError::Storage(_) => 503,
        }
    }
}

impl From<JwtError> for TenantError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidClaims(msg) => TenantError::InvalidClaims(msg),
            JwtError::InvalidToken(msg) => TenantError::Unauthorized(msg),
        }
    }
}

impl From<AuthError> for TenantError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                TenantError::Unauthorized("missing bearer token".to_string())
            }
            AuthError::Token(e) => e.into(),
            AuthError::Forbidden(msg) => TenantError::Forbidden(msg),
            // Access could not be confirmed
            AuthError::Sidecar(e) => TenantError::Forbidden(e.to_string()),
        }
    }
}

impl From<ConfigError> for TenantError {
    fn from(err: ConfigError) -> Self {
        TenantError::InvalidSettings(err.to_string())
    }
}
