//! Tenant identifiers

use crate::error::TenantError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Tenant identifier: non-empty, surrounding whitespace stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Normalize a raw identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluprint_tenancy::TenantId;
    ///
    /// let tenant = TenantId::new("  acme ").unwrap();
    /// assert_eq!(tenant.as_str(), "acme");
    ///
    /// assert!(TenantId::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TenantError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TenantError::Invalid(
                "tenant identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TenantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TenantId {
    type Error = TenantError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(tenant: TenantId) -> Self {
        tenant.0
    }
}
