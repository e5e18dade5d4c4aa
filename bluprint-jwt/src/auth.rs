// Authenticators turning a bearer token into user claims

use crate::claims::UserClaims;
use crate::error::AuthError;
use crate::token::decode_unverified;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Route a token is presented to, checked against the IAM ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    pub method: &'a str,
    pub path: &'a str,
}

impl<'a> RequestTarget<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self { method, path }
    }
}

/// Authentication strategy for bearer tokens.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate `token` for `target` and return its claims.
    async fn authenticate(
        &self,
        token: &str,
        target: RequestTarget<'_>,
    ) -> Result<UserClaims, AuthError>;
}

/// Reads claims without any verification.
///
/// For services behind a gateway that already verified the token, and for
/// tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedAuth;

#[async_trait]
impl Authenticator for UnverifiedAuth {
    async fn authenticate(
        &self,
        token: &str,
        _target: RequestTarget<'_>,
    ) -> Result<UserClaims, AuthError> {
        Ok(decode_unverified(token)?)
    }
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    #[serde(default)]
    active: bool,
}

/// Verifies tokens with the IAM sidecar before reading their claims.
///
/// Two calls are made per token: `POST {base}/introspect` must report the
/// token active, then `POST {base}/acl` must allow the method and path.
#[derive(Debug, Clone)]
pub struct SidecarAuth {
    client: reqwest::Client,
    base_url: String,
}

impl SidecarAuth {
    /// Sidecar client with a 10 second request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn introspect(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/introspect", self.base_url))
            .json(&json!({ "token": token }))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(AuthError::Forbidden(response.text().await.unwrap_or_default()));
        }

        let data: IntrospectionResponse = response.json().await?;
        if !data.active {
            return Err(AuthError::Forbidden("Inactive token".to_string()));
        }
        Ok(())
    }

    async fn acl(&self, token: &str, target: RequestTarget<'_>) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/acl", self.base_url))
            .json(&json!({
                "token": token,
                "endpoint": target.path,
                "method": target.method,
            }))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(AuthError::Forbidden(response.text().await.unwrap_or_default()));
        }

        let allowed: Value = response.json().await?;
        if !is_truthy(&allowed) {
            return Err(AuthError::Forbidden(format!(
                "{} {} is not allowed",
                target.method, target.path
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Authenticator for SidecarAuth {
    async fn authenticate(
        &self,
        token: &str,
        target: RequestTarget<'_>,
    ) -> Result<UserClaims, AuthError> {
        self.introspect(token).await?;
        self.acl(token, target).await?;

        let claims: UserClaims = decode_unverified(token)?;
        tracing::debug!(
            tenant = %claims.tenant,
            user = %claims.username,
            method = target.method,
            path = target.path,
            "Token verified by IAM sidecar"
        );
        Ok(claims)
    }
}

// `null`, `false`, `0`, `""`, `[]` and `{}` deny
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!({"allowed": true})));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!("")));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let auth = SidecarAuth::with_client(reqwest::Client::new(), "http://iam:8000/sidecar/");
        assert_eq!(auth.base_url(), "http://iam:8000/sidecar");
    }

    #[tokio::test]
    async fn test_unverified_auth_reads_claims() {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &json!({"owner": "acme", "name": "alice"}),
            &jsonwebtoken::EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let claims = UnverifiedAuth
            .authenticate(&token, RequestTarget::new("GET", "/api/billing/invoices"))
            .await
            .unwrap();
        assert_eq!(claims.tenant, "acme");
    }
}
