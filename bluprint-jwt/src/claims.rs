// Claims carried by IAM access tokens

use serde::{Deserialize, Deserializer, Serialize};

/// Role granted to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

/// Identity of the caller as issued by IAM.
///
/// The tenant travels in the `owner` claim (`tenant` is accepted too) and
/// the username in `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(rename = "owner", alias = "tenant")]
    pub tenant: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "name")]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<Role>,
}

impl UserClaims {
    pub fn new(tenant: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            id: None,
            username: username.into(),
            email: None,
            phone: None,
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, name: impl Into<String>) -> Self {
        self.roles.push(Role {
            name: name.into(),
            users: None,
        });
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Role>, D::Error> {
    Ok(Option::<Vec<Role>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_and_name_claims() {
        let claims: UserClaims = serde_json::from_value(json!({
            "owner": "acme",
            "name": "alice",
            "email": "alice@acme.example.com",
        }))
        .unwrap();

        assert_eq!(claims.tenant, "acme");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email.as_deref(), Some("alice@acme.example.com"));
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn test_tenant_alias() {
        let claims: UserClaims =
            serde_json::from_value(json!({"tenant": "acme", "name": "alice"})).unwrap();
        assert_eq!(claims.tenant, "acme");
    }

    #[test]
    fn test_null_roles_are_empty() {
        let claims: UserClaims =
            serde_json::from_value(json!({"owner": "acme", "name": "alice", "roles": null}))
                .unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn test_roles() {
        let claims: UserClaims = serde_json::from_value(json!({
            "owner": "acme",
            "name": "alice",
            "roles": [{"name": "admin"}, {"name": "viewer", "users": ["bob"]}],
        }))
        .unwrap();

        assert!(claims.has_role("admin"));
        assert!(!claims.has_role("owner"));
        assert_eq!(claims.roles[1].users, Some(vec!["bob".to_string()]));
    }

    #[test]
    fn test_missing_owner_rejected() {
        let result = serde_json::from_value::<UserClaims>(json!({"name": "alice"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_with_claim_names() {
        let value = serde_json::to_value(UserClaims::new("acme", "alice").with_role("admin")).unwrap();

        assert_eq!(value["owner"], "acme");
        assert_eq!(value["name"], "alice");
        assert_eq!(value["roles"][0]["name"], "admin");
        assert!(value.get("email").is_none());
    }
}
