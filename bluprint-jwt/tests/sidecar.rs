//! IAM sidecar authentication against a mock sidecar

use bluprint_jwt::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token() -> String {
    encode(
        &Header::default(),
        &json!({"owner": "acme", "name": "alice", "roles": [{"name": "admin"}]}),
        &EncodingKey::from_secret(b"iam-secret"),
    )
    .unwrap()
}

fn target() -> RequestTarget<'static> {
    RequestTarget::new("POST", "/api/billing/invoices")
}

#[tokio::test]
async fn test_active_and_allowed_token() {
    let server = MockServer::start().await;
    let token = token();

    Mock::given(method("POST"))
        .and(path("/introspect"))
        .and(body_json(json!({"token": token})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/acl"))
        .and(body_json(json!({
            "token": token,
            "endpoint": "/api/billing/invoices",
            "method": "POST",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let auth = SidecarAuth::new(server.uri()).unwrap();
    let claims = auth.authenticate(&token, target()).await.unwrap();

    assert_eq!(claims.tenant, "acme");
    assert!(claims.has_role("admin"));
}

#[tokio::test]
async fn test_inactive_token_is_forbidden() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": false})))
        .mount(&server)
        .await;
    Mock::given(path("/acl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(0)
        .mount(&server)
        .await;

    let auth = SidecarAuth::new(server.uri()).unwrap();
    let result = auth.authenticate(&token(), target()).await;

    assert!(matches!(result, Err(AuthError::Forbidden(ref msg)) if msg == "Inactive token"));
}

#[tokio::test]
async fn test_introspection_error_status_is_forbidden() {
    let server = MockServer::start().await;

    Mock::given(path("/introspect"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let auth = SidecarAuth::new(server.uri()).unwrap();
    let result = auth.authenticate(&token(), target()).await;

    assert!(matches!(result, Err(AuthError::Forbidden(ref msg)) if msg == "bad token"));
}

#[tokio::test]
async fn test_acl_denial_is_forbidden() {
    let server = MockServer::start().await;

    Mock::given(path("/introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .mount(&server)
        .await;
    Mock::given(path("/acl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let auth = SidecarAuth::new(server.uri()).unwrap();
    let result = auth.authenticate(&token(), target()).await;

    assert!(matches!(result, Err(AuthError::Forbidden(_))));
}

#[tokio::test]
async fn test_unreachable_sidecar() {
    let auth = SidecarAuth::new("http://127.0.0.1:1").unwrap();
    let result = auth.authenticate(&token(), target()).await;

    assert!(matches!(result, Err(AuthError::Sidecar(_))));
}
