//! Token vault refresh behaviour against a mock token endpoint.

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};
use slotbook_core::CredentialRepository;
use slotbook_domain::{CalendarProviderKind, OAuthCredential};
use slotbook_infra::integrations::calendar::providers::google::GoogleClient;
use slotbook_infra::integrations::calendar::{ProviderRegistry, ProviderSettings};
use slotbook_infra::TokenVault;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{test_http_client, TestDb};

fn settings() -> ProviderSettings {
    ProviderSettings {
        client_id: "cid".into(),
        client_secret: "secret".into(),
        redirect_uri: "http://localhost/api/oauth/google/callback".into(),
    }
}

fn vault_against(db: &TestDb, server: &MockServer) -> TokenVault {
    let google = GoogleClient::with_endpoints(
        test_http_client(),
        settings(),
        format!("{}/token", server.uri()),
        format!("{}/calendar", server.uri()),
        format!("{}/userinfo", server.uri()),
    );
    let registry = ProviderRegistry::new().register(Arc::new(google));
    TokenVault::new(db.credentials.clone(), registry)
}

async fn store_credential(db: &TestDb, expires_in: Duration) {
    db.credentials
        .store(&OAuthCredential {
            tenant_id: "t1".into(),
            provider: CalendarProviderKind::Google,
            access_token: "old-token".into(),
            refresh_token: "refresh-1".into(),
            expires_at: Utc::now() + expires_in,
            scope: "calendar".into(),
        })
        .await
        .expect("store credential");
}

#[tokio::test]
async fn fresh_token_is_returned_without_a_refresh() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::minutes(10)).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vault = vault_against(&db, &server);
    let token = vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();
    assert_eq!(token.as_deref(), Some("old-token"));
}

#[tokio::test]
async fn token_inside_refresh_buffer_is_refreshed_and_stored() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::minutes(4)).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-token",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vault = vault_against(&db, &server);
    let token = vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();
    assert_eq!(token.as_deref(), Some("new-token"));

    let stored = db
        .credentials
        .load("t1", CalendarProviderKind::Google)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.access_token, "new-token");
    // No rotation in the response; the old refresh token survives.
    assert_eq!(stored.refresh_token, "refresh-1");
    assert!(stored.expires_at > Utc::now() + Duration::minutes(50));
}

#[tokio::test]
async fn rotated_refresh_token_replaces_the_stored_one() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::minutes(1)).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-token",
            "refresh_token": "refresh-2",
            "expires_in": 3600,
            "scope": "calendar email",
        })))
        .mount(&server)
        .await;

    let vault = vault_against(&db, &server);
    vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();

    let stored = db
        .credentials
        .load("t1", CalendarProviderKind::Google)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.refresh_token, "refresh-2");
    assert_eq!(stored.scope, "calendar email");
}

#[tokio::test]
async fn invalid_grant_deletes_the_credential() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::minutes(1)).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let vault = vault_against(&db, &server);
    let token = vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();
    assert!(token.is_none());

    // Terminal failure: the tenant now reads as disconnected.
    assert!(db
        .credentials
        .load("t1", CalendarProviderKind::Google)
        .await
        .unwrap()
        .is_none());
    assert!(!vault.is_connected("t1", CalendarProviderKind::Google).await.unwrap());
}

#[tokio::test]
async fn transient_refresh_failure_keeps_the_credential() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::minutes(1)).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let vault = vault_against(&db, &server);
    let token = vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();
    assert!(token.is_none());

    let stored = db
        .credentials
        .load("t1", CalendarProviderKind::Google)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.refresh_token, "refresh-1");
}

#[tokio::test]
async fn missing_credential_yields_none() {
    let db = TestDb::open();
    db.seed_tenant().await;

    let server = MockServer::start().await;
    let vault = vault_against(&db, &server);
    let token = vault
        .access_token("t1", CalendarProviderKind::Google)
        .await
        .unwrap();
    assert!(token.is_none());
}

#[tokio::test]
async fn disconnect_removes_the_credential() {
    let db = TestDb::open();
    db.seed_tenant().await;
    store_credential(&db, Duration::hours(1)).await;

    let server = MockServer::start().await;
    let vault = vault_against(&db, &server);
    assert!(vault.is_connected("t1", CalendarProviderKind::Google).await.unwrap());

    vault.disconnect("t1", CalendarProviderKind::Google).await.unwrap();
    assert!(!vault.is_connected("t1", CalendarProviderKind::Google).await.unwrap());
}
