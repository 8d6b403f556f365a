//! Shared fixtures for `slotbook-api` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use slotbook_api::{router, AppContext};
use slotbook_core::ConfigRepository;
use slotbook_domain::SchedulerConfig;
use slotbook_infra::config::{AppConfig, DatabaseSettings, ServerSettings};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    // Held so the directory outlives the pool.
    _dir: TempDir,
    pub context: Arc<AppContext>,
    pub router: Router,
}

/// A running route table over a migrated temp database with one seeded
/// tenant (`acme`) and its meeting types.
pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = AppConfig {
        database: DatabaseSettings {
            path: dir.path().join("slotbook.db").to_string_lossy().into_owned(),
            pool_size: 4,
        },
        server: ServerSettings {
            bind_addr: "127.0.0.1:0".into(),
            admin_token: Some(ADMIN_TOKEN.into()),
        },
        google: None,
        outlook: None,
        email: None,
        webhook: None,
        provider_timeout_secs: 2,
    };

    let context = Arc::new(AppContext::new(config).expect("build context"));
    seed(&context).await;

    TestApp { _dir: dir, router: router(context.clone()), context }
}

async fn seed(context: &AppContext) {
    let conn = context.db.get_connection().expect("connection");
    conn.execute(
        "INSERT INTO tenants (id, slug, display_name, email, created_at) \
         VALUES ('t1', 'acme', 'Acme Consulting', 'owner@acme.test', 0)",
        [],
    )
    .expect("insert tenant");
    conn.execute(
        "INSERT INTO meeting_types (id, tenant_id, name, duration_minutes, location_type) \
         VALUES ('mt1', 't1', 'Intro Call', 30, 'virtual'), \
                ('mt2', 't1', 'Phone Consultation', 15, 'phone')",
        [],
    )
    .expect("insert meeting types");
    drop(conn);

    context
        .configs
        .upsert(&SchedulerConfig::defaults("t1", "Acme Consulting"))
        .await
        .expect("seed config");
}

pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    admin: bool,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if admin {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = router.clone().oneshot(request).await.expect("route request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("read body").to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(router, Method::GET, uri, None, false).await
}

pub async fn get_admin(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(router, Method::GET, uri, None, true).await
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(router, Method::POST, uri, Some(body), false).await
}

pub async fn patch_admin(
    router: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(router, Method::PATCH, uri, Some(body), true).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(router, Method::DELETE, uri, None, false).await
}

pub async fn delete_admin(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(router, Method::DELETE, uri, None, true).await
}

/// A valid booking payload for the seeded `Intro Call` meeting type.
pub fn booking_payload(date: &str, time: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "time": time,
        "durationMinutes": 30,
        "meetingType": "Intro Call",
        "clientName": "Pat Doe",
        "clientEmail": "pat@example.com",
    })
}
