//! End-to-end route tests over an in-process router.

mod support;

use axum::http::{Method, StatusCode};

use support::{
    booking_payload, delete, delete_admin, get, get_admin, patch_admin, post_json, request, spawn,
};

// Far enough out that the same-day lead-time cutoff never interferes.
const DATE: &str = "2030-06-24"; // a Monday

#[tokio::test]
async fn health_reports_database_up() {
    let app = spawn().await;
    let (status, body) = get(&app.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn availability_lists_open_slots() {
    let app = spawn().await;
    let (status, body) = get(
        &app.router,
        &format!("/api/tenants/acme/availability?date={DATE}&duration=30"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["data"].as_array().expect("slot array");
    // Default hours 9-17 at a 30-minute step.
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0]["time"], "09:00");
    assert_eq!(slots[0]["display"], "9:00 AM");
    assert_eq!(slots[15]["time"], "16:30");
}

#[tokio::test]
async fn availability_rejects_unsupported_duration() {
    let app = spawn().await;
    let (status, body) = get(
        &app.router,
        &format!("/api/tenants/acme/availability?date={DATE}&duration=45"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn availability_for_unknown_tenant_is_not_found() {
    let app = spawn().await;
    let (status, _) = get(
        &app.router,
        &format!("/api/tenants/nobody/availability?date={DATE}&duration=30"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_lifecycle_create_find_cancel() {
    let app = spawn().await;

    let (status, body) =
        post_json(&app.router, "/api/tenants/acme/bookings", booking_payload(DATE, "10:00")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");
    let id = body["data"]["id"].as_str().expect("booking id").to_string();

    let (status, body) = get(&app.router, &format!("/api/tenants/acme/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["clientEmail"], "pat@example.com");

    // The booked slot disappears from availability.
    let (_, body) = get(
        &app.router,
        &format!("/api/tenants/acme/availability?date={DATE}&duration=30"),
    )
    .await;
    let times: Vec<&str> =
        body["data"].as_array().unwrap().iter().filter_map(|s| s["time"].as_str()).collect();
    assert!(!times.contains(&"10:00"));

    let (status, body) =
        delete_admin(&app.router, &format!("/api/tenants/acme/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    // Cancelling again is an idempotent success.
    let (status, _) =
        delete_admin(&app.router, &format!("/api/tenants/acme/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn double_booking_is_a_conflict() {
    let app = spawn().await;
    let (status, _) =
        post_json(&app.router, "/api/tenants/acme/bookings", booking_payload(DATE, "11:00")).await;
    assert_eq!(status, StatusCode::OK);

    let mut second = booking_payload(DATE, "11:00");
    second["clientEmail"] = serde_json::json!("other@example.com");
    let (status, body) = post_json(&app.router, "/api/tenants/acme/bookings", second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_booking_payload_is_rejected() {
    let app = spawn().await;
    let mut payload = booking_payload(DATE, "10:00");
    payload["clientEmail"] = serde_json::json!("not-an-email");

    let (status, body) =
        post_json(&app.router, "/api/tenants/acme/bookings", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn phone_meeting_requires_a_phone_number() {
    let app = spawn().await;
    let payload = serde_json::json!({
        "date": DATE,
        "time": "10:00",
        "durationMinutes": 15,
        "meetingType": "Phone Consultation",
        "clientName": "Pat Doe",
        "clientEmail": "pat@example.com",
    });

    let (status, _) = post_json(&app.router, "/api/tenants/acme/bookings", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reschedule_moves_the_booking() {
    let app = spawn().await;
    let (_, body) =
        post_json(&app.router, "/api/tenants/acme/bookings", booking_payload(DATE, "09:00")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let update = serde_json::json!({
        "date": DATE,
        "time": "14:00",
        "durationMinutes": 30,
    });
    let (status, body) =
        patch_admin(&app.router, &format!("/api/tenants/acme/bookings/{id}"), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["time"], "14:00");
}

#[tokio::test]
async fn unknown_booking_is_not_found() {
    let app = spawn().await;
    let (status, _) = get(&app.router, "/api/tenants/acme/bookings/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scheduler_directory_is_public() {
    let app = spawn().await;
    let (status, body) = get(&app.router, "/api/schedulers").await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["slug"], "acme");
    assert_eq!(entries[0]["businessName"], "Acme Consulting");
}

#[tokio::test]
async fn admin_routes_require_the_bearer_token() {
    let app = spawn().await;

    let (status, _) =
        get(&app.router, &format!("/api/tenants/acme/bookings?date={DATE}")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = delete(&app.router, "/api/tenants/acme/bookings/b1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app.router, "/api/tenants/acme/oauth/google/start").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_booking_listing_shows_confirmed_only() {
    let app = spawn().await;
    let (_, body) =
        post_json(&app.router, "/api/tenants/acme/bookings", booking_payload(DATE, "10:00")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    post_json(&app.router, "/api/tenants/acme/bookings", booking_payload(DATE, "12:00")).await;
    delete_admin(&app.router, &format!("/api/tenants/acme/bookings/{id}")).await;

    let (status, body) =
        get_admin(&app.router, &format!("/api/tenants/acme/bookings?date={DATE}")).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["time"], "12:00");

    // Same booking through the inclusive range form.
    let (status, body) = get_admin(
        &app.router,
        "/api/tenants/acme/bookings?start_date=2030-06-23&end_date=2030-06-25",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // One of date or a full range is required.
    let (status, _) = get_admin(&app.router, "/api/tenants/acme/bookings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oauth_start_rejects_unknown_provider() {
    let app = spawn().await;
    let (status, _) = request(
        &app.router,
        Method::GET,
        "/api/tenants/acme/oauth/fancycal/start",
        None,
        true,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oauth_callback_with_provider_error_renders_a_page() {
    let app = spawn().await;
    let (status, _) =
        get(&app.router, "/api/oauth/google/callback?error=access_denied").await;
    // Plain HTML page, not the JSON envelope.
    assert_eq!(status, StatusCode::OK);
}
