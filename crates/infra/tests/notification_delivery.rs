//! Notification sinks against a mock HTTP endpoint.

mod support;

use chrono::{NaiveDate, Utc};
use slotbook_core::NotificationSink;
use slotbook_domain::{Booking, BookingStatus, LocationType, SchedulerConfig};
use slotbook_infra::notifications::{
    webhook, EmailSender, EmailSettings, WebhookSender, WebhookSettings,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::test_http_client;

fn booking() -> Booking {
    Booking {
        id: "b1".into(),
        tenant_id: "t1".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
        time: "10:00".parse().unwrap(),
        duration_minutes: 30,
        meeting_type: "Intro Call".into(),
        client_name: "Pat Doe".into(),
        client_email: "pat@example.com".into(),
        client_phone: None,
        notes: None,
        location_type: Some(LocationType::Virtual),
        location: None,
        external_event_id: None,
        status: BookingStatus::Confirmed,
        created_at: Utc::now(),
    }
}

fn email_sender(server: &MockServer) -> EmailSender {
    EmailSender::new(
        test_http_client(),
        EmailSettings {
            api_key: "re_test_key".into(),
            from: "Acme <bookings@acme.test>".into(),
            api_base: Some(server.uri()),
        },
    )
}

#[tokio::test]
async fn created_email_goes_to_client_and_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "em-1"})))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = SchedulerConfig::defaults("t1", "Acme Consulting");
    config.notify_email = Some("owner@acme.test".into());

    email_sender(&server)
        .booking_created(&booking(), &config)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let bodies: Vec<String> = requests
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect();
    assert!(bodies[0].contains("pat@example.com"));
    assert!(bodies[1].contains("owner@acme.test"));
}

#[tokio::test]
async fn admin_email_is_skipped_without_notify_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "em-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = SchedulerConfig::defaults("t1", "Acme Consulting");
    email_sender(&server)
        .booking_cancelled(&booking(), &config)
        .await
        .unwrap();
}

#[tokio::test]
async fn email_api_rejection_surfaces_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid from address"))
        .mount(&server)
        .await;

    let config = SchedulerConfig::defaults("t1", "Acme Consulting");
    assert!(email_sender(&server)
        .booking_created(&booking(), &config)
        .await
        .is_err());
}

#[tokio::test]
async fn failed_client_email_still_notifies_the_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_string_contains("pat@example.com"))
        .respond_with(ResponseTemplate::new(422).set_body_string("suppressed address"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_string_contains("owner@acme.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "em-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = SchedulerConfig::defaults("t1", "Acme Consulting");
    config.notify_email = Some("owner@acme.test".into());

    // The client failure still surfaces, but only after the admin leg ran.
    assert!(email_sender(&server)
        .booking_created(&booking(), &config)
        .await
        .is_err());
}

#[tokio::test]
async fn webhook_signature_verifies_against_the_received_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/bookings"))
        .and(header("x-webhook-event", "booking.created"))
        .and(body_string_contains("\"event\":\"booking.created\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = WebhookSender::new(
        test_http_client(),
        WebhookSettings {
            url: Some(format!("{}/hooks/bookings", server.uri())),
            secret: "whsec_test".into(),
        },
    );
    let config = SchedulerConfig::defaults("t1", "Acme Consulting");
    sender.booking_created(&booking(), &config).await.unwrap();

    // Recompute the signature over the body exactly as received.
    let request = &server.received_requests().await.unwrap()[0];
    let signature = request
        .headers
        .get("x-webhook-signature")
        .expect("signature header")
        .to_str()
        .expect("ascii header");
    let expected = webhook::sign(b"whsec_test", &request.body).unwrap();
    assert_eq!(signature, expected);
}

#[tokio::test]
async fn webhook_without_url_is_a_no_op() {
    let sender = WebhookSender::new(
        test_http_client(),
        WebhookSettings { url: None, secret: "whsec_test".into() },
    );
    let config = SchedulerConfig::defaults("t1", "Acme Consulting");
    // No server to hit; disabled sink must simply succeed.
    sender.booking_updated(&booking(), &config).await.unwrap();
}
