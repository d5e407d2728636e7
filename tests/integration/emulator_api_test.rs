//! Local Trigger Emulator API Tests
//!
//! Exercises the composed application router the `local` binary serves.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use invite_mailer_common::Config;
use invite_mailer_email::mock::MockEmailService;
use invite_mailer_invitations::InvitationTrigger;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::{firestore_created, stream_record, COLLECTION};

fn app() -> (Router, MockEmailService) {
    let mock = MockEmailService::new();
    let trigger = InvitationTrigger::new(Arc::new(mock.clone()), COLLECTION);
    (invite_mailer_app::create_app(trigger), mock)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_firestore_event_through_emulator() {
    let (app, mock) = app();

    let response = app
        .oneshot(post_json(
            "/v1/events",
            firestore_created("inv-42", "emulated@example.com", "424242"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sent"], 1);
    assert_eq!(body["message_ids"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        mock.get_code_for_email("emulated@example.com"),
        Some("424242".to_string())
    );
}

#[tokio::test]
async fn test_stream_batch_through_emulator() {
    let (app, mock) = app();

    let response = app
        .oneshot(post_json(
            "/v1/events",
            json!({
                "Records": [
                    stream_record("INSERT", "inv-1", "one@example.com", "111111"),
                    stream_record("MODIFY", "inv-1", "one@example.com", "111112"),
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["sent"], 1);
    assert_eq!(mock.email_count(), 1);
}

#[tokio::test]
async fn test_document_creation_with_numeric_code() {
    let (app, mock) = app();

    let response = app
        .oneshot(post_json(
            "/v1/documents/pending_invitations/inv-7",
            json!({ "email": "numeric@example.com", "invite_code": 700007 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        mock.get_code_for_email("numeric@example.com"),
        Some("700007".to_string())
    );
}

#[tokio::test]
async fn test_subcollection_trigger_from_config() {
    let config = Config {
        invitations_collection: "tenants/acme/pending_invitations".to_string(),
        ..Config::default()
    };
    let email_config = invite_mailer_email::EmailConfig {
        provider: "mock".to_string(),
        ..Default::default()
    };
    let trigger = invite_mailer_app::create_trigger_with(&config, email_config)
        .await
        .unwrap();
    let app = invite_mailer_app::create_app(trigger);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/documents/tenants/acme/pending_invitations/inv-1",
            json!({ "email": "tenant@example.com", "invite_code": "313131" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["sent"], 1);

    let response = app
        .oneshot(post_json(
            "/v1/documents/pending_invitations/inv-2",
            json!({ "email": "root@example.com", "invite_code": "313132" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["skipped"], 1);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (app, mock) = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/events")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(mock.email_count(), 0);
}

mod common;
