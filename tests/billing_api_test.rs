mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use pandaai_backend::utils::crypto::hmac_sha256_hex;
use serde_json::json;

use common::{app, authed_json_request, send, WEBHOOK_SECRET};

fn webhook_request(payload: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("stripe-signature", sig);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn sign(payload: &str, timestamp: i64) -> String {
    let signed = format!("{}.{}", timestamp, payload);
    let v1 = hmac_sha256_hex(WEBHOOK_SECRET.as_bytes(), signed.as_bytes()).unwrap();
    format!("t={},v1={}", timestamp, v1)
}

#[tokio::test]
async fn webhook_requires_a_valid_signature() {
    let app = app();
    let payload = json!({ "type": "invoice.paid", "data": { "object": {} } }).to_string();

    let (status, _) = send(&app, webhook_request(&payload, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = format!("t={},v1={}", Utc::now().timestamp(), "00".repeat(32));
    let (status, _) = send(&app, webhook_request(&payload, Some(forged))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stale = sign(&payload, Utc::now().timestamp() - 3600);
    let (status, _) = send(&app, webhook_request(&payload, Some(stale))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_unhandled_events_are_acknowledged() {
    let app = app();
    let payload = json!({ "type": "invoice.paid", "data": { "object": { "id": "in_1" } } }).to_string();

    let signature = sign(&payload, Utc::now().timestamp());
    let (status, body) = send(&app, webhook_request(&payload, Some(signature))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn checkout_rejects_the_free_plan() {
    let app = app();
    let (status, body) = send(
        &app,
        authed_json_request("POST", "/api/checkout", "u1", &json!({ "plan": "free" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Free plan does not require payment");
}

#[tokio::test]
async fn checkout_without_stripe_key_fails_cleanly() {
    let app = app();
    let (status, body) = send(
        &app,
        authed_json_request(
            "POST",
            "/api/checkout",
            "u1",
            &json!({ "plan": "premium", "interval": "monthly" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create checkout session");
}
