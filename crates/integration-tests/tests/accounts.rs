//! Sessions, subscriptions, payment webhooks and the plain REST endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use perkpass_integration_tests::{TestApp, rpc};
use perkpass_server::ServerConfig;
use perkpass_server::services::subscriptions::{SIGNATURE_HEADER, sign};
use secrecy::SecretString;
use serde_json::json;

const WEBHOOK_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

#[tokio::test]
async fn status_and_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "message": "API is running" }));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new().await;
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
}

#[tokio::test]
async fn business_login_and_subscription() {
    let app = TestApp::new().await;

    let (status, session) = app
        .post(
            &rpc("auth.login"),
            &json!({
                "email": "Sarah@FortWorthEats.com",
                "name": "Sarah Martinez",
                "type": "business",
                "businessName": "Fort Worth Eats",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["isAuthenticated"], true);
    assert_eq!(session["user"]["email"], "sarah@fortwortheats.com");
    assert_eq!(session["user"]["subscriptionActive"], false);

    let (_, session) = app
        .post(&rpc("auth.updateSubscription"), &json!({ "active": true }))
        .await;
    assert_eq!(session["user"]["subscriptionActive"], true);

    let (_, current) = app.get(&rpc("auth.session")).await;
    assert_eq!(current, session);

    let (_, session) = app.post(&rpc("auth.logout"), &json!({})).await;
    assert_eq!(session["isAuthenticated"], false);
    assert!(session["user"].is_null());
}

#[tokio::test]
async fn profile_picture_update() {
    let app = TestApp::new().await;
    let (_, session) = app
        .post(
            &rpc("auth.login"),
            &json!({ "email": "jo@example.com", "name": "Jo", "type": "consumer" }),
        )
        .await;
    let user_id = session["user"]["id"].as_str().unwrap();

    let (status, body) = app
        .post(
            &rpc("profile.updatePicture"),
            &json!({ "userId": user_id, "profilePicture": "https://cdn.example.com/jo.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Profile picture updated successfully");

    let (status, _) = app
        .post(
            &rpc("profile.updatePicture"),
            &json!({ "userId": user_id, "profilePicture": "javascript:alert(1)" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &rpc("profile.updatePicture"),
            &json!({ "userId": "user-someone-else", "profilePicture": "https://cdn.example.com/x.png" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// An inline PNG whose payload decodes to `decoded_len` zero bytes.
fn inline_png(decoded_len: usize) -> String {
    format!("data:image/png;base64,{}", "A".repeat(decoded_len.div_ceil(3) * 4))
}

#[tokio::test]
async fn large_inline_picture_is_accepted() {
    let app = TestApp::new().await;
    let (_, session) = app
        .post(
            &rpc("auth.login"),
            &json!({ "email": "jo@example.com", "name": "Jo", "type": "consumer" }),
        )
        .await;
    let user_id = session["user"]["id"].as_str().unwrap();

    // Well past axum's default 2 MB body limit
    let picture = inline_png(3 * 1024 * 1024);
    let (status, body) = app
        .post(
            &rpc("profile.updatePicture"),
            &json!({ "userId": user_id, "profilePicture": picture }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .post(
            &rpc("profile.updatePicture"),
            &json!({ "userId": user_id, "profilePicture": inline_png(5 * 1024 * 1024 + 1) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("exceeds 5 MiB"));
}

#[tokio::test]
async fn unverified_webhook_updates_subscription() {
    let app = TestApp::new().await;
    let check = "/api/check-subscription?email=owner@example.com";

    let (_, before) = app.get(check).await;
    assert_eq!(before["active"], false);
    assert!(before.get("updatedAt").is_none());

    let (status, ack) = app
        .post(
            "/api/webhooks/payments",
            &json!({ "type": "checkout.completed", "data": { "email": "Owner@Example.com" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({ "received": true }));

    let (_, after) = app.get(check).await;
    assert_eq!(after["active"], true);
    assert!(after["updatedAt"].is_string());

    app.post(
        "/api/webhooks/payments",
        &json!({ "type": "subscription.canceled", "data": { "email": "owner@example.com" } }),
    )
    .await;
    let (_, canceled) = app.get(check).await;
    assert_eq!(canceled["active"], false);
}

#[tokio::test]
async fn ignored_webhook_event_is_acknowledged() {
    let app = TestApp::new().await;
    let (status, ack) = app
        .post(
            "/api/webhooks/payments",
            &json!({ "type": "invoice.created", "data": { "email": "owner@example.com" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], true);

    let (_, state) = app.get("/api/check-subscription?email=owner@example.com").await;
    assert_eq!(state["active"], false);
}

#[tokio::test]
async fn signed_webhooks_when_secret_configured() {
    let config = ServerConfig {
        webhook_secret: Some(SecretString::from(WEBHOOK_SECRET)),
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(config).await;
    let event = json!({ "type": "subscription.activated", "data": { "email": "owner@example.com" } });

    let (status, _) = app.post("/api/webhooks/payments", &event).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = serde_json::to_vec(&event).unwrap();
    let signature = sign(&SecretString::from(WEBHOOK_SECRET), &body);
    let (status, _) = app
        .post_with_headers(
            "/api/webhooks/payments",
            &event,
            &[(SIGNATURE_HEADER, signature.as_str())],
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, state) = app.get("/api/check-subscription?email=owner@example.com").await;
    assert_eq!(state["active"], true);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/check-subscription?email=not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn payment_success_page_deep_links() {
    let config = ServerConfig {
        app_scheme: "perkpass-dev".to_string(),
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(config).await;
    let (status, body) = app
        .send(Request::builder().uri("/payment-success").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("perkpass-dev://auth/payment-setup?success=true"));
}
