//! Coupon moderation through the RPC procedures.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use perkpass_integration_tests::{TestApp, rpc};
use serde_json::{Value, json};

fn submission(business: &str, title: &str) -> Value {
    json!({
        "businessName": business,
        "title": title,
        "description": "Half-pound of burnt ends with two sides.",
        "discount": "15% OFF",
        "category": "Food & Dining",
    })
}

async fn submit(app: &TestApp, business: &str, title: &str) -> String {
    let (status, coupon) = app
        .post(&rpc("coupons.submit"), &submission(business, title))
        .await;
    assert_eq!(status, StatusCode::OK);
    coupon["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn submitted_coupon_waits_for_review() {
    let app = TestApp::new().await;
    let (_, coupon) = app
        .post(&rpc("coupons.submit"), &submission("Fort Worth Eats", "Burnt Ends Friday"))
        .await;

    assert_eq!(coupon["status"], "pending");
    assert_eq!(coupon["expiresAt"], "No expiration");
    assert_eq!(coupon["redemptionInstructions"], "Show this coupon at checkout");

    let (_, pending) = app.get(&rpc("admin.pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 3);
    assert_eq!(pending[0]["id"], coupon["id"]);

    // Not listed until approved
    let (_, listed) = app.get(&rpc("coupons.list")).await;
    assert_eq!(listed.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn approve_moves_coupon_to_listing() {
    let app = TestApp::new().await;
    let id = submit(&app, "Fort Worth Eats", "Burnt Ends Friday").await;

    let (status, approved) = app
        .post(&rpc("admin.approve"), &json!({ "couponId": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert!(approved["reviewedAt"].is_string());

    let (_, pending) = app.get(&rpc("admin.pending")).await;
    assert!(pending.as_array().unwrap().iter().all(|c| c["id"] != id.as_str()));

    let (_, listed) = app.get(&rpc("coupons.list")).await;
    assert_eq!(listed.as_array().unwrap().len(), 7);

    let (_, fetched) = app.get(&format!("{}?couponId={id}", rpc("coupons.get"))).await;
    assert_eq!(fetched["status"], "approved");
}

#[tokio::test]
async fn deny_discards_coupon() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(&rpc("admin.deny"), &json!({ "couponId": "coupon-pending-1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "couponId": "coupon-pending-1" }));

    let (_, pending) = app.get(&rpc("admin.pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (_, listed) = app.get(&rpc("coupons.list")).await;
    assert_eq!(listed.as_array().unwrap().len(), 6);

    let (status, _) = app
        .get(&format!("{}?couponId=coupon-pending-1", rpc("coupons.get")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviewing_unknown_coupon_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(&rpc("admin.approve"), &json!({ "couponId": "coupon-nope" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post(&rpc("admin.deny"), &json!({ "couponId": "coupon-nope" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, pending) = app.get(&rpc("admin.pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn incomplete_submission_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(&rpc("coupons.submit"), &submission("Fort Worth Eats", "   "))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");
}

#[tokio::test]
async fn business_deletes_only_its_own_coupons() {
    let app = TestApp::new().await;
    let id = submit(&app, "Fort Worth Eats", "Burnt Ends Friday").await;

    let (status, _) = app
        .post(
            &rpc("coupons.delete"),
            &json!({ "couponId": id, "businessName": "Spa Luxe Dallas" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &rpc("coupons.delete"),
            &json!({ "couponId": "coupon-seed-1", "businessName": "Fort Worth Eats" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            &rpc("coupons.delete"),
            &json!({ "couponId": id, "businessName": "Fort Worth Eats" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, pending) = app.get(&rpc("admin.pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn moderation_survives_restart_with_directory_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = perkpass_server::Storage::directory(dir.path()).await.unwrap();
    let app = TestApp::with_storage(perkpass_server::ServerConfig::default(), storage).await;

    let id = submit(&app, "Fort Worth Eats", "Burnt Ends Friday").await;
    app.post(&rpc("admin.approve"), &json!({ "couponId": id })).await;

    let storage = perkpass_server::Storage::directory(dir.path()).await.unwrap();
    let restarted = TestApp::with_storage(perkpass_server::ServerConfig::default(), storage).await;
    let (_, listed) = restarted.get(&rpc("coupons.list")).await;
    assert_eq!(listed.as_array().unwrap().len(), 7);
}
