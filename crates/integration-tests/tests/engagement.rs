//! Browsing, favorites, redemptions, views and analytics.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]

use axum::http::StatusCode;
use perkpass_core::PlatformFee;
use perkpass_integration_tests::{TestApp, rpc};
use perkpass_server::ServerConfig;
use serde_json::json;

#[tokio::test]
async fn browse_and_filter() {
    let app = TestApp::new().await;

    let (_, categories) = app.get(&rpc("coupons.categories")).await;
    assert_eq!(categories.as_array().unwrap().len(), 9);
    assert_eq!(categories[0], "All");

    let (_, featured) = app.get(&rpc("coupons.featured")).await;
    assert_eq!(featured.as_array().unwrap().len(), 3);

    let (_, fitness) = app
        .get(&format!("{}?category=Fitness", rpc("coupons.list")))
        .await;
    assert_eq!(fitness.as_array().unwrap().len(), 1);
    assert_eq!(fitness[0]["businessName"], "Dallas Fitness Studio");

    let (_, by_text) = app
        .get(&format!("{}?query=MASSAGE&category=All", rpc("coupons.list")))
        .await;
    assert_eq!(by_text.as_array().unwrap().len(), 1);

    let (status, _) = app
        .get(&format!("{}?category=Groceries", rpc("coupons.list")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn favorite_toggle_is_reversible() {
    let app = TestApp::new().await;
    let body = json!({ "couponId": "coupon-seed-3" });

    let (_, first) = app.post(&rpc("coupons.toggleFavorite"), &body).await;
    assert_eq!(first["favorite"], true);
    let (_, favorites) = app.get(&rpc("coupons.favorites")).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    let (_, second) = app.post(&rpc("coupons.toggleFavorite"), &body).await;
    assert_eq!(second["favorite"], false);
    let (_, favorites) = app.get(&rpc("coupons.favorites")).await;
    assert!(favorites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn redemptions_are_never_deduplicated() {
    let app = TestApp::new().await;
    let body = json!({ "couponId": "coupon-seed-1", "userId": "user-1" });

    let (status, first) = app.post(&rpc("coupons.redeem"), &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert!(first["redemption"]["id"].as_str().unwrap().starts_with("redemption-"));

    let (_, second) = app.post("/api/redeem-coupon", &body).await;
    assert_eq!(second["success"], true);
    assert_ne!(first["redemption"]["id"], second["redemption"]["id"]);

    // Unknown coupons are accepted too
    let (status, _) = app
        .post(
            &rpc("coupons.redeem"),
            &json!({ "couponId": "coupon-unknown", "userId": "user-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = app
        .get(&format!("{}?userId=user-1", rpc("user.redemptionHistory")))
        .await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 3);
    let seed = history
        .iter()
        .filter(|e| e["coupon"]["id"] == "coupon-seed-1")
        .count();
    assert_eq!(seed, 2);
    assert_eq!(history.iter().filter(|e| e["coupon"].is_null()).count(), 1);
}

#[tokio::test]
async fn blank_coupon_id_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(&rpc("coupons.redeem"), &json!({ "couponId": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn business_analytics_track_conversion() {
    let app = TestApp::new().await;
    let coupon = json!({ "couponId": "coupon-seed-1" });

    for _ in 0..2 {
        let (_, viewed) = app.post(&rpc("coupons.trackView"), &coupon).await;
        assert_eq!(viewed["success"], true);
    }
    for _ in 0..3 {
        app.post(&rpc("coupons.redeem"), &coupon).await;
    }

    let (status, analytics) = app
        .get(&format!(
            "{}?businessName=Fort%20Worth%20Eats",
            rpc("coupons.analytics")
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["totalCoupons"], 1);
    assert_eq!(analytics["totalViews"], 2);
    assert_eq!(analytics["totalRedemptions"], 3);
    assert_eq!(analytics["conversionRate"].as_f64().unwrap(), 150.0);
    assert_eq!(analytics["topPerformer"]["couponId"], "coupon-seed-1");
    assert_eq!(analytics["dailyRedemptions"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn zero_views_means_zero_conversion() {
    let app = TestApp::new().await;
    app.post(&rpc("coupons.redeem"), &json!({ "couponId": "coupon-seed-3" }))
        .await;

    let (_, analytics) = app
        .get(&format!(
            "{}?businessName=Spa%20Luxe%20Dallas",
            rpc("coupons.analytics")
        ))
        .await;
    assert_eq!(analytics["totalViews"], 0);
    assert_eq!(analytics["totalRedemptions"], 1);
    assert_eq!(analytics["conversionRate"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn platform_dashboards() {
    let app = TestApp::new().await;

    let (_, platform) = app.get(&rpc("admin.businessAnalytics")).await;
    assert_eq!(platform["totalBusinesses"], 5);
    assert_eq!(platform["activeSubscriptions"], 4);
    assert_eq!(platform["totalRevenue"], "39.96");
    assert_eq!(platform["totalRedemptions"], 508);
    assert_eq!(platform["avgRedemptionsPerBusiness"], 102);

    let (_, revenue) = app.get(&rpc("admin.revenue")).await;
    assert_eq!(revenue["monthlyRecurringRevenue"], "39.96");
    assert_eq!(revenue["churnRate"].as_f64().unwrap(), 20.0);
    assert_eq!(revenue["averageLifetimeValue"], "79.92");
    assert_eq!(revenue["platformFeePercent"], 10);
    assert_eq!(revenue["platformFee"], "1.00");
    assert_eq!(revenue["businessPayout"], "8.99");
}

#[tokio::test]
async fn revenue_uses_configured_platform_fee() {
    let config = ServerConfig {
        platform_fee: PlatformFee::new(15),
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(config).await;

    let (_, revenue) = app.get(&rpc("admin.revenue")).await;
    assert_eq!(revenue["platformFeePercent"], 15);
    // 15% of $9.99 is $1.4985
    assert_eq!(revenue["platformFee"], "1.50");
    assert_eq!(revenue["businessPayout"], "8.49");
}

#[tokio::test]
async fn generate_codes() {
    let app = TestApp::new().await;

    let (_, full) = app.post(&rpc("coupons.generateCode"), &json!({})).await;
    assert_eq!(full["code"].as_str().unwrap().len(), 9);

    let (_, custom) = app
        .post(
            &rpc("coupons.generateCode"),
            &json!({ "kind": "custom", "prefix": "bbq", "length": 4 }),
        )
        .await;
    assert!(custom["code"].as_str().unwrap().starts_with("BBQ"));

    let (status, _) = app
        .post(&rpc("coupons.generateCode"), &json!({ "kind": "custom" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
