//! RPC procedures mounted under `/api/trpc`.
//!
//! Each procedure is one path segment `<namespace>.<procedure>`. Queries
//! take URL parameters; mutations take a JSON body.

pub mod admin;
pub mod auth;
pub mod coupons;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::services::profile::MAX_PICTURE_REQUEST_BYTES;
use crate::state::AppState;

/// Consumer and business coupon procedures.
fn coupon_procedures() -> Router<AppState> {
    Router::new()
        .route("/coupons.list", get(coupons::list))
        .route("/coupons.featured", get(coupons::featured))
        .route("/coupons.get", get(coupons::get))
        .route("/coupons.categories", get(coupons::categories))
        .route("/coupons.submit", post(coupons::submit))
        .route("/coupons.redeem", post(coupons::redeem))
        .route("/coupons.trackView", post(coupons::track_view))
        .route("/coupons.delete", post(coupons::delete))
        .route("/coupons.analytics", get(coupons::analytics))
        .route("/coupons.toggleFavorite", post(coupons::toggle_favorite))
        .route("/coupons.favorites", get(coupons::favorites))
        .route("/coupons.generateCode", post(coupons::generate_code))
}

/// Moderation and platform dashboards.
fn admin_procedures() -> Router<AppState> {
    Router::new()
        .route("/admin.pending", get(admin::pending))
        .route("/admin.approve", post(admin::approve))
        .route("/admin.deny", post(admin::deny))
        .route("/admin.businessAnalytics", get(admin::business_analytics))
        .route("/admin.revenue", get(admin::revenue))
}

/// Session, profile and history procedures.
fn account_procedures() -> Router<AppState> {
    Router::new()
        .route("/auth.login", post(auth::login))
        .route("/auth.logout", post(auth::logout))
        .route("/auth.session", get(auth::session))
        .route("/auth.updateSubscription", post(auth::update_subscription))
        .route(
            "/profile.updatePicture",
            post(auth::update_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_REQUEST_BYTES)),
        )
        .route("/user.redemptionHistory", get(auth::redemption_history))
}

/// Every RPC procedure.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(coupon_procedures())
        .merge(admin_procedures())
        .merge(account_procedures())
}
