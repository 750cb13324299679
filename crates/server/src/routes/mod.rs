//! HTTP route handlers for the PerkPass service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Status JSON
//! GET  /health                    - Health check
//! GET  /payment-success           - Payment hand-off page (deep link into the app)
//!
//! # REST
//! POST /api/redeem-coupon         - Record a redemption
//! GET  /api/check-subscription    - Subscription state for ?email=
//! POST /api/webhooks/payments     - Payment provider webhook
//!
//! # RPC (/api/trpc/<namespace>.<procedure>)
//! GET  coupons.list               - Search listed coupons (?query=&category=)
//! GET  coupons.featured           - Featured coupons
//! GET  coupons.get                - One coupon (?couponId=)
//! GET  coupons.categories         - Category filter options
//! POST coupons.submit             - Submit a coupon for review
//! POST coupons.redeem             - Record a redemption
//! POST coupons.trackView          - Count a view
//! POST coupons.delete             - Business deletes its own coupon
//! GET  coupons.analytics          - Business engagement (?businessName=)
//! POST coupons.toggleFavorite     - Flip a favorite
//! GET  coupons.favorites          - Favorited coupons
//! POST coupons.generateCode       - Generate a redemption code
//! GET  admin.pending              - Review queue
//! POST admin.approve              - Approve a pending coupon
//! POST admin.deny                 - Deny a pending coupon
//! GET  admin.businessAnalytics    - Platform totals
//! GET  admin.revenue              - Subscription revenue
//! POST auth.login                 - Mock login
//! POST auth.logout                - Logout
//! GET  auth.session               - Current session
//! POST auth.updateSubscription    - Set the business subscription flag
//! POST profile.updatePicture      - Replace the profile picture
//! GET  user.redemptionHistory     - A user's redemptions (?userId=)
//! ```

pub mod rest;
pub mod rpc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the REST API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/redeem-coupon", post(rest::redeem_coupon))
        .route("/check-subscription", get(rest::check_subscription))
        .route("/webhooks/payments", post(rest::payment_webhook))
        .nest("/trpc", rpc::routes())
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(rest::status))
        .route("/health", get(rest::health))
        .route("/payment-success", get(rest::payment_success))
        .nest("/api", api_routes())
}
