//! `admin.*` procedures: the review queue and platform dashboards.
//!
//! There is no role check; any caller can moderate.

use axum::{Json, extract::State};
use perkpass_core::{Coupon, PlatformAnalytics, RevenueSummary};

use super::coupons::{CouponRef, RemovedResponse, require_id};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/trpc/admin.pending
pub async fn pending(State(state): State<AppState>) -> Json<Vec<Coupon>> {
    Json(state.coupons().pending().await)
}

/// POST /api/trpc/admin.approve
pub async fn approve(
    State(state): State<AppState>,
    Json(request): Json<CouponRef>,
) -> Result<Json<Coupon>> {
    require_id(&request.coupon_id)?;
    Ok(Json(state.coupons().approve(&request.coupon_id).await?))
}

/// POST /api/trpc/admin.deny
pub async fn deny(
    State(state): State<AppState>,
    Json(request): Json<CouponRef>,
) -> Result<Json<RemovedResponse>> {
    require_id(&request.coupon_id)?;
    let coupon = state.coupons().deny(&request.coupon_id).await?;
    Ok(Json(RemovedResponse {
        success: true,
        coupon_id: coupon.id,
    }))
}

/// Totals over the business directory.
///
/// GET /api/trpc/admin.businessAnalytics
pub async fn business_analytics(State(state): State<AppState>) -> Json<PlatformAnalytics> {
    Json(PlatformAnalytics::summarize(state.businesses().to_vec()))
}

/// Subscription revenue, with the platform's cut of each payment.
///
/// GET /api/trpc/admin.revenue
pub async fn revenue(State(state): State<AppState>) -> Json<RevenueSummary> {
    let config = state.config();
    Json(RevenueSummary::from_records(
        state.businesses(),
        config.subscription_price,
        config.platform_fee,
    ))
}
