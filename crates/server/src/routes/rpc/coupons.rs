//! `coupons.*` procedures: browsing, submission, engagement and codes.

use axum::{
    Json,
    extract::{Query, State},
};
use perkpass_core::{
    CategoryFilter, Coupon, CouponAnalytics, CouponFilter, CouponId, CouponRedemption,
    CouponSubmission, UserId,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::codes::{self, CodeKind};
use crate::state::AppState;

/// `?query=&category=` for `coupons.list`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRef {
    pub coupon_id: CouponId,
}

/// Body of `coupons.redeem` and `POST /api/redeem-coupon`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub coupon_id: CouponId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub device_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub success: bool,
    pub redemption: CouponRedemption,
}

#[derive(Debug, Serialize)]
pub struct TrackViewResponse {
    pub success: bool,
    pub views: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub coupon_id: CouponId,
    pub business_name: String,
}

/// `{success, couponId}` acknowledgement for removals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub success: bool,
    pub coupon_id: CouponId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub business_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub coupon_id: CouponId,
    pub favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCodeRequest {
    #[serde(default)]
    pub kind: CodeKind,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

/// Reject blank coupon IDs; any other ID is taken at face value.
pub(crate) fn require_id(id: &CouponId) -> Result<()> {
    if id.as_str().trim().is_empty() {
        return Err(AppError::BadRequest("couponId is required".to_string()));
    }
    Ok(())
}

/// List coupons matching a search query and category.
///
/// GET /api/trpc/coupons.list
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Coupon>>> {
    let category: CategoryFilter = params
        .category
        .parse()
        .map_err(|e: perkpass_core::CategoryError| AppError::BadRequest(e.to_string()))?;
    let filter = CouponFilter {
        query: params.query,
        category,
    };
    Ok(Json(state.coupons().list(&filter).await))
}

/// GET /api/trpc/coupons.featured
pub async fn featured(State(state): State<AppState>) -> Json<Vec<Coupon>> {
    Json(state.coupons().featured().await)
}

/// GET /api/trpc/coupons.get
pub async fn get(
    State(state): State<AppState>,
    Query(params): Query<CouponRef>,
) -> Result<Json<Coupon>> {
    Ok(Json(state.coupons().get(&params.coupon_id).await?))
}

/// `"All"` plus every category, in browse order.
///
/// GET /api/trpc/coupons.categories
pub async fn categories() -> Json<Vec<String>> {
    Json(CategoryFilter::options())
}

/// Queue a business's coupon for admin review.
///
/// POST /api/trpc/coupons.submit
pub async fn submit(
    State(state): State<AppState>,
    Json(submission): Json<CouponSubmission>,
) -> Result<Json<Coupon>> {
    Ok(Json(state.coupons().submit(submission).await?))
}

/// Record a redemption.
///
/// POST /api/trpc/coupons.redeem
pub async fn redeem(
    State(state): State<AppState>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    require_id(&request.coupon_id)?;
    let redemption = state
        .coupons()
        .redeem(request.coupon_id, request.user_id, request.device_info)
        .await?;
    Ok(Json(RedeemResponse {
        success: true,
        redemption,
    }))
}

/// POST /api/trpc/coupons.trackView
pub async fn track_view(
    State(state): State<AppState>,
    Json(request): Json<CouponRef>,
) -> Result<Json<TrackViewResponse>> {
    require_id(&request.coupon_id)?;
    let views = state.coupons().track_view(request.coupon_id).await?;
    Ok(Json(TrackViewResponse {
        success: true,
        views,
    }))
}

/// A business removes one of its own submissions.
///
/// POST /api/trpc/coupons.delete
pub async fn delete(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<RemovedResponse>> {
    let coupon = state
        .coupons()
        .delete(&request.coupon_id, &request.business_name)
        .await?;
    Ok(Json(RemovedResponse {
        success: true,
        coupon_id: coupon.id,
    }))
}

/// GET /api/trpc/coupons.analytics
pub async fn analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<CouponAnalytics>> {
    let business_name = params.business_name.trim();
    if business_name.is_empty() {
        return Err(AppError::BadRequest("businessName is required".to_string()));
    }
    Ok(Json(state.coupons().analytics(business_name).await))
}

/// POST /api/trpc/coupons.toggleFavorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Json(request): Json<CouponRef>,
) -> Result<Json<FavoriteResponse>> {
    require_id(&request.coupon_id)?;
    let favorite = state.coupons().toggle_favorite(&request.coupon_id).await?;
    Ok(Json(FavoriteResponse {
        coupon_id: request.coupon_id,
        favorite,
    }))
}

/// GET /api/trpc/coupons.favorites
pub async fn favorites(State(state): State<AppState>) -> Json<Vec<Coupon>> {
    Json(state.coupons().favorites().await)
}

/// POST /api/trpc/coupons.generateCode
pub async fn generate_code(
    Json(request): Json<GenerateCodeRequest>,
) -> Result<Json<GenerateCodeResponse>> {
    let code = codes::generate(request.kind, request.prefix.as_deref(), request.length)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(GenerateCodeResponse { code }))
}
