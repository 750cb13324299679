//! `auth.*`, `profile.*` and `user.*` procedures.

use axum::{
    Json,
    extract::{Query, State},
};
use perkpass_core::{LoginRequest, Session, UserId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::RedemptionEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePictureRequest {
    pub user_id: UserId,
    pub profile_picture: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePictureResponse {
    pub success: bool,
    pub message: &'static str,
    pub profile_picture: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub user_id: UserId,
}

/// Mock login: whoever the device claims to be.
///
/// POST /api/trpc/auth.login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>> {
    Ok(Json(state.auth().login(request).await?))
}

/// POST /api/trpc/auth.logout
pub async fn logout(State(state): State<AppState>) -> Result<Json<Session>> {
    Ok(Json(state.auth().logout().await?))
}

/// GET /api/trpc/auth.session
pub async fn session(State(state): State<AppState>) -> Json<Session> {
    Json(state.auth().session().await)
}

/// POST /api/trpc/auth.updateSubscription
pub async fn update_subscription(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<Session>> {
    Ok(Json(state.auth().update_subscription(request.active).await?))
}

/// POST /api/trpc/profile.updatePicture
pub async fn update_picture(
    State(state): State<AppState>,
    Json(request): Json<UpdatePictureRequest>,
) -> Result<Json<UpdatePictureResponse>> {
    let profile_picture = state
        .auth()
        .update_profile_picture(&request.user_id, &request.profile_picture)
        .await?;
    Ok(Json(UpdatePictureResponse {
        success: true,
        message: "Profile picture updated successfully",
        profile_picture,
    }))
}

/// A user's redemptions, newest first.
///
/// GET /api/trpc/user.redemptionHistory
pub async fn redemption_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<RedemptionEntry>> {
    Json(state.coupons().redemption_history(&params.user_id).await)
}
