//! Plain REST endpoints used outside the RPC client: status checks, the
//! payment provider's webhook and its browser hand-off page.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
};
use chrono::{DateTime, Utc};
use perkpass_core::Email;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::rpc::coupons::{RedeemRequest, RedeemResponse};
use crate::error::{AppError, Result};
use crate::services::subscriptions::{PaymentEvent, SIGNATURE_HEADER, verify_signature};
use crate::state::AppState;

/// GET /
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "API is running" }))
}

/// Liveness check. Does not touch storage.
///
/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Same as `coupons.redeem`, for clients without the RPC client.
///
/// POST /api/redeem-coupon
pub async fn redeem_coupon(
    state: State<AppState>,
    request: Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    super::rpc::coupons::redeem(state, request).await
}

#[derive(Debug, Deserialize)]
pub struct CheckSubscriptionParams {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSubscriptionResponse {
    pub email: Email,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Subscription state for an email; unknown emails are inactive.
///
/// GET /api/check-subscription?email=
pub async fn check_subscription(
    State(state): State<AppState>,
    Query(params): Query<CheckSubscriptionParams>,
) -> Result<Json<CheckSubscriptionResponse>> {
    let email = Email::parse(&params.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let status = state.subscriptions().check(&email).await;
    Ok(Json(CheckSubscriptionResponse {
        email,
        active: status.is_some_and(|s| s.active),
        updated_at: status.map(|s| s.updated_at),
    }))
}

/// Payment provider webhook.
///
/// Verifies the signature when a secret is configured, then applies the
/// event. Unrecognised event types are acknowledged and ignored.
///
/// POST /api/webhooks/payments
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    if let Some(secret) = &state.config().webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        verify_signature(secret, &body, signature).map_err(|e| {
            tracing::warn!(error = %e, "Rejected payment webhook");
            AppError::Unauthorized(e.to_string())
        })?;
    }

    let event: PaymentEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid webhook payload: {e}")))?;
    state.subscriptions().apply_event(event, Utc::now()).await;

    Ok(Json(json!({ "received": true })))
}

/// Browser page shown after checkout that sends the user back into the app.
///
/// GET /payment-success
pub async fn payment_success(State(state): State<AppState>) -> Html<String> {
    Html(payment_success_page(&state.config().payment_success_link()))
}

fn payment_success_page(deep_link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Payment Successful</title>
  <meta http-equiv="refresh" content="0; url={deep_link}">
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, sans-serif; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; }}
    .container {{ text-align: center; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>Payment Successful!</h1>
    <p>Redirecting you back to the app...</p>
    <a href="{deep_link}">Open App</a>
  </div>
  <script>setTimeout(function () {{ window.location.href = "{deep_link}"; }}, 1000);</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_page_links_back() {
        let page = payment_success_page("perkpass://auth/payment-setup?success=true");
        assert!(page.contains("url=perkpass://auth/payment-setup?success=true"));
        assert!(page.contains("href=\"perkpass://auth/payment-setup?success=true\""));
    }
}
