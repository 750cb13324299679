//! Business subscription registry fed by payment webhooks.
//!
//! The registry is process memory only; it starts empty on every boot and an
//! unknown email simply reads as inactive.
//!
//! # Webhook payload
//!
//! ```json
//! { "type": "subscription.activated", "data": { "email": "owner@example.com" } }
//! ```
//!
//! When a webhook secret is configured, the `x-perkpass-signature` header
//! must carry the hex-encoded HMAC-SHA256 of the raw request body.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use perkpass_core::Email;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tokio::sync::RwLock;
use tracing::instrument;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-perkpass-signature";

type HmacSha256 = Hmac<Sha256>;

/// Stored state for one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Body of a payment provider webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    pub email: Email,
}

impl PaymentEvent {
    /// The subscription state this event implies, or `None` if the event
    /// type does not affect subscriptions.
    #[must_use]
    pub fn implied_state(&self) -> Option<bool> {
        match self.event_type.as_str() {
            "subscription.activated" | "checkout.completed" => Some(true),
            "subscription.canceled" => Some(false),
            _ => None,
        }
    }
}

/// Webhook signature failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature header")]
    Missing,
    #[error("signature is not valid hex")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
}

/// Check `signature` (hex) against the HMAC-SHA256 of `body`.
///
/// # Errors
///
/// Returns a [`SignatureError`] if the signature is absent, malformed or wrong.
pub fn verify_signature(
    secret: &SecretString,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or(SignatureError::Missing)?;
    let expected = hex::decode(signature.trim()).map_err(|_| SignatureError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);
    // verify_slice compares in constant time
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Hex HMAC-SHA256 of `body`, as a sender would compute it.
#[must_use]
pub fn sign(secret: &SecretString, body: &[u8]) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// In-memory subscription map keyed by normalized email.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: RwLock<HashMap<Email, SubscriptionStatus>>,
}

impl SubscriptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status, if the email has ever been seen.
    pub async fn check(&self, email: &Email) -> Option<SubscriptionStatus> {
        self.entries.read().await.get(email).copied()
    }

    /// Record a subscription state directly.
    pub async fn set(&self, email: Email, active: bool, now: DateTime<Utc>) -> SubscriptionStatus {
        let status = SubscriptionStatus {
            active,
            updated_at: now,
        };
        self.entries.write().await.insert(email, status);
        status
    }

    /// Apply a webhook event. Returns the new status, or `None` when the
    /// event type is ignored.
    #[instrument(skip(self, event), fields(event_type = %event.event_type, email = %event.data.email))]
    pub async fn apply_event(
        &self,
        event: PaymentEvent,
        now: DateTime<Utc>,
    ) -> Option<SubscriptionStatus> {
        let Some(active) = event.implied_state() else {
            tracing::debug!("Ignoring payment event");
            return None;
        };
        let status = self.set(event.data.email, active, now).await;
        tracing::info!(active, "Subscription updated");
        Some(status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn event(event_type: &str, email: &str) -> PaymentEvent {
        PaymentEvent {
            event_type: event_type.to_string(),
            data: PaymentEventData {
                email: Email::parse(email).unwrap(),
            },
        }
    }

    #[tokio::test]
    async fn test_unknown_email_is_absent() {
        let registry = SubscriptionRegistry::new();
        let email = Email::parse("nobody@example.com").unwrap();
        assert!(registry.check(&email).await.is_none());
    }

    #[tokio::test]
    async fn test_activate_then_cancel() {
        let registry = SubscriptionRegistry::new();
        let email = Email::parse("Owner@Example.com").unwrap();

        let status = registry
            .apply_event(event("checkout.completed", "owner@example.com"), Utc::now())
            .await
            .unwrap();
        assert!(status.active);
        assert!(registry.check(&email).await.unwrap().active);

        registry
            .apply_event(event("subscription.canceled", "OWNER@example.com"), Utc::now())
            .await
            .unwrap();
        assert!(!registry.check(&email).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_other_events_ignored() {
        let registry = SubscriptionRegistry::new();
        let result = registry
            .apply_event(event("invoice.created", "owner@example.com"), Utc::now())
            .await;
        assert!(result.is_none());
        let email = Email::parse("owner@example.com").unwrap();
        assert!(registry.check(&email).await.is_none());
    }

    #[test]
    fn test_signature_round_trip() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%");
        let body = br#"{"type":"checkout.completed"}"#;
        let signature = sign(&secret, body);

        assert!(verify_signature(&secret, body, Some(&signature)).is_ok());
        assert_eq!(
            verify_signature(&secret, b"tampered", Some(&signature)),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature(&secret, body, None),
            Err(SignatureError::Missing)
        );
        assert_eq!(
            verify_signature(&secret, body, Some("zz")),
            Err(SignatureError::Malformed)
        );
    }
}
