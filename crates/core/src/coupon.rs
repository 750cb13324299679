//! Coupon, submission and redemption records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BusinessId, Category, CouponId, CouponStatus, RedemptionId, UserId};

/// Expiration text stored when a business leaves the field blank.
pub const DEFAULT_EXPIRATION: &str = "No expiration";

/// Instructions stored when a business leaves the field blank.
pub const DEFAULT_REDEMPTION_INSTRUCTIONS: &str = "Show this coupon at checkout";

/// Stock image used for every business submission.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=800";

/// A discount offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<BusinessId>,
    pub title: String,
    pub description: String,
    /// Free-form discount text, e.g. `"20% OFF"` or `"BOGO"`.
    pub discount: String,
    pub category: Category,
    /// Free-form expiration text, e.g. `"Dec 31, 2025"`.
    pub expires_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
    pub redemption_instructions: String,
    pub status: CouponStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Validation failures for a [`CouponSubmission`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// A required text field was empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Fields a business fills in when submitting a coupon for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSubmission {
    pub business_name: String,
    #[serde(default)]
    pub business_id: Option<BusinessId>,
    pub title: String,
    pub description: String,
    pub discount: String,
    pub category: Category,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub redemption_instructions: Option<String>,
}

impl CouponSubmission {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        let required = [
            ("businessName", &self.business_name),
            ("title", &self.title),
            ("description", &self.description),
            ("discount", &self.discount),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SubmissionError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Turn the submission into a pending coupon with a fresh ID.
    ///
    /// Blank optional text falls back to the defaults; blank code and terms
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if a required field is blank.
    pub fn into_pending(self, now: DateTime<Utc>) -> Result<Coupon, SubmissionError> {
        self.validate()?;

        Ok(Coupon {
            id: CouponId::generate(),
            business_name: self.business_name.trim().to_owned(),
            business_id: self.business_id,
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            discount: self.discount.trim().to_owned(),
            category: self.category,
            expires_at: non_blank(self.expires_at)
                .unwrap_or_else(|| DEFAULT_EXPIRATION.to_owned()),
            code: non_blank(self.code),
            terms: non_blank(self.terms),
            image_url: DEFAULT_IMAGE_URL.to_owned(),
            is_featured: false,
            redemption_instructions: non_blank(self.redemption_instructions)
                .unwrap_or_else(|| DEFAULT_REDEMPTION_INSTRUCTIONS.to_owned()),
            status: CouponStatus::Pending,
            submitted_at: now,
            reviewed_at: None,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// A record that a coupon was claimed.
///
/// Redemptions are append-only. Nothing checks that the coupon exists or that
/// the same user has not redeemed it before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRedemption {
    pub id: RedemptionId,
    pub coupon_id: CouponId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub redeemed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn submission(business: &str, title: &str) -> CouponSubmission {
        CouponSubmission {
            business_name: business.to_owned(),
            business_id: None,
            title: title.to_owned(),
            description: format!("{title} at {business}"),
            discount: "20% OFF".to_owned(),
            category: Category::FoodAndDining,
            expires_at: None,
            code: None,
            terms: None,
            redemption_instructions: None,
        }
    }

    #[test]
    fn test_into_pending_applies_defaults() {
        let now = Utc::now();
        let coupon = submission("Fort Worth Eats", "Taco Tuesday")
            .into_pending(now)
            .unwrap();

        assert_eq!(coupon.status, CouponStatus::Pending);
        assert_eq!(coupon.expires_at, DEFAULT_EXPIRATION);
        assert_eq!(coupon.redemption_instructions, DEFAULT_REDEMPTION_INSTRUCTIONS);
        assert_eq!(coupon.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(coupon.submitted_at, now);
        assert!(coupon.reviewed_at.is_none());
        assert!(!coupon.is_featured);
        assert!(coupon.id.as_str().starts_with("coupon-"));
    }

    #[test]
    fn test_into_pending_drops_blank_optionals() {
        let mut s = submission("Spa Luxe Dallas", "Massage");
        s.code = Some("   ".to_owned());
        s.terms = Some(" One per visit ".to_owned());
        let coupon = s.into_pending(Utc::now()).unwrap();

        assert_eq!(coupon.code, None);
        assert_eq!(coupon.terms.as_deref(), Some("One per visit"));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let s = submission("DFW Auto Care", "  ");
        assert_eq!(
            s.into_pending(Utc::now()),
            Err(SubmissionError::MissingField("title"))
        );
    }

    #[test]
    fn test_coupon_json_uses_camel_case() {
        let coupon = submission("Fort Worth Eats", "Brisket Plate")
            .into_pending(Utc::now())
            .unwrap();
        let json = serde_json::to_value(&coupon).unwrap();

        assert!(json.get("businessName").is_some());
        assert!(json.get("redemptionInstructions").is_some());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["category"], "Food & Dining");
        assert!(json.get("reviewedAt").is_none());
    }
}
