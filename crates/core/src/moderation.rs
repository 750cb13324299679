//! The coupon book: catalog, approved submissions and the review queue.
//!
//! ```text
//! submit ──► pending ──approve──► approved
//!               │
//!               └──deny──► (discarded, no record)
//! ```
//!
//! The seed catalog is always approved and cannot be edited through the book.
//! Approval copies the pending coupon, stamps `reviewed_at`, and moves it to
//! the front of the approved list.

use chrono::{DateTime, Utc};

use crate::coupon::{Coupon, CouponSubmission, SubmissionError};
use crate::types::{Category, CategoryError, CouponId, CouponStatus};

/// Moderation failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// The coupon is not in the review queue.
    #[error("coupon {0} is not awaiting review")]
    NotPending(CouponId),

    /// No deletable coupon has this ID.
    #[error("coupon {0} not found")]
    NotFound(CouponId),

    /// The coupon belongs to a different business.
    #[error("coupon {coupon_id} does not belong to {business_name}")]
    NotOwner {
        coupon_id: CouponId,
        business_name: String,
    },
}

/// Category half of a browse filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Only this category.
    Only(Category),
}

impl CategoryFilter {
    /// `"All"` followed by every category name, in browse order.
    #[must_use]
    pub fn options() -> Vec<String> {
        std::iter::once("All".to_owned())
            .chain(Category::ALL.iter().map(ToString::to_string))
            .collect()
    }

    fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            trimmed.parse().map(Self::Only)
        }
    }
}

/// Search text plus category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl CouponFilter {
    fn matches(&self, coupon: &Coupon) -> bool {
        if !self.category.matches(coupon.category) {
            return false;
        }

        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        [&coupon.business_name, &coupon.title, &coupon.description]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// All coupons known to one store, split by lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponBook {
    catalog: Vec<Coupon>,
    approved: Vec<Coupon>,
    pending: Vec<Coupon>,
}

impl CouponBook {
    /// Build a book from its three collections.
    #[must_use]
    pub const fn new(catalog: Vec<Coupon>, approved: Vec<Coupon>, pending: Vec<Coupon>) -> Self {
        Self {
            catalog,
            approved,
            pending,
        }
    }

    /// Seed coupons that ship with the app.
    #[must_use]
    pub fn catalog(&self) -> &[Coupon] {
        &self.catalog
    }

    /// Business submissions that passed review, newest first.
    #[must_use]
    pub fn approved(&self) -> &[Coupon] {
        &self.approved
    }

    /// Submissions awaiting review, newest first.
    #[must_use]
    pub fn pending(&self) -> &[Coupon] {
        &self.pending
    }

    /// Queue a business submission for review.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if a required field is blank.
    pub fn submit(
        &mut self,
        submission: CouponSubmission,
        now: DateTime<Utc>,
    ) -> Result<Coupon, SubmissionError> {
        let coupon = submission.into_pending(now)?;
        self.pending.insert(0, coupon.clone());
        Ok(coupon)
    }

    /// Approve a pending coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::NotPending`] if `id` is not in the queue.
    pub fn approve(&mut self, id: &CouponId, now: DateTime<Utc>) -> Result<Coupon, ModerationError> {
        let mut coupon = self.take_pending(id)?;
        coupon.status = CouponStatus::Approved;
        coupon.reviewed_at = Some(now);
        self.approved.insert(0, coupon.clone());
        Ok(coupon)
    }

    /// Deny a pending coupon. The coupon is dropped; the returned copy is
    /// marked `Denied` for the caller's benefit only.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::NotPending`] if `id` is not in the queue.
    pub fn deny(&mut self, id: &CouponId) -> Result<Coupon, ModerationError> {
        let mut coupon = self.take_pending(id)?;
        coupon.status = CouponStatus::Denied;
        Ok(coupon)
    }

    /// Remove one of a business's own submissions, pending or approved.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::NotFound`] if no submission has this ID
    /// (seed coupons included), or [`ModerationError::NotOwner`] if it
    /// belongs to another business.
    pub fn delete(&mut self, id: &CouponId, business_name: &str) -> Result<Coupon, ModerationError> {
        for list in [&mut self.pending, &mut self.approved] {
            let Some(index) = list.iter().position(|c| &c.id == id) else {
                continue;
            };
            let owner = list.get(index).map(|c| c.business_name.as_str());
            if owner != Some(business_name.trim()) {
                return Err(ModerationError::NotOwner {
                    coupon_id: id.clone(),
                    business_name: business_name.to_owned(),
                });
            }
            return Ok(list.remove(index));
        }
        Err(ModerationError::NotFound(id.clone()))
    }

    /// Every publicly listed coupon: the catalog, then approved submissions.
    pub fn all(&self) -> impl Iterator<Item = &Coupon> {
        self.catalog.iter().chain(&self.approved)
    }

    /// Listed coupons flagged as featured.
    pub fn featured(&self) -> impl Iterator<Item = &Coupon> {
        self.all().filter(|c| c.is_featured)
    }

    /// Listed coupons matching a browse filter.
    pub fn search<'a>(&'a self, filter: &'a CouponFilter) -> impl Iterator<Item = &'a Coupon> {
        self.all().filter(move |c| filter.matches(c))
    }

    /// Approved coupons for one business, catalog included.
    pub fn by_business<'a>(&'a self, business_name: &'a str) -> impl Iterator<Item = &'a Coupon> {
        self.all().filter(move |c| c.business_name == business_name)
    }

    /// Look a coupon up in any collection.
    #[must_use]
    pub fn find(&self, id: &CouponId) -> Option<&Coupon> {
        self.all().chain(&self.pending).find(|c| &c.id == id)
    }

    fn take_pending(&mut self, id: &CouponId) -> Result<Coupon, ModerationError> {
        let index = self
            .pending
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ModerationError::NotPending(id.clone()))?;
        Ok(self.pending.remove(index))
    }
}
