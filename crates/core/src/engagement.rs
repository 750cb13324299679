//! Redemption ledger and view counter.
//!
//! Both are deliberately permissive: a redemption or view is recorded for any
//! coupon ID, any number of times, with no deduplication by user or session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coupon::CouponRedemption;
use crate::types::{CouponId, RedemptionId, UserId};

/// Append-only list of redemptions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionLedger(Vec<CouponRedemption>);

impl RedemptionLedger {
    /// Rebuild a ledger from stored records.
    #[must_use]
    pub const fn from_records(records: Vec<CouponRedemption>) -> Self {
        Self(records)
    }

    /// Record a redemption and return it.
    pub fn record(
        &mut self,
        coupon_id: CouponId,
        user_id: Option<UserId>,
        device_info: Option<String>,
        now: DateTime<Utc>,
    ) -> CouponRedemption {
        let redemption = CouponRedemption {
            id: RedemptionId::generate(),
            coupon_id,
            user_id,
            redeemed_at: now,
            device_info,
        };
        self.0.push(redemption.clone());
        redemption
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CouponRedemption> {
        self.0.iter()
    }

    pub fn for_coupon<'a>(&'a self, coupon_id: &'a CouponId) -> impl Iterator<Item = &'a CouponRedemption> {
        self.0.iter().filter(move |r| &r.coupon_id == coupon_id)
    }

    #[must_use]
    pub fn count_for_coupon(&self, coupon_id: &CouponId) -> usize {
        self.for_coupon(coupon_id).count()
    }

    /// Most recent redemption of a coupon.
    #[must_use]
    pub fn last_for_coupon<'a>(&'a self, coupon_id: &'a CouponId) -> Option<&'a CouponRedemption> {
        self.for_coupon(coupon_id).max_by_key(|r| r.redeemed_at)
    }

    /// A user's redemptions, newest first.
    #[must_use]
    pub fn for_user(&self, user_id: &UserId) -> Vec<&CouponRedemption> {
        let mut mine: Vec<_> = self
            .0
            .iter()
            .filter(|r| r.user_id.as_ref() == Some(user_id))
            .collect();
        mine.sort_by(|a, b| b.redeemed_at.cmp(&a.redeemed_at));
        mine
    }
}

/// Per-coupon view counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewCounter(BTreeMap<CouponId, u64>);

impl ViewCounter {
    /// Count one more view and return the new total.
    pub fn increment(&mut self, coupon_id: CouponId) -> u64 {
        let count = self.0.entry(coupon_id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Views for a coupon; zero if never viewed.
    #[must_use]
    pub fn get(&self, coupon_id: &CouponId) -> u64 {
        self.0.get(coupon_id).copied().unwrap_or(0)
    }

    /// Sum of all views.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}
