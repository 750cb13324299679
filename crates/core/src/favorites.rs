//! Favorite coupons for one device.

use serde::{Deserialize, Serialize};

use crate::coupon::Coupon;
use crate::types::CouponId;

/// Ordered set of favorited coupon IDs.
///
/// Serialized as a plain JSON array, the same shape the device stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<CouponId>);

impl Favorites {
    /// Build from stored IDs, dropping duplicates but keeping first-seen order.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CouponId>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.0.push(id);
            }
        }
        favorites
    }

    /// Add the coupon if absent, remove it if present.
    ///
    /// Returns whether the coupon is a favorite afterwards.
    pub fn toggle(&mut self, id: &CouponId) -> bool {
        if let Some(index) = self.0.iter().position(|f| f == id) {
            self.0.remove(index);
            false
        } else {
            self.0.push(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &CouponId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[CouponId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The favorited coupons among `coupons`, in `coupons` order.
    ///
    /// Favorites pointing at coupons that no longer exist are skipped.
    pub fn select<'a, I>(&'a self, coupons: I) -> impl Iterator<Item = &'a Coupon> + 'a
    where
        I: IntoIterator<Item = &'a Coupon>,
        I::IntoIter: 'a,
    {
        coupons.into_iter().filter(move |c| self.contains(&c.id))
    }
}
