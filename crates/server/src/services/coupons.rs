//! Coupon store: moderation, favorites, redemptions and views.
//!
//! All state sits behind one `RwLock`. Each mutation works on a copy of the
//! collection it changes, writes that copy while still holding the write
//! lock, and only then swaps it in. A failed write leaves memory untouched.

use chrono::Utc;
use perkpass_core::{
    Coupon, CouponAnalytics, CouponBook, CouponFilter, CouponId, CouponRedemption,
    CouponSubmission, Favorites, RedemptionLedger, UserId, ViewCounter,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::catalog;
use crate::error::{AppError, Result};
use crate::storage::{
    APPROVED_KEY, FAVORITES_KEY, PENDING_KEY, REDEMPTIONS_KEY, Storage, VIEWS_KEY,
};

#[derive(Debug, Default)]
struct CouponState {
    book: CouponBook,
    favorites: Favorites,
    ledger: RedemptionLedger,
    views: ViewCounter,
}

/// A past redemption joined with its coupon, if the coupon still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionEntry {
    pub redemption: CouponRedemption,
    pub coupon: Option<Coupon>,
}

/// The device's coupon store.
#[derive(Debug)]
pub struct CouponService {
    storage: Storage,
    state: RwLock<CouponState>,
}

impl CouponService {
    /// Build the store from the seed catalog and whatever blobs exist.
    ///
    /// A missing review queue falls back to the seed queue; every other
    /// missing or unreadable blob starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the seed data is invalid.
    pub async fn load(storage: Storage) -> Result<Self> {
        let seed = catalog::seed_catalog().map_err(|e| AppError::Internal(e.to_string()))?;
        let approved: Vec<Coupon> = storage.load_json(APPROVED_KEY).await?.unwrap_or_default();
        let pending = match storage.load_json(PENDING_KEY).await? {
            Some(pending) => pending,
            None => catalog::seed_pending().map_err(|e| AppError::Internal(e.to_string()))?,
        };
        let favorites: Vec<CouponId> = storage.load_json(FAVORITES_KEY).await?.unwrap_or_default();
        let ledger = storage.load_json(REDEMPTIONS_KEY).await?.unwrap_or_default();
        let views = storage.load_json(VIEWS_KEY).await?.unwrap_or_default();

        tracing::info!(
            approved = approved.len(),
            pending = pending.len(),
            "Coupon store loaded"
        );

        Ok(Self {
            storage,
            state: RwLock::new(CouponState {
                book: CouponBook::new(seed, approved, pending),
                favorites: Favorites::from_ids(favorites),
                ledger,
                views,
            }),
        })
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Listed coupons matching `filter`.
    pub async fn list(&self, filter: &CouponFilter) -> Vec<Coupon> {
        self.state.read().await.book.search(filter).cloned().collect()
    }

    pub async fn featured(&self) -> Vec<Coupon> {
        self.state.read().await.book.featured().cloned().collect()
    }

    /// Any coupon by ID, pending ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown ID.
    pub async fn get(&self, id: &CouponId) -> Result<Coupon> {
        self.state
            .read()
            .await
            .book
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("coupon {id}")))
    }

    /// The review queue, newest first.
    pub async fn pending(&self) -> Vec<Coupon> {
        self.state.read().await.book.pending().to_vec()
    }

    /// Favorited coupons that are still listed.
    pub async fn favorites(&self) -> Vec<Coupon> {
        let state = self.state.read().await;
        state.favorites.select(state.book.all()).cloned().collect()
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    /// Queue a submission for review.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Submission`] for a blank required field.
    #[instrument(skip(self, submission), fields(business = %submission.business_name))]
    pub async fn submit(&self, submission: CouponSubmission) -> Result<Coupon> {
        let mut state = self.state.write().await;
        let mut book = state.book.clone();
        let coupon = book.submit(submission, Utc::now())?;
        self.storage.set_json(PENDING_KEY, book.pending()).await?;
        state.book = book;
        tracing::info!(coupon_id = %coupon.id, "Coupon submitted for review");
        Ok(coupon)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Moderation`] if the coupon is not pending.
    #[instrument(skip(self))]
    pub async fn approve(&self, id: &CouponId) -> Result<Coupon> {
        let mut state = self.state.write().await;
        let mut book = state.book.clone();
        let coupon = book.approve(id, Utc::now())?;
        self.persist_book(&state.book, &book).await?;
        state.book = book;
        tracing::info!(business = %coupon.business_name, "Coupon approved");
        Ok(coupon)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Moderation`] if the coupon is not pending.
    #[instrument(skip(self))]
    pub async fn deny(&self, id: &CouponId) -> Result<Coupon> {
        let mut state = self.state.write().await;
        let mut book = state.book.clone();
        let coupon = book.deny(id)?;
        self.storage.set_json(PENDING_KEY, book.pending()).await?;
        state.book = book;
        tracing::info!(business = %coupon.business_name, "Coupon denied");
        Ok(coupon)
    }

    /// Remove one of a business's own submissions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Moderation`] if the coupon is unknown, a seed
    /// coupon, or owned by someone else.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &CouponId, business_name: &str) -> Result<Coupon> {
        let mut state = self.state.write().await;
        let mut book = state.book.clone();
        let coupon = book.delete(id, business_name)?;
        self.persist_book(&state.book, &book).await?;
        state.book = book;
        tracing::info!("Coupon deleted");
        Ok(coupon)
    }

    /// Write both moderation blobs. If the second write fails the first is
    /// put back, so the two files never disagree about a coupon.
    async fn persist_book(&self, current: &CouponBook, next: &CouponBook) -> Result<()> {
        self.storage.set_json(PENDING_KEY, next.pending()).await?;
        if let Err(e) = self.storage.set_json(APPROVED_KEY, next.approved()).await {
            if let Err(restore) = self.storage.set_json(PENDING_KEY, current.pending()).await {
                tracing::error!(error = %restore, "Failed to restore review queue");
            }
            return Err(AppError::from(e));
        }
        Ok(())
    }

    // =========================================================================
    // Engagement
    // =========================================================================

    /// Flip a favorite. Returns whether the coupon is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites blob cannot be written.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: &CouponId) -> Result<bool> {
        let mut state = self.state.write().await;
        let mut favorites = state.favorites.clone();
        let favorite = favorites.toggle(id);
        self.storage.set_json(FAVORITES_KEY, &favorites).await?;
        state.favorites = favorites;
        Ok(favorite)
    }

    /// Record a redemption. Any coupon ID is accepted, any number of times.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    #[instrument(skip(self, device_info))]
    pub async fn redeem(
        &self,
        coupon_id: CouponId,
        user_id: Option<UserId>,
        device_info: Option<String>,
    ) -> Result<CouponRedemption> {
        let mut state = self.state.write().await;
        let mut ledger = state.ledger.clone();
        let redemption = ledger.record(coupon_id, user_id, device_info, Utc::now());
        self.storage.set_json(REDEMPTIONS_KEY, &ledger).await?;
        state.ledger = ledger;
        tracing::info!(redemption_id = %redemption.id, "Coupon redeemed");
        Ok(redemption)
    }

    /// Count a view and return the coupon's new total.
    ///
    /// # Errors
    ///
    /// Returns an error if the view counts cannot be written.
    #[instrument(skip(self))]
    pub async fn track_view(&self, coupon_id: CouponId) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut counts = state.views.clone();
        let views = counts.increment(coupon_id);
        self.storage.set_json(VIEWS_KEY, &counts).await?;
        state.views = counts;
        Ok(views)
    }

    /// Engagement dashboard for one business's listed coupons.
    pub async fn analytics(&self, business_name: &str) -> CouponAnalytics {
        let state = self.state.read().await;
        CouponAnalytics::for_business(
            business_name,
            state.book.by_business(business_name),
            &state.ledger,
            &state.views,
            Utc::now().date_naive(),
        )
    }

    /// A user's redemptions, newest first.
    pub async fn redemption_history(&self, user_id: &UserId) -> Vec<RedemptionEntry> {
        let state = self.state.read().await;
        state
            .ledger
            .for_user(user_id)
            .into_iter()
            .map(|redemption| RedemptionEntry {
                redemption: redemption.clone(),
                coupon: state.book.find(&redemption.coupon_id).cloned(),
            })
            .collect()
    }
}
