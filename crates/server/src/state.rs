//! Application state shared across handlers.

use std::sync::Arc;

use perkpass_core::BusinessRecord;

use crate::catalog;
use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::services::{AuthService, CouponService, SubscriptionRegistry};
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    coupons: CouponService,
    auth: AuthService,
    subscriptions: SubscriptionRegistry,
    businesses: Vec<BusinessRecord>,
}

impl AppState {
    /// Open storage as configured and load every store.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or the seed data is unusable.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let storage = match &config.data_dir {
            Some(dir) => Storage::directory(dir).await?,
            None => Storage::memory(),
        };
        Self::with_storage(config, storage).await
    }

    /// Load every store from an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns an error if stored blobs cannot be read or the seed data is
    /// invalid.
    pub async fn with_storage(config: ServerConfig, storage: Storage) -> Result<Self> {
        let coupons = CouponService::load(storage.clone()).await?;
        let auth = AuthService::load(storage).await?;
        let businesses =
            catalog::business_directory().map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                coupons,
                auth,
                subscriptions: SubscriptionRegistry::new(),
                businesses,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The coupon store.
    #[must_use]
    pub fn coupons(&self) -> &CouponService {
        &self.inner.coupons
    }

    /// The session store.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Webhook-driven subscription map.
    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.inner.subscriptions
    }

    /// Fixed business directory shown on the admin dashboard.
    #[must_use]
    pub fn businesses(&self) -> &[BusinessRecord] {
        &self.inner.businesses
    }
}
