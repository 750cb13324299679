//! Stateful services behind the HTTP layer.
//!
//! - [`coupons`] - coupon book, favorites, redemptions and views
//! - [`auth`] - the mock-authenticated session
//! - [`subscriptions`] - payment webhook state
//! - [`codes`] - redemption code generation
//! - [`profile`] - profile picture validation

pub mod auth;
pub mod codes;
pub mod coupons;
pub mod profile;
pub mod subscriptions;

pub use auth::AuthService;
pub use coupons::{CouponService, RedemptionEntry};
pub use subscriptions::SubscriptionRegistry;
