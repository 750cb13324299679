//! PerkPass Core - Coupon domain types and state logic.
//!
//! This crate is shared by every PerkPass component:
//! - `server` - HTTP/RPC service for consumers, businesses and the admin
//! - `cli` - Command-line tools for moderation and maintenance
//!
//! # Architecture
//!
//! The core crate holds types and pure state transitions only - no I/O, no
//! HTTP, no storage. Callers own persistence and locking; every function here
//! takes the current time explicitly so results are reproducible in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, categories, statuses, emails and prices
//! - [`coupon`] - Coupon, submission and redemption records
//! - [`user`] - Mock-authenticated user and session
//! - [`moderation`] - The pending/approved/denied coupon book
//! - [`favorites`] - Per-device favorite set
//! - [`engagement`] - Redemption ledger and view counter
//! - [`analytics`] - Conversion rates, business and platform aggregates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod coupon;
pub mod engagement;
pub mod favorites;
pub mod moderation;
pub mod types;
pub mod user;

pub use analytics::{
    BusinessRecord, CouponAnalytics, CouponStats, DailyCount, PlatformAnalytics, PlatformFee,
    RevenueSummary, conversion_rate,
};
pub use coupon::{Coupon, CouponRedemption, CouponSubmission, SubmissionError};
pub use engagement::{RedemptionLedger, ViewCounter};
pub use favorites::Favorites;
pub use moderation::{CategoryFilter, CouponBook, CouponFilter, ModerationError};
pub use types::*;
pub use user::{AuthUser, LoginRequest, Session};
