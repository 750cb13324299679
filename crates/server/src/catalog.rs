//! Seed data compiled into the binary.
//!
//! - `fixtures/catalog.json` - approved coupons every store starts with
//! - `fixtures/pending.json` - the review queue before anything is persisted
//! - `fixtures/businesses.json` - the admin dashboard's business directory

use perkpass_core::{BusinessRecord, Coupon};

const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");
const PENDING_JSON: &str = include_str!("../fixtures/pending.json");
const BUSINESSES_JSON: &str = include_str!("../fixtures/businesses.json");

/// Seed data failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid seed fixture {name}: {source}")]
pub struct FixtureError {
    name: &'static str,
    #[source]
    source: serde_json::Error,
}

fn parse<T: serde::de::DeserializeOwned>(name: &'static str, raw: &str) -> Result<T, FixtureError> {
    serde_json::from_str(raw).map_err(|source| FixtureError { name, source })
}

/// Approved coupons shipped with the app.
///
/// # Errors
///
/// Returns [`FixtureError`] if the embedded JSON is malformed.
pub fn seed_catalog() -> Result<Vec<Coupon>, FixtureError> {
    parse("catalog.json", CATALOG_JSON)
}

/// Review queue used when no pending blob has been stored yet.
///
/// # Errors
///
/// Returns [`FixtureError`] if the embedded JSON is malformed.
pub fn seed_pending() -> Result<Vec<Coupon>, FixtureError> {
    parse("pending.json", PENDING_JSON)
}

/// Business directory for platform analytics.
///
/// # Errors
///
/// Returns [`FixtureError`] if the embedded JSON is malformed.
pub fn business_directory() -> Result<Vec<BusinessRecord>, FixtureError> {
    parse("businesses.json", BUSINESSES_JSON)
}
