//! CLI command implementations.

pub mod codes;
pub mod coupons;
