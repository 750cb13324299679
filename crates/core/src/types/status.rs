//! Status enums for coupons and users.

use serde::{Deserialize, Serialize};

/// Coupon moderation status.
///
/// Submissions start as `Pending`. An admin either approves them (the coupon
/// becomes publicly listed) or denies them (the coupon is discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Kind of account a user logged in as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Browses, favorites and redeems coupons.
    Consumer,
    /// Submits coupons and sees their analytics.
    Business,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consumer => write!(f, "consumer"),
            Self::Business => write!(f, "business"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumer" => Ok(Self::Consumer),
            "business" => Ok(Self::Business),
            _ => Err(format!("invalid user type: {s}")),
        }
    }
}
