//! Coupon categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a category name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The eight fixed coupon categories.
///
/// Serialized with their display names (`"Food & Dining"`), which is also
/// what persisted blobs contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Beauty & Wellness")]
    BeautyAndWellness,
    #[serde(rename = "Services")]
    Services,
    #[serde(rename = "Fitness")]
    Fitness,
    #[serde(rename = "Electronics")]
    Electronics,
}

impl Category {
    /// All categories in browse order.
    pub const ALL: [Self; 8] = [
        Self::FoodAndDining,
        Self::Shopping,
        Self::Entertainment,
        Self::Travel,
        Self::BeautyAndWellness,
        Self::Services,
        Self::Fitness,
        Self::Electronics,
    ];

    /// Human-readable name, identical to the serialized form.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Travel => "Travel",
            Self::BeautyAndWellness => "Beauty & Wellness",
            Self::Services => "Services",
            Self::Fitness => "Fitness",
            Self::Electronics => "Electronics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_display_name() {
        let json = serde_json::to_string(&Category::BeautyAndWellness).unwrap();
        assert_eq!(json, "\"Beauty & Wellness\"");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "food & dining".parse::<Category>().unwrap(),
            Category::FoodAndDining
        );
        assert_eq!(" Fitness ".parse::<Category>().unwrap(), Category::Fitness);
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_all_matches_display_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }
}
