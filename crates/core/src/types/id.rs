//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create string ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are opaque strings
//! on the wire (`"coupon-6f1c..."`) so that blobs written by older clients,
//! which used timestamp suffixes, still deserialize.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `generate()` producing `<prefix>-<uuid v4>`
/// - `new()`, `as_str()`, `Display`, `From<&str>`, `From<String>`
///
/// # Example
///
/// ```rust
/// # use perkpass_core::define_id;
/// define_id!(TicketId, "ticket");
/// define_id!(InvoiceId, "invoice");
///
/// let ticket = TicketId::generate();
/// assert!(ticket.as_str().starts_with("ticket-"));
///
/// // These are different types, so this won't compile:
/// // let _: TicketId = InvoiceId::new("invoice-1");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used by [`Self::generate`].
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, globally unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{}-{}", Self::PREFIX, ::uuid::Uuid::new_v4()))
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(CouponId, "coupon");
define_id!(RedemptionId, "redemption");
define_id!(UserId, "user");
define_id!(BusinessId, "business");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uses_prefix() {
        let id = CouponId::generate();
        assert!(id.as_str().starts_with("coupon-"));
        assert_eq!(id.as_str().len(), "coupon-".len() + 36);
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(RedemptionId::generate(), RedemptionId::generate());
    }

    #[test]
    fn test_legacy_timestamp_ids_deserialize() {
        let id: CouponId = serde_json::from_str("\"coupon-1717171717171\"").unwrap();
        assert_eq!(id, CouponId::new("coupon-1717171717171"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"coupon-1717171717171\"");
    }
}
